//! GitHub REST access: commits and pull requests for one repository.

mod client;
mod types;

pub use client::{
    DEFAULT_API_BASE, DEFAULT_LIMIT, GitHubClient, MAX_LIMIT, RepositorySource, clamp_limit,
};
pub use types::{Commit, CommitAuthor, CommitDetail, PullRequest, PullRequestUser};
