use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as returned by the GitHub REST API (the fields we use).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetail,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub date: DateTime<Utc>,
}

impl Commit {
    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.commit.message.lines().next().unwrap_or_default()
    }

    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    pub fn author_name(&self) -> &str {
        &self.commit.author.name
    }

    pub fn authored_at(&self) -> DateTime<Utc> {
        self.commit.author.date
    }
}

/// A pull request as returned by the GitHub REST API (the fields we use).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub body: Option<String>,
    pub user: PullRequestUser,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestUser {
    pub login: String,
}
