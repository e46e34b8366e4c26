mod builder;
mod engine;

pub use builder::{
    blog_prompt_engine, build_commits_prompt, build_pull_requests_prompt,
    build_single_commit_prompt,
};
pub use engine::TeraEngine;
