use super::engine::TeraEngine;
use crate::github::{Commit, PullRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::Context;

const COMMITS_TEMPLATE: &str = "\
You are a technical blog writer. Based on the following GitHub commits from the repository \"{{ repository }}\", write an engaging and informative blog post that explains what was accomplished in these commits.

Commits:
{% for commit in commits %}{{ loop.index }}. {{ commit.message }}
   Author: {{ commit.author }}
   Date: {{ commit.date }}
{% if not loop.last %}
{% endif %}{% endfor %}
Please write a blog post that:
1. Has an engaging title
2. Provides an overview of the changes
3. Explains the technical details in an accessible way
4. Highlights the key improvements or features
5. Is written in a professional but friendly tone
6. Is approximately 300-500 words

Format the output as markdown with the title as an H1 heading.";

const PULL_REQUESTS_TEMPLATE: &str = "\
You are a technical blog writer. Based on the following pull requests from the repository \"{{ repository }}\", write an engaging and informative blog post that explains the development activity and improvements.

Pull Requests:
{% for pr in pull_requests %}{{ loop.index }}. {{ pr.title }}
   State: {{ pr.state }}
   Author: {{ pr.author }}
   Created: {{ pr.created }}
{% if pr.description %}   Description: {{ pr.description }}
{% endif %}{% if not loop.last %}
{% endif %}{% endfor %}
Please write a blog post that:
1. Has an engaging title
2. Provides an overview of the development activity
3. Explains the key features or fixes being worked on
4. Highlights the collaborative nature of the development
5. Is written in a professional but friendly tone
6. Is approximately 300-500 words

Format the output as markdown with the title as an H1 heading.";

const SINGLE_COMMIT_TEMPLATE: &str = "\
You are a technical blog writer. Write a detailed and engaging blog post about the following GitHub commit from the repository \"{{ repository }}\".

Commit Details:
- Message: {{ commit.message }}
- Author: {{ commit.author }}
- Date: {{ commit.date }}
- SHA: {{ commit.sha }}

Please write a comprehensive blog post that:
1. Has a catchy, descriptive title (use ## H2 heading)
2. Starts with an introduction that provides context about what this commit accomplishes
3. Includes a \"Technical Implementation\" section explaining what was changed and how
4. Has an \"Impact & Benefits\" section discussing why this change matters
5. Ends with a brief conclusion
6. Is written in a professional but approachable tone
7. Is approximately 400-600 words
8. Uses markdown formatting with proper headings, bullet points, and emphasis where appropriate

Focus on making the technical details accessible while still being informative for developers. If the commit message is brief, use your knowledge to expand on what such changes typically involve.

Format the output as clean markdown.";

const COMMITS_NAME: &str = "commits_digest";
const PULL_REQUESTS_NAME: &str = "pull_requests_digest";
const SINGLE_COMMIT_NAME: &str = "single_commit";

/// Characters of a pull-request body quoted in the digest.
const PR_BODY_PREVIEW_CHARS: usize = 200;

#[derive(Serialize)]
struct CommitView<'a> {
    message: &'a str,
    author: &'a str,
    date: String,
    sha: &'a str,
}

impl<'a> From<&'a Commit> for CommitView<'a> {
    fn from(commit: &'a Commit) -> Self {
        Self {
            message: &commit.commit.message,
            author: commit.author_name(),
            date: format_date(commit.authored_at()),
            sha: commit.short_sha(),
        }
    }
}

#[derive(Serialize)]
struct PullRequestView<'a> {
    title: &'a str,
    state: &'a str,
    author: &'a str,
    created: String,
    description: Option<String>,
}

impl<'a> From<&'a PullRequest> for PullRequestView<'a> {
    fn from(pr: &'a PullRequest) -> Self {
        Self {
            title: &pr.title,
            state: &pr.state,
            author: &pr.user.login,
            created: format_date(pr.created_at),
            description: pr
                .body
                .as_deref()
                .filter(|body| !body.is_empty())
                .map(|body| {
                    let preview: String = body.chars().take(PR_BODY_PREVIEW_CHARS).collect();
                    format!("{preview}...")
                }),
        }
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Engine with the blog-writing templates registered.
pub fn blog_prompt_engine() -> anyhow::Result<TeraEngine> {
    let mut engine = TeraEngine::new();
    engine.add_template(COMMITS_NAME, COMMITS_TEMPLATE)?;
    engine.add_template(PULL_REQUESTS_NAME, PULL_REQUESTS_TEMPLATE)?;
    engine.add_template(SINGLE_COMMIT_NAME, SINGLE_COMMIT_TEMPLATE)?;
    Ok(engine)
}

fn repository_context(owner: &str, repo: &str) -> Context {
    let mut ctx = Context::new();
    ctx.insert("repository", &format!("{owner}/{repo}"));
    ctx
}

/// Prompt for a post covering a batch of commits.
pub fn build_commits_prompt(
    engine: &TeraEngine,
    commits: &[Commit],
    owner: &str,
    repo: &str,
) -> anyhow::Result<String> {
    let mut ctx = repository_context(owner, repo);
    let views: Vec<CommitView<'_>> = commits.iter().map(CommitView::from).collect();
    ctx.insert("commits", &views);
    engine.render(COMMITS_NAME, &ctx)
}

/// Prompt for a post covering recent pull requests.
pub fn build_pull_requests_prompt(
    engine: &TeraEngine,
    pull_requests: &[PullRequest],
    owner: &str,
    repo: &str,
) -> anyhow::Result<String> {
    let mut ctx = repository_context(owner, repo);
    let views: Vec<PullRequestView<'_>> = pull_requests.iter().map(PullRequestView::from).collect();
    ctx.insert("pull_requests", &views);
    engine.render(PULL_REQUESTS_NAME, &ctx)
}

/// Prompt for an in-depth post about one commit.
pub fn build_single_commit_prompt(
    engine: &TeraEngine,
    commit: &Commit,
    owner: &str,
    repo: &str,
) -> anyhow::Result<String> {
    let mut ctx = repository_context(owner, repo);
    ctx.insert("commit", &CommitView::from(commit));
    engine.render(SINGLE_COMMIT_NAME, &ctx)
}
