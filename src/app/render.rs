//! Plain-text views for the terminal.

use crate::client::Digest;
use crate::github::Commit;
use crate::posts::{Page, Post};
use std::fmt::Write;

const PREVIEW_CHARS: usize = 150;

pub fn render_commits(commits: &[Commit]) -> String {
    if commits.is_empty() {
        return "No commits found.".to_string();
    }
    let mut out = String::new();
    for commit in commits {
        let _ = writeln!(
            out,
            "{}  {}  {}  {}",
            commit.short_sha(),
            commit.authored_at().format("%Y-%m-%d"),
            commit.author_name(),
            commit.title()
        );
    }
    out.trim_end().to_string()
}

pub fn render_page(page: &Page<Post>) -> String {
    if page.total_items == 0 {
        return "No saved posts yet.".to_string();
    }
    let mut out = String::new();
    for post in &page.items {
        let _ = writeln!(
            out,
            "{}  {}  [{} @ {}]\n    {}",
            post.id,
            post.title,
            post.repository,
            post.short_sha(),
            post.preview(PREVIEW_CHARS).replace('\n', " ")
        );
    }
    let _ = write!(
        out,
        "Page {} of {} ({} posts)",
        page.number, page.total_pages, page.total_items
    );
    out
}

pub fn render_post(post: &Post) -> String {
    format!(
        "# {}\n\n{} · {} · {} by {}\nCreated {} · Updated {}\n\n{}",
        post.title,
        post.id,
        post.repository,
        post.short_sha(),
        post.author,
        post.created_at.format("%Y-%m-%d %H:%M"),
        post.updated_at.format("%Y-%m-%d %H:%M"),
        post.content
    )
}

pub fn render_digest(digest: &Digest) -> String {
    let analyzed = match (digest.commits_analyzed, digest.prs_analyzed) {
        (Some(n), _) => format!("{n} commits"),
        (None, Some(n)) => format!("{n} pull requests"),
        (None, None) => "no items".to_string(),
    };
    format!(
        "{} ({analyzed} analyzed)\n\n{}",
        digest.repository, digest.blog_post
    )
}
