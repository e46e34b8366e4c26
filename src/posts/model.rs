use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved blog post.
///
/// Field names serialize in camelCase; the persisted blob is the JSON array
/// of these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Markdown body, editable after generation.
    pub content: String,
    pub commit_sha: String,
    pub commit_message: String,
    pub author: String,
    /// `owner/name`.
    pub repository: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything a caller supplies when saving a post; identity and
/// timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub commit_sha: String,
    pub commit_message: String,
    pub author: String,
    pub repository: String,
}

impl PostDraft {
    pub(crate) fn into_post(self, id: String, now: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            commit_sha: self.commit_sha,
            commit_message: self.commit_message,
            author: self.author,
            repository: self.repository,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Post {
    /// Short sha for display.
    pub fn short_sha(&self) -> &str {
        self.commit_sha.get(..7).unwrap_or(&self.commit_sha)
    }

    /// First `max_chars` characters of the body, with an ellipsis when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}
