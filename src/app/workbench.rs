//! View orchestration: the fetch → select → generate → edit → save flow and
//! browsing of saved posts, independent of how it is rendered.

use crate::client::{Backend, CommitPost, Digest};
use crate::error::ValidationError;
use crate::github::Commit;
use crate::posts::{Mutation, Page, Post, PostDraft, PostStore, clamp_page};
use crate::state::{AsyncOp, AsyncState};
use std::sync::Arc;

/// GitHub owner and repository names: ASCII alphanumerics, `.`, `-`, `_`.
fn is_path_segment(part: &str) -> bool {
    part.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// An `owner/name` repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Accepts `owner/name`, or a bare `name` with `default_owner`.
    pub fn parse(input: &str, default_owner: Option<&str>) -> Result<Self, ValidationError> {
        let input = input.trim();
        let (owner, name) = match input.split_once('/') {
            Some((owner, name)) => (owner.trim(), name.trim()),
            None => (default_owner.unwrap_or_default().trim(), input),
        };
        if name.is_empty() {
            return Err(ValidationError::EmptyRepository);
        }
        if owner.is_empty() {
            return Err(ValidationError::EmptyOwner);
        }
        if !is_path_segment(owner) || !is_path_segment(name) {
            return Err(ValidationError::InvalidRepository);
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestKind {
    Commits,
    PullRequests,
}

type CommitsArgs = (RepoRef, usize);
type SummaryArgs = (Commit, RepoRef);
type DigestArgs = (DigestKind, RepoRef, usize);

pub struct Workbench {
    store: Arc<PostStore>,
    commit_limit: usize,
    page_size: usize,

    commits: AsyncOp<CommitsArgs, Vec<Commit>>,
    summary: AsyncOp<SummaryArgs, CommitPost>,
    digest: AsyncOp<DigestArgs, Digest>,
    chat: AsyncOp<String, String>,

    repository: Option<RepoRef>,
    selected_commit: Option<Commit>,
    draft: String,
    page: usize,
}

impl Workbench {
    pub fn new(
        backend: Arc<dyn Backend>,
        store: Arc<PostStore>,
        commit_limit: usize,
        page_size: usize,
    ) -> Self {
        let commits = {
            let backend = Arc::clone(&backend);
            AsyncOp::new(move |(repo, limit): CommitsArgs| {
                let backend = Arc::clone(&backend);
                async move {
                    Ok(backend
                        .fetch_commits(&repo.owner, &repo.name, limit)
                        .await?)
                }
            })
        };
        let summary = {
            let backend = Arc::clone(&backend);
            AsyncOp::new(move |(commit, repo): SummaryArgs| {
                let backend = Arc::clone(&backend);
                async move {
                    Ok(backend
                        .generate_for_commit(&commit, &repo.owner, &repo.name)
                        .await?)
                }
            })
        };
        let digest = {
            let backend = Arc::clone(&backend);
            AsyncOp::new(move |(kind, repo, limit): DigestArgs| {
                let backend = Arc::clone(&backend);
                async move {
                    let digest = match kind {
                        DigestKind::Commits => {
                            backend
                                .generate_for_commits(&repo.owner, &repo.name, limit)
                                .await?
                        }
                        DigestKind::PullRequests => {
                            backend
                                .generate_for_prs(&repo.owner, &repo.name, limit)
                                .await?
                        }
                    };
                    Ok(digest)
                }
            })
        };
        let chat = AsyncOp::new(move |message: String| {
            let backend = Arc::clone(&backend);
            async move { Ok(backend.chat(&message).await?) }
        });

        Self {
            store,
            commit_limit: commit_limit.max(1),
            page_size: page_size.max(1),
            commits,
            summary,
            digest,
            chat,
            repository: None,
            selected_commit: None,
            draft: String::new(),
            page: 1,
        }
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    pub fn repository(&self) -> Option<&RepoRef> {
        self.repository.as_ref()
    }

    pub fn commits(&self) -> AsyncState<Option<Vec<Commit>>> {
        self.commits.state()
    }

    pub fn summary(&self) -> AsyncState<Option<CommitPost>> {
        self.summary.state()
    }

    pub fn digest(&self) -> AsyncState<Option<Digest>> {
        self.digest.state()
    }

    pub fn chat(&self) -> AsyncState<Option<String>> {
        self.chat.state()
    }

    pub fn selected_commit(&self) -> Option<&Commit> {
        self.selected_commit.as_ref()
    }

    // ── Commits ─────────────────────────────────────────────────────────

    /// Load the latest commits for `repository` (`owner/name` or bare name).
    ///
    /// A new repository clears the selected commit and the summary.
    pub async fn fetch_commits(
        &mut self,
        repository: &str,
        default_owner: Option<&str>,
    ) -> Result<Option<Vec<Commit>>, ValidationError> {
        let repo = RepoRef::parse(repository, default_owner)?;
        if self.repository.as_ref() != Some(&repo) {
            self.clear_selection();
        }
        self.repository = Some(repo.clone());
        Ok(self.commits.execute((repo, self.commit_limit)).await)
    }

    /// Select a fetched commit by sha prefix. Returns whether one matched.
    ///
    /// Choosing a different commit discards the previous summary.
    pub fn select_commit(&mut self, sha: &str) -> bool {
        let sha = sha.trim();
        if sha.is_empty() {
            return false;
        }
        let found = self
            .commits
            .state()
            .data
            .and_then(|commits| commits.into_iter().find(|c| c.sha.starts_with(sha)));
        match found {
            Some(commit) => {
                if self.selected_commit.as_ref().map(|c| &c.sha) != Some(&commit.sha) {
                    self.summary.reset();
                    self.draft.clear();
                }
                self.selected_commit = Some(commit);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_commit = None;
        self.summary.reset();
        self.draft.clear();
    }

    // ── Summary and draft ───────────────────────────────────────────────

    /// Generate a post for the selected commit. The draft is emptied first
    /// and filled with the generated text on success.
    pub async fn generate_summary(&mut self) -> Result<Option<String>, ValidationError> {
        let commit = self
            .selected_commit
            .clone()
            .ok_or(ValidationError::NoCommitSelected)?;
        let repo = self
            .repository
            .clone()
            .ok_or(ValidationError::EmptyRepository)?;

        self.draft.clear();
        let post = self.summary.execute((commit, repo)).await;
        if let Some(post) = &post {
            self.draft.clone_from(&post.blog_post);
        }
        Ok(post.map(|p| p.blog_post))
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Persist the draft as a post about the selected commit.
    ///
    /// The title defaults to the first line of the commit message.
    pub fn save_summary(&mut self, title: Option<&str>) -> Result<Post, ValidationError> {
        let commit = self
            .selected_commit
            .as_ref()
            .ok_or(ValidationError::NoCommitSelected)?;
        let repo = self
            .repository
            .as_ref()
            .ok_or(ValidationError::EmptyRepository)?;
        if self.draft.trim().is_empty() {
            return Err(ValidationError::NoSummary);
        }

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| commit.title());
        let post = self.store.save_post(PostDraft {
            title: title.to_string(),
            content: self.draft.clone(),
            commit_sha: commit.sha.clone(),
            commit_message: commit.commit.message.clone(),
            author: commit.author_name().to_string(),
            repository: repo.full_name(),
        });
        self.page = 1;
        Ok(post)
    }

    // ── Digest and chat ─────────────────────────────────────────────────

    pub async fn generate_digest(
        &self,
        kind: DigestKind,
        limit: Option<usize>,
    ) -> Result<Option<Digest>, ValidationError> {
        let repo = self
            .repository
            .clone()
            .ok_or(ValidationError::EmptyRepository)?;
        let limit = limit.filter(|&n| n > 0).unwrap_or(self.commit_limit);
        Ok(self.digest.execute((kind, repo, limit)).await)
    }

    /// Point digests at a repository without fetching its commits.
    pub fn set_repository(
        &mut self,
        repository: &str,
        default_owner: Option<&str>,
    ) -> Result<(), ValidationError> {
        let repo = RepoRef::parse(repository, default_owner)?;
        if self.repository.as_ref() != Some(&repo) {
            self.clear_selection();
        }
        self.repository = Some(repo);
        Ok(())
    }

    pub async fn send_chat(&self, message: &str) -> Result<Option<String>, ValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        Ok(self.chat.execute(message.to_string()).await)
    }

    // ── Saved posts ─────────────────────────────────────────────────────

    /// The current page of saved posts, clamped to what exists.
    pub fn page(&self) -> Page<Post> {
        self.store.page(self.page, self.page_size)
    }

    pub fn page_number(&self) -> usize {
        self.page
    }

    pub fn go_to_page(&mut self, requested: usize) -> usize {
        let total = self.store.posts().data.len();
        self.page = clamp_page(requested, total, self.page_size);
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.page + 1)
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Replace a saved post's title and body.
    pub fn edit_post(&self, id: &str, title: Option<&str>, content: Option<&str>) -> Mutation {
        let Some(mut post) = self.store.get_post_by_id(id) else {
            return Mutation::NotFound;
        };
        if let Some(title) = title {
            post.title = title.to_string();
        }
        if let Some(content) = content {
            post.content = content.to_string();
        }
        self.store.update_post(post)
    }

    /// Delete a saved post, stepping back a page if this one became empty.
    pub fn delete_post(&mut self, id: &str) -> Mutation {
        let outcome = self.store.delete_post(id);
        if outcome.applied() {
            self.go_to_page(self.page);
        }
        outcome
    }
}
