use super::blob::BlobStore;
use super::id::unique_post_id;
use super::pagination::{Page, paginate};
use super::reducer::{BlogAction, BlogState, reduce};
use super::{Post, PostDraft};
use crate::error::StoreError;
use crate::state::AsyncState;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Blob key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "smartblog_posts";

/// Shown when the stored collection cannot be read or parsed.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load posts from storage";

/// Outcome of an update, delete or select that names a post by id.
///
/// An unknown id leaves state untouched; `NotFound` lets callers notice
/// without turning it into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    NotFound,
}

impl Mutation {
    pub fn applied(self) -> bool {
        self == Self::Applied
    }
}

/// Owner of the saved-post collection.
///
/// All state changes go through [`reduce`]. After any action that edits
/// the collection, the whole list is written to the blob store, but only
/// while the collection status is `success`: a write during `loading` or
/// `error` could replace durable data with a stale or empty list.
///
/// Mutations and loads are serialized by an internal lock, so the blob is
/// never read while a mutation is being applied.
pub struct PostStore {
    state: watch::Sender<BlogState>,
    blobs: Arc<dyn BlobStore>,
    key: String,
    writer: Mutex<()>,
}

impl PostStore {
    pub fn new(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(BlogState::default());
        Self {
            state,
            blobs,
            key: key.into(),
            writer: Mutex::new(()),
        }
    }

    /// Create a store and immediately run [`PostStore::load_posts`].
    pub fn open(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        let store = Self::new(blobs, key);
        store.load_posts();
        store
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Snapshot of the whole state.
    pub fn state(&self) -> BlogState {
        self.state.borrow().clone()
    }

    /// Snapshot of the collection envelope.
    pub fn posts(&self) -> AsyncState<Vec<Post>> {
        self.state.borrow().posts.clone()
    }

    /// Observe every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<BlogState> {
        self.state.subscribe()
    }

    /// Apply an action through the reducer, writing through when required.
    pub fn dispatch(&self, action: BlogAction) {
        let _guard = self.lock();
        self.apply(action);
    }

    /// Read the collection from the blob store.
    ///
    /// A missing blob is an empty collection, not an error.
    pub fn load_posts(&self) {
        let _guard = self.lock();
        self.apply(BlogAction::PostsLoading);

        match self.read_blob() {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), key = %self.key, "loaded posts");
                self.apply(BlogAction::PostsLoaded(posts));
            }
            Err(error) => {
                tracing::warn!(%error, key = %self.key, "failed to load posts");
                self.apply(BlogAction::PostsFailed(LOAD_ERROR_MESSAGE.to_string()));
            }
        }
    }

    /// Turn a draft into a stored post, newest first.
    ///
    /// The in-memory add is immediate. Persistence failures are logged and
    /// never surface here.
    pub fn save_post(&self, draft: PostDraft) -> Post {
        let _guard = self.lock();
        let now = Utc::now();
        let id = {
            let state = self.state.borrow();
            unique_post_id(now, |candidate| {
                state.posts.data.iter().any(|post| post.id == candidate)
            })
        };

        let post = draft.into_post(id, now);
        tracing::info!(id = %post.id, repository = %post.repository, "saved post");
        self.apply(BlogAction::Add(post.clone()));
        post
    }

    /// Replace the stored post with the same id.
    ///
    /// Only `title` and `content` are taken from `post`; identity,
    /// provenance and `created_at` stay as stored. `updated_at` becomes now,
    /// never moving backwards.
    pub fn update_post(&self, post: Post) -> Mutation {
        let _guard = self.lock();
        let Some(existing) = self.find(&post.id) else {
            tracing::debug!(id = %post.id, "update of unknown post ignored");
            return Mutation::NotFound;
        };

        let updated = Post {
            title: post.title,
            content: post.content,
            updated_at: Utc::now().max(existing.updated_at),
            ..existing
        };
        self.apply(BlogAction::Update(updated));
        Mutation::Applied
    }

    /// Remove a post; clears the selection if it pointed at it.
    pub fn delete_post(&self, id: &str) -> Mutation {
        let _guard = self.lock();
        if self.find(id).is_none() {
            tracing::debug!(id, "delete of unknown post ignored");
            return Mutation::NotFound;
        }
        tracing::info!(id, "deleted post");
        self.apply(BlogAction::Delete(id.to_string()));
        Mutation::Applied
    }

    /// Select a post by id, or clear the selection with `None`.
    pub fn select_post(&self, id: Option<&str>) -> Mutation {
        let _guard = self.lock();
        if let Some(id) = id
            && self.find(id).is_none()
        {
            return Mutation::NotFound;
        }
        self.apply(BlogAction::Select(id.map(ToString::to_string)));
        Mutation::Applied
    }

    pub fn get_post_by_id(&self, id: &str) -> Option<Post> {
        self.find(id)
    }

    pub fn selected_post(&self) -> Option<Post> {
        self.state.borrow().selected_post().cloned()
    }

    /// One page of the collection, newest first.
    pub fn page(&self, requested: usize, page_size: usize) -> Page<Post> {
        paginate(&self.state.borrow().posts.data, requested, page_size)
    }

    fn find(&self, id: &str) -> Option<Post> {
        self.state
            .borrow()
            .posts
            .data
            .iter()
            .find(|post| post.id == id)
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, action: BlogAction) {
        let write_through = action.mutates_collection();
        let mut snapshot = None;

        self.state.send_if_modified(|state| {
            let next = reduce(state, action);
            if next == *state {
                return false;
            }
            if write_through && next.posts.is_success() && next.posts.data != state.posts.data {
                snapshot = Some(next.posts.data.clone());
            }
            *state = next;
            true
        });

        if let Some(posts) = snapshot
            && let Err(error) = self.write_blob(&posts)
        {
            tracing::warn!(%error, key = %self.key, "failed to persist posts");
        }
    }

    fn read_blob(&self) -> Result<Vec<Post>, StoreError> {
        let Some(raw) = self.blobs.read(&self.key)? else {
            return Ok(Vec::new());
        };
        let posts: Vec<Post> = serde_json::from_str(&raw)?;
        Ok(dedupe_ids(posts))
    }

    fn write_blob(&self, posts: &[Post]) -> Result<(), StoreError> {
        let json = serde_json::to_string(posts)?;
        self.blobs.write(&self.key, &json)
    }
}

/// Keep the first occurrence of each id.
fn dedupe_ids(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::with_capacity(posts.len());
    let before = posts.len();
    let unique: Vec<Post> = posts
        .into_iter()
        .filter(|post| seen.insert(post.id.clone()))
        .collect();
    if unique.len() != before {
        tracing::warn!(
            dropped = before - unique.len(),
            "stored posts contained duplicate ids"
        );
    }
    unique
}
