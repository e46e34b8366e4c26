use super::Post;
use crate::state::{AsyncState, AsyncStatus};

/// Everything the post store owns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlogState {
    pub posts: AsyncState<Vec<Post>>,
    pub selected_post_id: Option<String>,
}

impl BlogState {
    pub fn selected_post(&self) -> Option<&Post> {
        let id = self.selected_post_id.as_deref()?;
        self.posts.data.iter().find(|post| post.id == id)
    }
}

/// State transitions understood by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogAction {
    PostsLoading,
    PostsLoaded(Vec<Post>),
    PostsFailed(String),
    Add(Post),
    Update(Post),
    Delete(String),
    Select(Option<String>),
}

impl BlogAction {
    /// Whether this action edits the collection itself (and so must be
    /// written through to durable storage).
    pub fn mutates_collection(&self) -> bool {
        matches!(self, Self::Add(_) | Self::Update(_) | Self::Delete(_))
    }
}

/// Pure transition function: `(state, action) -> state`.
pub fn reduce(state: &BlogState, action: BlogAction) -> BlogState {
    match action {
        BlogAction::PostsLoading => BlogState {
            posts: AsyncState {
                status: AsyncStatus::Loading,
                data: state.posts.data.clone(),
                error: None,
            },
            selected_post_id: state.selected_post_id.clone(),
        },
        BlogAction::PostsLoaded(posts) => BlogState {
            posts: AsyncState {
                status: AsyncStatus::Success,
                data: posts,
                error: None,
            },
            selected_post_id: state.selected_post_id.clone(),
        },
        BlogAction::PostsFailed(message) => BlogState {
            posts: AsyncState {
                status: AsyncStatus::Error,
                data: state.posts.data.clone(),
                error: Some(message),
            },
            selected_post_id: state.selected_post_id.clone(),
        },
        BlogAction::Add(post) => {
            let mut data = Vec::with_capacity(state.posts.data.len() + 1);
            data.push(post);
            data.extend(state.posts.data.iter().cloned());
            with_posts(state, data)
        }
        BlogAction::Update(updated) => {
            let data = state
                .posts
                .data
                .iter()
                .map(|post| {
                    if post.id == updated.id {
                        updated.clone()
                    } else {
                        post.clone()
                    }
                })
                .collect();
            with_posts(state, data)
        }
        BlogAction::Delete(id) => {
            let data = state
                .posts
                .data
                .iter()
                .filter(|post| post.id != id)
                .cloned()
                .collect();
            let mut next = with_posts(state, data);
            if next.selected_post_id.as_deref() == Some(id.as_str()) {
                next.selected_post_id = None;
            }
            next
        }
        BlogAction::Select(id) => BlogState {
            posts: state.posts.clone(),
            selected_post_id: id,
        },
    }
}

fn with_posts(state: &BlogState, data: Vec<Post>) -> BlogState {
    BlogState {
        posts: AsyncState {
            status: state.posts.status,
            data,
            error: state.posts.error.clone(),
        },
        selected_post_id: state.selected_post_id.clone(),
    }
}
