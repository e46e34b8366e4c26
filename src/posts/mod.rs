//! Saved blog posts: the model, a reducer over it, and a store that keeps
//! the collection in sync with a local blob.

mod blob;
mod id;
mod model;
mod pagination;
mod reducer;
mod store;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use id::{generate_post_id, unique_post_id};
pub use model::{Post, PostDraft};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, clamp_page, page_count, paginate};
pub use reducer::{BlogAction, BlogState, reduce};
pub use store::{DEFAULT_STORAGE_KEY, LOAD_ERROR_MESSAGE, Mutation, PostStore};
