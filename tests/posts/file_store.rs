use smartblog::posts::{FileBlobStore, LOAD_ERROR_MESSAGE, Mutation, PostDraft, PostStore};
use smartblog::state::AsyncStatus;
use std::sync::Arc;
use tempfile::TempDir;

const KEY: &str = "smartblog_posts";

fn open(dir: &TempDir) -> PostStore {
    let blobs = FileBlobStore::new(dir.path()).expect("store dir");
    PostStore::open(Arc::new(blobs), KEY)
}

fn draft(title: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        content: format!("## {title}\n\nBody"),
        commit_sha: "0123456789abcdef".into(),
        commit_message: format!("{title}\n\nDetails"),
        author: "Ada".into(),
        repository: "octo/hello".into(),
    }
}

#[test]
fn posts_survive_reopening_newest_first() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let first = store.save_post(draft("First"));
    let second = store.save_post(draft("Second"));
    drop(store);

    let reopened = open(&dir);
    let posts = reopened.posts();
    assert_eq!(posts.status, AsyncStatus::Success);
    let ids: Vec<_> = posts.data.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn blob_is_a_camel_case_json_array() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.save_post(draft("Only"));

    let raw = std::fs::read_to_string(dir.path().join(format!("{KEY}.json"))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &value.as_array().expect("array")[0];

    for field in ["id", "title", "content", "commitSha", "commitMessage", "author", "repository", "createdAt", "updatedAt"] {
        assert!(entry.get(field).is_some(), "missing {field}");
    }
}

#[test]
fn edits_and_deletes_are_persisted() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let keep = store.save_post(draft("Keep"));
    let gone = store.save_post(draft("Gone"));

    let mut edited = keep.clone();
    edited.title = "Kept and edited".into();
    edited.repository = "someone/else".into();
    assert_eq!(store.update_post(edited), Mutation::Applied);
    assert_eq!(store.delete_post(&gone.id), Mutation::Applied);
    assert_eq!(store.delete_post(&gone.id), Mutation::NotFound);
    drop(store);

    let reopened = open(&dir);
    let posts = reopened.posts().data;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Kept and edited");
    assert_eq!(posts[0].repository, "octo/hello");
    assert_eq!(posts[0].created_at, keep.created_at);
    assert!(posts[0].updated_at >= keep.updated_at);
}

#[test]
fn corrupt_blob_reports_error_and_is_left_alone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(format!("{KEY}.json"));
    std::fs::write(&path, "[{\"id\": ").unwrap();

    let store = open(&dir);
    let posts = store.posts();
    assert_eq!(posts.status, AsyncStatus::Error);
    assert_eq!(posts.error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert!(posts.data.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{\"id\": ");
}

#[test]
fn missing_blob_is_an_empty_collection() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let posts = store.posts();
    assert_eq!(posts.status, AsyncStatus::Success);
    assert!(posts.data.is_empty());
    assert_eq!(store.page(3, 5).number, 1);
}
