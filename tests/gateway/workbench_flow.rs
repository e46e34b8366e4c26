use super::support::{Harness, commit_json};
use serde_json::json;
use smartblog::app::{DigestKind, Workbench};
use smartblog::client::ApiClient;
use smartblog::posts::{FileBlobStore, PostStore};
use smartblog::state::AsyncStatus;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::ResponseTemplate;

fn open_store(dir: &TempDir) -> Arc<PostStore> {
    let blobs = FileBlobStore::new(dir.path()).unwrap();
    Arc::new(PostStore::open(Arc::new(blobs), "smartblog_posts"))
}

fn bench(harness: &Harness, dir: &TempDir) -> Workbench {
    Workbench::new(
        Arc::new(ApiClient::new(&harness.api_base)),
        open_store(dir),
        10,
        5,
    )
}

#[tokio::test]
async fn generate_edit_and_save_a_commit_post() {
    let harness = Harness::start().await;
    harness
        .mock_commits(
            "octo",
            "hello",
            json!([
                commit_json("aaaaaaa111", "Add parser\n\nHandles nested blocks"),
                commit_json("bbbbbbb222", "Fix lexer"),
            ]),
        )
        .await;
    harness.mock_gemini_reply("## Parsing nested blocks").await;
    let dir = TempDir::new().unwrap();

    let mut bench = bench(&harness, &dir);
    bench.fetch_commits("octo/hello", None).await.unwrap();
    assert!(bench.select_commit("aaaaaaa"));
    bench.generate_summary().await.unwrap();
    assert_eq!(bench.draft(), "## Parsing nested blocks");

    bench.set_draft("## Parsing nested blocks\n\nEdited by hand.");
    let saved = bench.save_summary(None).unwrap();
    assert_eq!(saved.title, "Add parser");

    let reopened = open_store(&dir);
    let post = reopened.get_post_by_id(&saved.id).expect("persisted");
    assert_eq!(post.content, "## Parsing nested blocks\n\nEdited by hand.");
    assert_eq!(post.commit_sha, "aaaaaaa111");
    assert_eq!(post.author, "Ada Lovelace");
    assert_eq!(post.repository, "octo/hello");

    harness.stop().await;
}

#[tokio::test]
async fn rate_limited_fetch_lands_on_commit_state() {
    let harness = Harness::start().await;
    harness
        .mock_github_status(
            "octo",
            "hello",
            ResponseTemplate::new(429).insert_header("x-ratelimit-remaining", "0"),
        )
        .await;
    let dir = TempDir::new().unwrap();

    let mut bench = bench(&harness, &dir);
    let commits = bench.fetch_commits("octo/hello", None).await.unwrap();
    let state = bench.commits();

    assert!(commits.is_none());
    assert_eq!(state.status, AsyncStatus::Error);
    assert_eq!(state.error.as_deref(), Some("GitHub API rate limit exceeded"));
    assert!(state.data.is_none());

    harness.stop().await;
}

#[tokio::test]
async fn digest_uses_the_current_repository() {
    let harness = Harness::start().await;
    harness
        .mock_commits("octo", "hello", json!([commit_json("aaaaaaa111", "Add parser")]))
        .await;
    harness.mock_gemini_reply("# Digest").await;
    let dir = TempDir::new().unwrap();

    let mut bench = bench(&harness, &dir);
    bench.set_repository("hello", Some("octo")).unwrap();
    let digest = bench
        .generate_digest(DigestKind::Commits, None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(digest.repository, "octo/hello");
    assert!(bench.digest().is_success());

    harness.stop().await;
}

#[tokio::test]
async fn stopped_gateway_gives_connect_message() {
    let harness = Harness::start().await;
    let base = harness.api_base.clone();
    harness.stop().await;
    let dir = TempDir::new().unwrap();

    let mut bench = Workbench::new(Arc::new(ApiClient::new(&base)), open_store(&dir), 10, 5);
    bench.fetch_commits("octo/hello", None).await.unwrap();

    assert_eq!(
        bench.commits().error,
        Some(format!(
            "Failed to connect to server. Make sure the backend is running at {base}."
        ))
    );
}
