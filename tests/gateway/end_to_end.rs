use super::support::{Harness, commit_json, pull_json};
use serde_json::{Value, json};
use smartblog::client::{ApiClient, Backend};
use smartblog::error::ApiError;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn health_and_unknown_routes() {
    let harness = Harness::start().await;
    let root = harness.api_base.trim_end_matches("/api").to_string();
    let http = reqwest::Client::new();

    let health: Value = http
        .get(format!("{root}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let missing = http
        .get(format!("{}/nope", harness.api_base))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body, json!({"success": false, "error": "Route not found"}));

    harness.stop().await;
}

#[tokio::test]
async fn commits_pass_through_gateway_and_client() {
    let harness = Harness::start().await;
    harness
        .mock_commits(
            "octo",
            "hello",
            json!([commit_json("aaaaaaa111", "Add parser"), commit_json("bbbbbbb222", "Fix lexer")]),
        )
        .await;

    let client = ApiClient::new(&harness.api_base);
    let commits = client.fetch_commits("octo", "hello", 2).await.unwrap();

    assert_eq!(commits.len(), 2);
    assert_eq!(commits[1].title(), "Fix lexer");
    assert_eq!(commits[0].author_name(), "Ada Lovelace");

    harness.stop().await;
}

#[tokio::test]
async fn unknown_repository_message_reaches_client() {
    let harness = Harness::start().await;
    harness
        .mock_github_status(
            "octo",
            "missing",
            ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
        )
        .await;

    let err = ApiClient::new(&harness.api_base)
        .fetch_commits("octo", "missing", 10)
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Remote("Repository octo/missing not found".into()));

    harness.stop().await;
}

#[tokio::test]
async fn github_rate_limit_is_429_with_message() {
    let harness = Harness::start().await;
    harness
        .mock_github_status(
            "octo",
            "hello",
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .await;

    let response = reqwest::Client::new()
        .get(format!("{}/github/repos/octo/hello/commits", harness.api_base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 429);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "GitHub API rate limit exceeded");

    harness.stop().await;
}

#[tokio::test]
async fn commit_digest_counts_commits() {
    let harness = Harness::start().await;
    harness
        .mock_commits(
            "octo",
            "hello",
            json!([commit_json("aaaaaaa111", "Add parser"), commit_json("bbbbbbb222", "Fix lexer")]),
        )
        .await;
    harness.mock_gemini_reply("# This week in hello").await;

    let digest = ApiClient::new(&harness.api_base)
        .generate_for_commits("octo", "hello", 5)
        .await
        .unwrap();

    assert_eq!(digest.blog_post, "# This week in hello");
    assert_eq!(digest.commits_analyzed, Some(2));
    assert_eq!(digest.prs_analyzed, None);
    assert_eq!(digest.repository, "octo/hello");

    harness.stop().await;
}

#[tokio::test]
async fn pull_request_digest_counts_prs() {
    let harness = Harness::start().await;
    harness
        .mock_pulls("octo", "hello", json!([pull_json(7, "Tokenizer rewrite")]))
        .await;
    harness.mock_gemini_reply("# Pull requests").await;

    let digest = ApiClient::new(&harness.api_base)
        .generate_for_prs("octo", "hello", 5)
        .await
        .unwrap();
    assert_eq!(digest.prs_analyzed, Some(1));
    assert_eq!(digest.commits_analyzed, None);

    harness.stop().await;
}

#[tokio::test]
async fn empty_pull_request_list_is_rejected() {
    let harness = Harness::start().await;
    harness.mock_pulls("octo", "hello", json!([])).await;

    let err = ApiClient::new(&harness.api_base)
        .generate_for_prs("octo", "hello", 5)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No pull requests provided to generate blog post");

    harness.stop().await;
}

#[tokio::test]
async fn single_commit_post_carries_commit_summary() {
    let harness = Harness::start().await;
    harness.mock_gemini_reply("## Parser deep dive").await;
    let commit = serde_json::from_value(commit_json("abcdef0123456", "Add parser\n\nWith tests")).unwrap();

    let post = ApiClient::new(&harness.api_base)
        .generate_for_commit(&commit, "octo", "hello")
        .await
        .unwrap();

    assert_eq!(post.blog_post, "## Parser deep dive");
    assert_eq!(post.commit.sha, "abcdef0");
    assert_eq!(post.commit.message, "Add parser");
    assert_eq!(post.commit.author, "Ada Lovelace");

    harness.stop().await;
}

#[tokio::test]
async fn incomplete_generation_body_is_bad_request() {
    let harness = Harness::start().await;

    let response = reqwest::Client::new()
        .post(format!("{}/llm/generate/commit", harness.api_base))
        .json(&json!({"owner": "octo"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Commit data, owner, and repo are required");

    harness.stop().await;
}

#[tokio::test]
async fn gemini_failure_is_reported_generically() {
    let harness = Harness::start().await;
    harness
        .mock_gemini(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}
        })))
        .await;

    let err = ApiClient::new(&harness.api_base)
        .chat("hello")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to chat with Gemini");

    harness.stop().await;
}

#[tokio::test]
async fn missing_api_key_is_reported() {
    let harness = Harness::start_with_key(None).await;

    let err = ApiClient::new(&harness.api_base)
        .chat("hello")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Gemini API key is not configured");

    harness.stop().await;
}

#[tokio::test]
async fn chat_round_trip() {
    let harness = Harness::start().await;
    harness.mock_gemini_reply("Hi there!").await;

    let reply = ApiClient::new(&harness.api_base).chat("hello").await.unwrap();
    assert_eq!(reply, "Hi there!");

    harness.stop().await;
}
