#![allow(dead_code)]

use serde_json::{Value, json};
use smartblog::gateway::{AppState, run_gateway_with_listener};
use smartblog::github::GitHubClient;
use smartblog::llm::GeminiProvider;
use smartblog::writer::BlogWriter;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "AIza-integration";
pub const MODEL: &str = "gemini-2.5-flash";

/// A running gateway wired to mock GitHub and Gemini servers.
pub struct Harness {
    pub github: MockServer,
    pub gemini: MockServer,
    pub api_base: String,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_with_key(Some(API_KEY)).await
    }

    pub async fn start_with_key(api_key: Option<&str>) -> Self {
        let github = MockServer::start().await;
        let gemini = MockServer::start().await;

        let provider = GeminiProvider::with_base_url(api_key, &gemini.uri());
        let writer = BlogWriter::new(Arc::new(provider), MODEL, 0.7).expect("writer");
        let state = AppState::new(
            Arc::new(GitHubClient::new(&github.uri(), None)),
            Arc::new(writer),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            run_gateway_with_listener(listener, state, async move {
                let _ = rx.await;
            })
            .await
            .expect("gateway runs");
        });

        Self {
            github,
            gemini,
            api_base: format!("http://{addr}/api"),
            shutdown: Some(tx),
            server: Some(server),
        }
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(server) = self.server.take() {
            server.await.unwrap();
        }
    }

    pub async fn mock_commits(&self, owner: &str, repo: &str, commits: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/commits")))
            .respond_with(ResponseTemplate::new(200).set_body_json(commits))
            .mount(&self.github)
            .await;
    }

    pub async fn mock_pulls(&self, owner: &str, repo: &str, pulls: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/pulls")))
            .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
            .mount(&self.github)
            .await;
    }

    pub async fn mock_github_status(&self, owner: &str, repo: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/commits")))
            .respond_with(response)
            .mount(&self.github)
            .await;
    }

    pub async fn mock_gemini_reply(&self, text: &str) {
        self.mock_gemini(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })))
        .await;
    }

    pub async fn mock_gemini(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(format!("/models/{MODEL}:generateContent")))
            .respond_with(response)
            .mount(&self.gemini)
            .await;
    }
}

pub fn commit_json(sha: &str, message: &str) -> Value {
    json!({
        "sha": sha,
        "commit": {
            "message": message,
            "author": {"name": "Ada Lovelace", "email": "ada@example.com", "date": "2024-05-01T10:00:00Z"}
        },
        "html_url": format!("https://github.com/octo/hello/commit/{sha}"),
        "author": {"login": "ada"}
    })
}

pub fn pull_json(number: u64, title: &str) -> Value {
    json!({
        "number": number,
        "title": title,
        "state": "closed",
        "body": "Refactors the tokenizer.",
        "user": {"login": "ada"},
        "created_at": "2024-05-02T09:00:00Z",
        "html_url": format!("https://github.com/octo/hello/pull/{number}")
    })
}
