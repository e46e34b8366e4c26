//! HTTP client for the gateway, used by the interactive workbench.
//!
//! Every call resolves to either the payload or an [`ApiError`] whose
//! `Display` is the text shown to the user.

use crate::error::ApiError;
use crate::github::Commit;
use crate::llm::build_provider_client;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Generated post for a batch of commits or pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    pub blog_post: String,
    #[serde(default)]
    pub commits_analyzed: Option<usize>,
    #[serde(default)]
    pub prs_analyzed: Option<usize>,
    pub repository: String,
}

/// Generated post for one commit, plus the commit it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitPost {
    pub blog_post: String,
    pub commit: CommitSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
    pub author: String,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// The remote operations the workbench depends on.
pub trait Backend: Send + Sync {
    fn fetch_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> BackendFuture<'a, Vec<Commit>>;

    fn generate_for_commit<'a>(
        &'a self,
        commit: &'a Commit,
        owner: &'a str,
        repo: &'a str,
    ) -> BackendFuture<'a, CommitPost>;

    fn generate_for_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> BackendFuture<'a, Digest>;

    fn generate_for_prs<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> BackendFuture<'a, Digest>;

    fn chat<'a>(&'a self, message: &'a str) -> BackendFuture<'a, String>;
}

/// [`Backend`] over the gateway's JSON API.
pub struct ApiClient {
    base: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: build_provider_client(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn connect_error(&self, err: &reqwest::Error) -> ApiError {
        tracing::debug!(error = %err, base = %self.base, "gateway unreachable");
        ApiError::Connect {
            base: self.base.clone(),
        }
    }

    /// Send a request and unwrap the `{success, data | error}` envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &'static str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| self.connect_error(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.connect_error(&e))?;

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(%status, error = %e, "unreadable gateway response");
                return Err(ApiError::Remote(fallback.to_string()));
            }
        };

        match envelope {
            Envelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            Envelope { error, .. } => Err(ApiError::Remote(
                error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            )),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

impl Backend for ApiClient {
    fn fetch_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> BackendFuture<'a, Vec<Commit>> {
        let request = self
            .client
            .get(self.url(&format!("/github/repos/{owner}/{repo}/commits")))
            .query(&[("limit", limit)]);
        Box::pin(self.call::<Vec<Commit>>(request, "Failed to fetch commits"))
    }

    fn generate_for_commit<'a>(
        &'a self,
        commit: &'a Commit,
        owner: &'a str,
        repo: &'a str,
    ) -> BackendFuture<'a, CommitPost> {
        let request = self
            .client
            .post(self.url("/llm/generate/commit"))
            .json(&serde_json::json!({ "commit": commit, "owner": owner, "repo": repo }));
        Box::pin(self.call::<CommitPost>(request, "Failed to generate summary"))
    }

    fn generate_for_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> BackendFuture<'a, Digest> {
        let request = self
            .client
            .get(self.url(&format!("/llm/generate/commits/{owner}/{repo}")))
            .query(&[("limit", limit)]);
        Box::pin(self.call::<Digest>(request, "Failed to generate blog post"))
    }

    fn generate_for_prs<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> BackendFuture<'a, Digest> {
        let request = self
            .client
            .get(self.url(&format!("/llm/generate/prs/{owner}/{repo}")))
            .query(&[("limit", limit)]);
        Box::pin(self.call::<Digest>(request, "Failed to generate blog post"))
    }

    fn chat<'a>(&'a self, message: &'a str) -> BackendFuture<'a, String> {
        let request = self
            .client
            .post(self.url("/llm/chat"))
            .json(&serde_json::json!({ "message": message }));
        Box::pin(async move {
            let reply: ChatReply = self.call(request, "Failed to get response").await?;
            Ok(reply.response)
        })
    }
}
