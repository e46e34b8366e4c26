use super::types::{Commit, PullRequest};
use crate::error::GitHubError;
use crate::llm::{build_provider_client, sanitize_api_error};
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Items fetched when the caller does not say how many.
pub const DEFAULT_LIMIT: usize = 10;
/// GitHub's `per_page` ceiling.
pub const MAX_LIMIT: usize = 100;

const USER_AGENT: &str = concat!("smartblog/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// Clamp a requested item count into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_LIMIT)
}

/// Read access to a repository's history.
pub trait RepositorySource: Send + Sync {
    /// Most recent commits on the default branch, newest first.
    fn fetch_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Commit>, GitHubError>> + Send + 'a>>;

    /// Most recently created pull requests in any state.
    fn fetch_pull_requests<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PullRequest>, GitHubError>> + Send + 'a>>;
}

/// GitHub REST API client.
pub struct GitHubClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToOwned::to_owned),
            client: build_provider_client(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        owner: &str,
        repo: &str,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T, GitHubError> {
        let url = format!("{}/repos/{owner}/{repo}/{resource}", self.base_url);
        tracing::debug!(%url, "GitHub request");

        let mut request = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let rate_limited = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");
        let body = response.text().await.unwrap_or_default();

        Err(match status {
            StatusCode::NOT_FOUND => GitHubError::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
            },
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if rate_limited => {
                GitHubError::RateLimited
            }
            _ => GitHubError::Status {
                status: status.as_u16(),
                message: sanitize_api_error(&github_message(&body)),
            },
        })
    }
}

/// GitHub error bodies are `{"message": "..."}`; fall back to the raw text.
fn github_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

impl RepositorySource for GitHubClient {
    fn fetch_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Commit>, GitHubError>> + Send + 'a>> {
        Box::pin(async move {
            let per_page = clamp_limit(limit);
            let commits: Vec<Commit> = self
                .get_json(owner, repo, "commits", &[("per_page", per_page.to_string())])
                .await?;
            tracing::info!(owner, repo, count = commits.len(), "fetched commits");
            Ok(commits)
        })
    }

    fn fetch_pull_requests<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PullRequest>, GitHubError>> + Send + 'a>> {
        Box::pin(async move {
            let per_page = clamp_limit(limit);
            let pulls: Vec<PullRequest> = self
                .get_json(
                    owner,
                    repo,
                    "pulls",
                    &[
                        ("state", "all".to_string()),
                        ("sort", "created".to_string()),
                        ("direction", "desc".to_string()),
                        ("per_page", per_page.to_string()),
                    ],
                )
                .await?;
            tracing::info!(owner, repo, count = pulls.len(), "fetched pull requests");
            Ok(pulls)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn commit_json(sha: &str, message: &str) -> serde_json::Value {
        json!({
            "sha": sha,
            "commit": {"message": message, "author": {"name": "alice", "date": "2024-05-01T10:00:00Z"}},
            "html_url": format!("https://github.com/o/r/commit/{sha}")
        })
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(10), 10);
        assert_eq!(clamp_limit(500), MAX_LIMIT);
    }

    #[test]
    fn blank_token_is_ignored() {
        assert!(!GitHubClient::new(DEFAULT_API_BASE, Some("  ")).is_authenticated());
        assert!(GitHubClient::new(DEFAULT_API_BASE, Some("ghp_x")).is_authenticated());
    }

    #[tokio::test]
    async fn fetches_commits_with_limit_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/commits"))
            .and(query_param("per_page", "2"))
            .and(header("authorization", "Bearer ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                commit_json("aaaaaaaaaa", "First\n\nbody"),
                commit_json("bbbbbbbbbb", "Second"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), Some("ghp_test"));
        let commits = client.fetch_commits("octo", "hello", 2).await.unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].title(), "First");
        assert_eq!(commits[1].short_sha(), "bbbbbbb");
        server.verify().await;
    }

    #[tokio::test]
    async fn missing_repository_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/nope/commits"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), None);
        let err = client.fetch_commits("octo", "nope", 10).await.unwrap_err();

        assert!(matches!(err, GitHubError::NotFound { .. }));
        assert_eq!(err.to_string(), "Repository octo/nope not found");
    }

    #[tokio::test]
    async fn exhausted_quota_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .set_body_json(json!({"message": "API rate limit exceeded"})),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), None);
        let err = client.fetch_pull_requests("octo", "hello", 5).await.unwrap_err();
        assert!(matches!(err, GitHubError::RateLimited));
    }

    #[tokio::test]
    async fn other_failures_carry_github_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/commits"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"message": "Git Repository is empty."})),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), None);
        let err = client.fetch_commits("octo", "hello", 5).await.unwrap_err();
        assert_eq!(err.to_string(), "GitHub API error (409): Git Repository is empty.");
    }

    #[tokio::test]
    async fn fetches_pull_requests_in_all_states() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls"))
            .and(query_param("state", "all"))
            .and(query_param("per_page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "number": 1,
                "title": "Add feature",
                "state": "closed",
                "body": "Details",
                "user": {"login": "bob"},
                "created_at": "2024-02-01T00:00:00Z",
                "html_url": "https://github.com/octo/hello/pull/1"
            }])))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), None);
        let pulls = client.fetch_pull_requests("octo", "hello", 3).await.unwrap();
        assert_eq!(pulls.len(), 1);
        assert_eq!(pulls[0].user.login, "bob");
    }
}
