use crate::error::{BlogError, GitHubError, ValidationError};
use crate::github::{Commit, DEFAULT_LIMIT};
use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;

/// `?limit=N`; kept as text so junk falls back to the default instead of 400.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

impl LimitQuery {
    /// Requested count, or the default when absent, unparsable or zero.
    pub fn resolve(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_LIMIT)
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateCommitBody {
    pub commit: Option<Commit>,
    pub owner: Option<String>,
    pub repo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DigestPayload {
    blog_post: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    commits_analyzed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prs_analyzed: Option<usize>,
    repository: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommitPostPayload {
    blog_post: String,
    commit: CommitSummary,
}

#[derive(Debug, Serialize)]
struct CommitSummary {
    sha: String,
    message: String,
    author: String,
}

fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "data": data }))).into_response()
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    if status.is_server_error() {
        tracing::error!(%status, error = %message, "request failed");
    } else {
        tracing::warn!(%status, error = %message, "request rejected");
    }
    (
        status,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Map a domain error onto an HTTP status and the user-facing message.
fn error_response(err: BlogError) -> Response {
    let status = match &err {
        BlogError::Validation(_) => StatusCode::BAD_REQUEST,
        BlogError::GitHub(GitHubError::NotFound { .. }) => StatusCode::NOT_FOUND,
        BlogError::GitHub(GitHubError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
        BlogError::GitHub(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match err {
        BlogError::Validation(e) => e.to_string(),
        BlogError::GitHub(e) => e.to_string(),
        BlogError::Llm(e) => e.to_string(),
        other => other.to_string(),
    };
    failure(status, message)
}

fn repository(owner: &str, repo: &str) -> String {
    format!("{owner}/{repo}")
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /api/github/repos/{owner}/{repo}/commits
pub(super) async fn handle_commits(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<LimitQuery>,
) -> Response {
    match state.github.fetch_commits(&owner, &repo, query.resolve()).await {
        Ok(commits) => success(commits),
        Err(e) => error_response(e.into()),
    }
}

async fn commits_digest(
    state: &AppState,
    owner: &str,
    repo: &str,
    limit: usize,
) -> Result<DigestPayload, BlogError> {
    let commits = state.github.fetch_commits(owner, repo, limit).await?;
    let blog_post = state
        .writer
        .generate_from_commits(&commits, owner, repo)
        .await?;
    Ok(DigestPayload {
        blog_post,
        commits_analyzed: Some(commits.len()),
        prs_analyzed: None,
        repository: repository(owner, repo),
    })
}

async fn pull_requests_digest(
    state: &AppState,
    owner: &str,
    repo: &str,
    limit: usize,
) -> Result<DigestPayload, BlogError> {
    let pulls = state.github.fetch_pull_requests(owner, repo, limit).await?;
    let blog_post = state
        .writer
        .generate_from_pull_requests(&pulls, owner, repo)
        .await?;
    Ok(DigestPayload {
        blog_post,
        commits_analyzed: None,
        prs_analyzed: Some(pulls.len()),
        repository: repository(owner, repo),
    })
}

/// GET /api/llm/generate/commits/{owner}/{repo}
pub(super) async fn handle_generate_from_commits(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<LimitQuery>,
) -> Response {
    match commits_digest(&state, &owner, &repo, query.resolve()).await {
        Ok(payload) => success(payload),
        Err(e) => error_response(e),
    }
}

/// GET /api/llm/generate/prs/{owner}/{repo}
pub(super) async fn handle_generate_from_prs(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<LimitQuery>,
) -> Response {
    match pull_requests_digest(&state, &owner, &repo, query.resolve()).await {
        Ok(payload) => success(payload),
        Err(e) => error_response(e),
    }
}

/// POST /api/llm/generate/commit
pub(super) async fn handle_generate_from_commit(
    State(state): State<AppState>,
    body: Result<Json<GenerateCommitBody>, JsonRejection>,
) -> Response {
    let missing = || error_response(ValidationError::MissingGenerationInput.into());

    let Ok(Json(body)) = body else {
        return missing();
    };
    let (Some(commit), Some(owner), Some(repo)) = (body.commit, body.owner, body.repo) else {
        return missing();
    };
    if owner.trim().is_empty() || repo.trim().is_empty() {
        return missing();
    }

    match state.writer.generate_from_commit(&commit, &owner, &repo).await {
        Ok(blog_post) => success(CommitPostPayload {
            blog_post,
            commit: CommitSummary {
                sha: commit.short_sha().to_string(),
                message: commit.title().to_string(),
                author: commit.author_name().to_string(),
            },
        }),
        Err(e) => error_response(e),
    }
}

/// POST /api/llm/chat
pub(super) async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Response {
    let message = body
        .ok()
        .and_then(|Json(body)| body.message)
        .filter(|m| !m.trim().is_empty());
    let Some(message) = message else {
        return error_response(ValidationError::EmptyMessage.into());
    };

    match state.writer.chat(&message).await {
        Ok(response) => success(json!({ "response": response })),
        Err(e) => error_response(e),
    }
}

/// Fallback for unknown paths, in the same envelope.
pub(super) async fn handle_not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "Route not found")
}
