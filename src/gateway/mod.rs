//! Axum HTTP gateway exposing the GitHub and blog-writing services as JSON.
//!
//! Every `/api` response uses one envelope:
//! - `{"success": true, "data": ...}` on success
//! - `{"success": false, "error": "..."}` with a non-2xx status on failure

mod handlers;

use handlers::{
    handle_chat, handle_commits, handle_generate_from_commit, handle_generate_from_commits,
    handle_generate_from_prs, handle_health, handle_not_found,
};
pub use handlers::{ChatBody, GenerateCommitBody, LimitQuery};

use crate::config::Config;
use crate::github::{GitHubClient, RepositorySource};
use crate::llm::{GeminiProvider, Provider};
use crate::writer::BlogWriter;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB).
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout. Generation round-trips to the LLM are slow.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<dyn RepositorySource>,
    pub writer: Arc<BlogWriter>,
}

impl AppState {
    pub fn new(github: Arc<dyn RepositorySource>, writer: Arc<BlogWriter>) -> Self {
        Self { github, writer }
    }

    /// Wire the GitHub client and Gemini-backed writer from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let github = GitHubClient::new(&config.github.api_base, config.github.token.as_deref());
        let provider: Arc<dyn Provider> = Arc::new(GeminiProvider::new(config.api_key.as_deref()));
        if !provider.is_configured() {
            tracing::warn!("Gemini API key is not configured; generation routes will fail");
        }
        let writer = BlogWriter::new(provider, &config.default_model, config.default_temperature)
            .context("failed to build prompt templates")?;
        Ok(Self::new(Arc::new(github), Arc::new(writer)))
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/github/repos/{owner}/{repo}/commits", get(handle_commits))
        .route(
            "/llm/generate/commits/{owner}/{repo}",
            get(handle_generate_from_commits),
        )
        .route(
            "/llm/generate/prs/{owner}/{repo}",
            get(handle_generate_from_prs),
        )
        .route("/llm/generate/commit", post(handle_generate_from_commit))
        .route("/llm/chat", post(handle_chat));

    Router::new()
        .route("/health", get(handle_health))
        .nest("/api", api)
        .fallback(handle_not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn run_gateway(host: &str, port: u16, config: &Config) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid gateway address {host}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let state = AppState::from_config(config)?;
    run_gateway_with_listener(listener, state, shutdown_signal()).await
}

/// Serve on a pre-bound listener until `shutdown` resolves.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "gateway listening");
    println!("◆ smartblog gateway on http://{addr}");
    println!("  GET  /health");
    println!("  GET  /api/github/repos/:owner/:repo/commits");
    println!("  GET  /api/llm/generate/commits/:owner/:repo");
    println!("  GET  /api/llm/generate/prs/:owner/:repo");
    println!("  POST /api/llm/generate/commit");
    println!("  POST /api/llm/chat");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
