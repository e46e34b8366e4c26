use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `smartblog`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; application glue continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum BlogError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── GitHub ──────────────────────────────────────────────────────────
    #[error("github: {0}")]
    GitHub(#[from] GitHubError),

    // ── Local post store ────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Gateway API client ──────────────────────────────────────────────
    #[error("api: {0}")]
    Api(#[from] ApiError),

    // ── User input ──────────────────────────────────────────────────────
    #[error("{0}")]
    Validation(#[from] ValidationError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("{provider} API error ({status}): {message}")]
    Status {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("No response from {provider}")]
    EmptyResponse { provider: String },

    #[error("prompt: {0}")]
    Prompt(String),

    /// Provider failure reported without its upstream detail.
    #[error("{0}")]
    Failed(&'static str),
}

// ─── GitHub errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("Repository {owner}/{repo} not found")]
    NotFound { owner: String, repo: String },

    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    #[error("GitHub API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),
}

// ─── Local store errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

// ─── Gateway API client errors ──────────────────────────────────────────────

/// Failure reported to the view layer. `Display` is the exact text shown to
/// the user, so remote messages pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Failed to connect to server. Make sure the backend is running at {base}.")]
    Connect { base: String },

    #[error("{0}")]
    Remote(String),

    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

// ─── Validation errors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a repository name")]
    EmptyRepository,

    #[error("Please enter a repository owner")]
    EmptyOwner,

    #[error("Repository must be owner/name using letters, digits, '.', '-' or '_'")]
    InvalidRepository,

    #[error("Message is required")]
    EmptyMessage,

    #[error("Commit data, owner, and repo are required")]
    MissingGenerationInput,

    #[error("Select a commit first")]
    NoCommitSelected,

    #[error("Generate a summary before saving")]
    NoSummary,

    #[error("No commits provided to generate blog post")]
    NoCommits,

    #[error("No pull requests provided to generate blog post")]
    NoPullRequests,
}

/// Convenience alias for results that use [`BlogError`].
pub type BlogResult<T> = std::result::Result<T, BlogError>;
