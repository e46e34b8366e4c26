use crate::client::DEFAULT_API_BASE as DEFAULT_CLIENT_API_BASE;
use crate::github::{DEFAULT_API_BASE as DEFAULT_GITHUB_API_BASE, DEFAULT_LIMIT};
use crate::llm::gemini::DEFAULT_MODEL;
use crate::posts::{DEFAULT_PAGE_SIZE, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Top-level config ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Where saved posts live. Resolved at load time; never persisted.
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Gemini API key.
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,

    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_temperature() -> f64 {
    0.7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            data_dir: PathBuf::new(),
            api_key: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            github: GitHubConfig::default(),
            gateway: GatewayConfig::default(),
            client: ClientConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

// ── GitHub ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Personal access token; raises the anonymous rate limit.
    pub token: Option<String>,
    #[serde(default = "default_github_api_base")]
    pub api_base: String,
    /// Owner used when the CLI is given a bare repository name.
    pub default_owner: Option<String>,
}

fn default_github_api_base() -> String {
    DEFAULT_GITHUB_API_BASE.into()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: default_github_api_base(),
            default_owner: None,
        }
    }
}

// ── Gateway ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_host")]
    pub host: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    3000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

// ── Workbench client ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the gateway's `/api` prefix.
    #[serde(default = "default_client_api_base")]
    pub api_base: String,
    #[serde(default = "default_commit_limit")]
    pub commit_limit: usize,
}

fn default_client_api_base() -> String {
    DEFAULT_CLIENT_API_BASE.into()
}

fn default_commit_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_client_api_base(),
            commit_limit: default_commit_limit(),
        }
    }
}

// ── Post store ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.into()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            page_size: default_page_size(),
        }
    }
}
