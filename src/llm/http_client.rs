use reqwest::Client;
use std::time::Duration;

/// Request timeout for outbound API calls. Generation can take a while.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub fn build_provider_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default HTTP client");
            Client::new()
        })
}
