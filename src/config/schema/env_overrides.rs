use super::types::Config;
use std::path::PathBuf;

fn first_non_empty(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

impl Config {
    /// Environment variables win over the file. Unparsable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = first_non_empty(&["SMARTBLOG_GEMINI_API_KEY", "GEMINI_API_KEY"]) {
            self.api_key = Some(key);
        }

        if let Some(model) = first_non_empty(&["SMARTBLOG_MODEL"]) {
            self.default_model = model;
        }

        if let Some(temp_str) = first_non_empty(&["SMARTBLOG_TEMPERATURE"])
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.default_temperature = temp;
        }

        if let Some(token) = first_non_empty(&["SMARTBLOG_GITHUB_TOKEN", "GITHUB_TOKEN"]) {
            self.github.token = Some(token);
        }

        if let Some(host) = first_non_empty(&["SMARTBLOG_GATEWAY_HOST", "HOST"]) {
            self.gateway.host = host;
        }

        if let Some(port_str) = first_non_empty(&["SMARTBLOG_GATEWAY_PORT", "PORT"])
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Some(base) = first_non_empty(&["SMARTBLOG_API_BASE"]) {
            self.client.api_base = base;
        }

        if let Some(dir) = first_non_empty(&["SMARTBLOG_DATA_DIR"]) {
            self.data_dir = PathBuf::from(dir);
        }
    }
}
