use super::types::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

const CONFIG_DIR: &str = ".smartblog";
const CONFIG_FILE: &str = "config.toml";
const DATA_DIR: &str = "data";

impl Config {
    /// Load `~/.smartblog/config.toml`, writing defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(CONFIG_DIR))
    }

    /// Load or create the config file inside `dir`.
    pub fn load_or_init_in(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            tracing::info!(path = %config_path.display(), "writing default config");
            let config = Self {
                config_path: config_path.clone(),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.config_path = config_path;
        config.data_dir = dir.join(DATA_DIR);
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::Validation(format!(
                "default_temperature must be within 0.0..=2.0, got {}",
                self.default_temperature
            )));
        }
        if self.store.page_size == 0 {
            return Err(ConfigError::Validation(
                "store.page_size must be at least 1".into(),
            ));
        }
        if self.client.commit_limit == 0 {
            return Err(ConfigError::Validation(
                "client.commit_limit must be at least 1".into(),
            ));
        }
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::Validation("default_model is empty".into()));
        }
        Ok(())
    }
}
