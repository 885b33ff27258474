use super::AppConfig;
use crate::error::{ErrorCode, MarketplaceError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "MENTORHUB_CONFIG";

pub struct ConfigLoader {
    path: Option<PathBuf>,
    apply_env: bool,
}

impl ConfigLoader {
    /// Loader for `path`, or `$MENTORHUB_CONFIG` when no path is given
    pub fn new(path: Option<PathBuf>) -> Self {
        let path = path.or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));
        Self {
            path,
            apply_env: true,
        }
    }

    /// Skip environment overrides, for reproducible tests
    pub fn without_env(mut self) -> Self {
        self.apply_env = false;
        self
    }

    pub async fn load(&self) -> Result<AppConfig> {
        let mut config = match &self.path {
            Some(path) => Self::read_file(path).await?,
            None => {
                debug!("No configuration file given, using defaults");
                AppConfig::default()
            }
        };

        if self.apply_env {
            config.merge_env_vars();
        }

        config.validate()?;
        Ok(config)
    }

    async fn read_file(path: &Path) -> Result<AppConfig> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            MarketplaceError::config_with_code(
                ErrorCode::CONFIG_NOT_FOUND,
                format!("Cannot read configuration file {}", path.display()),
            )
            .with_source(e)
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            MarketplaceError::config_with_code(
                ErrorCode::CONFIG_INVALID_TOML,
                format!("Invalid configuration in {}", path.display()),
            )
            .with_source(e)
        })?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
