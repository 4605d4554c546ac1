//! Configuration management for crateup

pub mod schema;

pub use schema::Config;

use crate::error::{CrateupError, CrateupResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// The path this manager reads and writes
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("crateup")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if no file exists
    pub async fn load(&self) -> CrateupResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> CrateupResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CrateupError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| CrateupError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> CrateupResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            CrateupError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> CrateupResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CrateupError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("absent.toml"));
        let config = manager.load().await.unwrap();
        assert_eq!(config.download.registry_root, "https://crates.io");
    }

    #[tokio::test]
    async fn save_and_reload() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.toml"));

        let mut config = Config::default();
        config.download.timeout_secs = 7;
        manager.save(&config).await.unwrap();

        let reloaded = manager.load().await.unwrap();
        assert_eq!(reloaded.download.timeout_secs, 7);
    }

    #[tokio::test]
    async fn invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();

        let manager = ConfigManager::with_path(path);
        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, CrateupError::ConfigInvalid { .. }));
    }

    #[test]
    fn default_path_ends_with_config_toml() {
        let path = ConfigManager::default_config_path();
        assert!(path.ends_with(Path::new("crateup").join("config.toml")));
    }
}
