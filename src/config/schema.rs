//! Configuration schema for crateup
//!
//! Configuration is stored at `~/.config/crateup/config.toml`. Every field
//! has a default, so a missing file means a fully usable config. Ambient
//! environment (the Actions workspace path) is read once here, at
//! construction, and carried explicitly afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Artifact download settings
    pub download: DownloadConfig,

    /// Install destination settings
    pub install: InstallConfig,

    /// Persistent build-cache settings
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download: DownloadConfig::default(),
            install: InstallConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Bounded timeout applied to every registry query and download
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.download.timeout_secs)
    }
}

/// Pre-built artifact download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Content-distribution root serving signed pre-built binaries
    pub distribution_root: String,

    /// Crate registry API root
    pub registry_root: String,

    /// Timeout in seconds for registry queries and downloads
    pub timeout_secs: u64,

    /// Path to a signing public key overriding the bundled one
    pub public_key: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            distribution_root: "https://d1ad61wkrfbmp3.cloudfront.net".to_string(),
            registry_root: "https://crates.io".to_string(),
            timeout_secs: 30,
            public_key: None,
        }
    }
}

/// Where installed binaries and scratch build roots live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Destination for installed binaries
    pub bin_dir: PathBuf,

    /// Workspace root for temporary install roots; build-cache backends
    /// require paths inside the build workspace, not an OS temp dir
    pub workspace_dir: PathBuf,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            bin_dir: default_bin_dir(),
            workspace_dir: default_workspace_dir(),
        }
    }
}

/// Persistent build-cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root directory of the key-value directory store
    pub root: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("crateup")
                .join("store"),
        }
    }
}

fn default_bin_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cargo")
        .join("bin")
}

fn default_workspace_dir() -> PathBuf {
    std::env::var_os("GITHUB_WORKSPACE")
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert!(config.download.distribution_root.starts_with("https://"));
        assert_eq!(config.download.registry_root, "https://crates.io");
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert!(config.install.bin_dir.ends_with("bin"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[download]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.download.timeout_secs, 5);
        assert_eq!(config.download.registry_root, "https://crates.io");
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.download.distribution_root, config.download.distribution_root);
        assert_eq!(back.cache.root, config.cache.root);
    }

    #[test]
    #[serial]
    fn workspace_dir_honors_actions_env() {
        std::env::set_var("GITHUB_WORKSPACE", "/tmp/crateup-ws");
        let config = Config::default();
        assert_eq!(config.install.workspace_dir, PathBuf::from("/tmp/crateup-ws"));
        std::env::remove_var("GITHUB_WORKSPACE");
    }

    #[test]
    #[serial]
    fn workspace_dir_falls_back_to_cwd() {
        std::env::remove_var("GITHUB_WORKSPACE");
        let config = Config::default();
        assert_eq!(
            config.install.workspace_dir,
            std::env::current_dir().unwrap()
        );
    }
}
