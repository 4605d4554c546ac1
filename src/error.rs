//! Error types for crateup
//!
//! All modules use `CrateupResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for crateup operations
pub type CrateupResult<T> = Result<T, CrateupError>;

/// All errors that can occur in crateup
#[derive(Error, Debug)]
pub enum CrateupError {
    // Platform errors
    #[error("Unsupported platform: {0}. crateup supports Linux, macOS and Windows runners.")]
    UnsupportedPlatform(String),

    // Registry errors
    #[error("Unable to reach the crate registry for {krate}: {reason}")]
    RegistryUnavailable { krate: String, reason: String },

    #[error("Malformed registry response for {krate}: {reason}")]
    MalformedResponse { krate: String, reason: String },

    #[error("Version for {0} is unresolved; the prebuilt cache requires an exact version")]
    VersionUnresolved(String),

    // Download errors
    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Signature verification failed for {artifact}: {reason}")]
    SignatureVerification { artifact: PathBuf, reason: String },

    #[error("Failed to extract archive {path}: {reason}")]
    ExtractFailed { path: PathBuf, reason: String },

    // Build errors
    #[error("cargo install failed for {krate}: {reason}")]
    BuildToolFailed { krate: String, reason: String },

    // Cache store errors
    #[error("Failed to restore cache entry {key}: {reason}")]
    CacheRestore { key: String, reason: String },

    #[error("Failed to save cache entry {key}: {reason}")]
    CacheSave { key: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl CrateupError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Whether a failing install tier may fall back to the next tier.
    ///
    /// Tier-local failures (registry, download, signature, build, cache
    /// restore) advance the orchestrator; anything else aborts the run.
    pub fn is_tier_local(&self) -> bool {
        matches!(
            self,
            Self::RegistryUnavailable { .. }
                | Self::MalformedResponse { .. }
                | Self::VersionUnresolved(_)
                | Self::DownloadFailed { .. }
                | Self::SignatureVerification { .. }
                | Self::ExtractFailed { .. }
                | Self::BuildToolFailed { .. }
                | Self::CacheRestore { .. }
                | Self::CommandFailed { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedPlatform(_) => Some("Run crateup on a Linux, macOS or Windows host"),
            Self::RegistryUnavailable { .. } => {
                Some("Check network access to crates.io from this runner")
            }
            Self::BuildToolFailed { .. } => Some("Check that a Rust toolchain is on PATH"),
            _ => None,
        }
    }
}
