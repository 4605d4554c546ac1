//! Typed install request
//!
//! The CLI layer parses flags into an `InstallRequest`; everything past
//! the argument boundary works with this struct only.

use std::fmt;

/// Requested crate version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// Newest published version ("latest" or "*")
    Latest,
    /// Exact version string
    Exact(String),
}

impl VersionSpec {
    /// Parse a version argument, treating `latest` and `*` as sentinels.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "latest" | "*" => Self::Latest,
            other => Self::Exact(other.to_string()),
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }

    /// Exact version string, if pinned.
    pub fn exact(&self) -> Option<&str> {
        match self {
            Self::Latest => None,
            Self::Exact(v) => Some(v),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Exact(v) => write!(f, "{}", v),
        }
    }
}

/// Feature selection passed through to `cargo install`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureOptions {
    pub features: Vec<String>,
    pub all_features: bool,
    pub no_default_features: bool,
}

/// A validated request for one crate installation
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Crate name, non-empty
    pub krate: String,
    pub version: VersionSpec,
    pub options: FeatureOptions,
    /// Try the signed pre-built binary cache first
    pub use_prebuilt: bool,
    /// Use the persistent build cache before a plain source build
    pub use_build_cache: bool,
}

impl InstallRequest {
    pub fn new(krate: impl Into<String>, version: VersionSpec) -> Self {
        Self {
            krate: krate.into(),
            version,
            options: FeatureOptions::default(),
            use_prebuilt: true,
            use_build_cache: true,
        }
    }
}
