//! `cargo install` invocation
//!
//! The build tiers compile into a throwaway install root; argument
//! assembly is kept separate from execution so the exact command line is
//! unit-testable.

use crate::error::{CrateupError, CrateupResult};
use crate::request::{FeatureOptions, VersionSpec};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Build the full `cargo install` argument list.
///
/// `--version` is omitted for the latest sentinel; cargo then picks the
/// newest published version itself.
pub fn install_args(
    krate: &str,
    version: &VersionSpec,
    options: &FeatureOptions,
    install_root: &Path,
) -> Vec<String> {
    let mut args = vec!["install".to_string(), krate.to_string()];

    if let Some(version) = version.exact() {
        args.push("--version".to_string());
        args.push(version.to_string());
    }
    if options.all_features {
        args.push("--all-features".to_string());
    }
    if options.no_default_features {
        args.push("--no-default-features".to_string());
    }
    if !options.features.is_empty() {
        args.push("--features".to_string());
        args.push(options.features.join(","));
    }

    args.push("--root".to_string());
    args.push(install_root.display().to_string());
    args.push("--no-track".to_string());

    args
}

/// Compile and install `krate` into `install_root`.
///
/// cargo's own output is passed through so build progress and compiler
/// errors stay visible in the CI log.
pub async fn install(
    krate: &str,
    version: &VersionSpec,
    options: &FeatureOptions,
    install_root: &Path,
) -> CrateupResult<()> {
    let args = install_args(krate, version, options, install_root);
    debug!("Executing: cargo {:?}", args);
    info!("Building {} {} from source", krate, version);

    let status = Command::new("cargo")
        .args(&args)
        .status()
        .await
        .map_err(|e| CrateupError::command_failed(format!("cargo {:?}", args), e))?;

    if status.success() {
        Ok(())
    } else {
        Err(CrateupError::BuildToolFailed {
            krate: krate.to_string(),
            reason: format!("exit status {}", status),
        })
    }
}
