//! Cache-assisted source build tier
//!
//! Restores a previously built install root by cache key; on a miss,
//! compiles with `cargo install` into that root and saves it back. Either
//! way the resulting binaries are copied into the cargo bin directory and
//! the scratch root is removed. Passing no store gives the plain
//! build-from-source tier.

use crate::cache_key;
use crate::cargo;
use crate::config::Config;
use crate::error::{CrateupError, CrateupResult};
use crate::request::{FeatureOptions, VersionSpec};
use crate::runner::RunnerTag;
use crate::store::CacheStore;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Install `krate` by building from source, with an optional persistent
/// cache in front of the build.
pub async fn install(
    config: &Config,
    store: Option<&dyn CacheStore>,
    runner: &RunnerTag,
    krate: &str,
    version: &VersionSpec,
    options: &FeatureOptions,
) -> CrateupResult<()> {
    let install_root = install_root(config, krate);
    fs::create_dir_all(&install_root)
        .await
        .map_err(|e| CrateupError::io(format!("creating {}", install_root.display()), e))?;

    let key = cache_key::build(krate, &version.to_string(), runner, options);
    debug!("Cache key for {} {}: {:?}", krate, version, key);

    let restored = match store {
        Some(store) => restore_as_miss_on_error(store, &key, &install_root).await,
        None => false,
    };

    if restored {
        info!("Cache hit for {:?}, skipping build", key);
    } else {
        cargo::install(krate, version, options, &install_root).await?;

        if let Some(store) = store {
            // Best effort: the binaries already exist locally, a failed
            // save only costs the next run a rebuild.
            if let Err(e) = store.save(&key, &install_root).await {
                warn!("Failed to save cache entry {:?}: {}", key, e);
            }
        }
    }

    copy_binaries(&install_root.join("bin"), &config.install.bin_dir).await?;

    debug!("Removing temporary install root {}", install_root.display());
    if let Err(e) = fs::remove_dir_all(&install_root).await {
        warn!(
            "Failed to remove install root {}: {}",
            install_root.display(),
            e
        );
    }

    Ok(())
}

/// Crate-specific scratch root inside the build workspace. Cache backends
/// require paths under the workspace, not an OS temp directory.
fn install_root(config: &Config, krate: &str) -> PathBuf {
    config
        .install
        .workspace_dir
        .join("target")
        .join("crateup")
        .join(krate)
}

/// A restore error means we cannot tell hit from miss; treat it as a miss
/// and rebuild rather than failing the tier.
async fn restore_as_miss_on_error(store: &dyn CacheStore, key: &str, dest: &Path) -> bool {
    match store.restore(key, dest).await {
        Ok(hit) => hit,
        Err(e) => {
            warn!("Cache restore for {:?} failed, treating as miss: {}", key, e);
            false
        }
    }
}

/// Copy every file from the install root's bin directory to the
/// destination bin directory.
async fn copy_binaries(from: &Path, to: &Path) -> CrateupResult<()> {
    fs::create_dir_all(to)
        .await
        .map_err(|e| CrateupError::io(format!("creating {}", to.display()), e))?;

    let mut entries = fs::read_dir(from)
        .await
        .map_err(|e| CrateupError::io(format!("reading {}", from.display()), e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CrateupError::io(format!("reading {}", from.display()), e))?
    {
        let source = entry.path();
        let target = to.join(entry.file_name());
        debug!("Copying {} to {}", source.display(), target.display());
        fs::copy(&source, &target)
            .await
            .map_err(|e| CrateupError::io(format!("copying {}", source.display()), e))?;
    }

    Ok(())
}
