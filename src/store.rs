//! Persistent key-value store for built install trees
//!
//! The build-cache tier saves whole install roots keyed by cache key and
//! restores them on later runs. The backend sits behind a trait so the
//! orchestration can be tested without touching a real store.

use crate::error::{CrateupError, CrateupResult};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory-tree blob store keyed by cache key
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Restore the tree saved under `key` into `dest`.
    ///
    /// Returns `false` when no entry exists (a cache miss).
    async fn restore(&self, key: &str, dest: &Path) -> CrateupResult<bool>;

    /// Save the tree at `src` under `key`, replacing any previous entry.
    async fn save(&self, key: &str, src: &Path) -> CrateupResult<()>;
}

/// Store entries as plain directories under a configured root
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Entry location for a key, or the reason the key is unusable.
    ///
    /// Derived keys never contain path components, but the trait is
    /// public; a key that could escape the store root is refused.
    fn entry_path(&self, key: &str) -> Result<PathBuf, String> {
        if key.is_empty() {
            return Err("empty cache key".to_string());
        }
        if key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(format!("cache key {:?} contains path components", key));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl CacheStore for DirStore {
    async fn restore(&self, key: &str, dest: &Path) -> CrateupResult<bool> {
        let entry = self
            .entry_path(key)
            .map_err(|reason| CrateupError::CacheRestore {
                key: key.to_string(),
                reason,
            })?;
        if !entry.exists() {
            debug!("Cache miss for key {:?}", key);
            return Ok(false);
        }

        info!("Restoring cache entry {:?} into {}", key, dest.display());
        let dest = dest.to_path_buf();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            copy_tree(&entry, &dest).map_err(|e| CrateupError::CacheRestore {
                key,
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| CrateupError::Internal(format!("restore task panicked: {}", e)))??;

        Ok(true)
    }

    async fn save(&self, key: &str, src: &Path) -> CrateupResult<()> {
        let entry = self.entry_path(key).map_err(|reason| CrateupError::CacheSave {
            key: key.to_string(),
            reason,
        })?;
        info!("Saving {} under cache key {:?}", src.display(), key);

        let src = src.to_path_buf();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            let save = || -> std::io::Result<()> {
                if entry.exists() {
                    fs::remove_dir_all(&entry)?;
                }
                copy_tree(&src, &entry)
            };
            save().map_err(|e| CrateupError::CacheSave {
                key,
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| CrateupError::Internal(format!("save task panicked: {}", e)))?
    }
}

/// Recursively copy a directory tree. Symlinks are followed; the trees
/// involved here are cargo install roots, which contain none.
fn copy_tree(src: &Path, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
