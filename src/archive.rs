//! Zip extraction for pre-built artifacts
//!
//! Artifacts contain the crate's binaries at the archive root. Entries
//! with absolute paths or parent-directory components are rejected.

use crate::error::{CrateupError, CrateupResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extract a zip archive into `dest_dir`, creating it if needed.
///
/// Returns the paths of the extracted files. Every failure, filesystem
/// ones included, maps to `ExtractFailed` so the tier it runs in can
/// fall back instead of aborting the run.
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> CrateupResult<Vec<PathBuf>> {
    let extract_failed = |reason: String| CrateupError::ExtractFailed {
        path: archive_path.to_path_buf(),
        reason,
    };

    let file = fs::File::open(archive_path)
        .map_err(|e| extract_failed(format!("opening the archive: {}", e)))?;

    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| extract_failed(e.to_string()))?;

    fs::create_dir_all(dest_dir)
        .map_err(|e| extract_failed(format!("creating {}: {}", dest_dir.display(), e)))?;

    let mut extracted = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| extract_failed(format!("entry {}: {}", i, e)))?;

        let entry_path = entry
            .enclosed_name()
            .ok_or_else(|| extract_failed(format!("entry {} has an unsafe path", i)))?;

        // enclosed_name already filters traversal; keep the explicit check
        // so a zip crate behavior change cannot widen what we accept.
        if entry_path.is_absolute()
            || entry_path
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(extract_failed(format!(
                "refusing entry outside destination: {}",
                entry_path.display()
            )));
        }

        let output_path = dest_dir.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)
                .map_err(|e| extract_failed(format!("creating {}: {}", output_path.display(), e)))?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| extract_failed(format!("creating {}: {}", parent.display(), e)))?;
        }

        let mut outfile = fs::File::create(&output_path)
            .map_err(|e| extract_failed(format!("creating {}: {}", output_path.display(), e)))?;
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|e| extract_failed(format!("writing {}: {}", output_path.display(), e)))?;

        debug!("Extracted {}", output_path.display());
        extracted.push(output_path);
    }

    Ok(extracted)
}

/// Mark a file executable (0o755). No-op on Windows.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> CrateupResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .map_err(|e| CrateupError::io(format!("reading metadata of {}", path.display()), e))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .map_err(|e| CrateupError::io(format!("setting permissions on {}", path.display()), e))
}

#[cfg(windows)]
pub fn make_executable(_path: &Path) -> CrateupResult<()> {
    Ok(())
}
