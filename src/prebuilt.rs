//! Signed pre-built binary cache tier
//!
//! Downloads `{distribution_root}/{crate}/{runner}/{crate}-{version}.zip`
//! plus its detached `.sig`, verifies the signature against the bundled
//! public key, and extracts the binaries into the cargo bin directory.
//! Nothing lands at the final destination unless verification passed.

use crate::archive;
use crate::config::Config;
use crate::error::{CrateupError, CrateupResult};
use crate::http::HttpClient;
use crate::request::VersionSpec;
use crate::runner::RunnerTag;
use crate::signature;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Artifact URL for a crate/version on a given runner.
pub fn artifact_url(root: &str, krate: &str, runner: &RunnerTag, version: &str) -> String {
    format!(
        "{}/{}/{}/{}-{}{}",
        root,
        krate,
        runner.as_str(),
        krate,
        version,
        runner.archive_ext()
    )
}

/// Name of the installed binary at the destination.
fn installed_name(krate: &str) -> String {
    format!("{}{}", krate, std::env::consts::EXE_SUFFIX)
}

/// Install `krate` from the pre-built binary cache.
///
/// Fails with a tier-local error on any missing artifact, transport
/// problem or signature mismatch; the orchestrator decides what runs next.
pub async fn install(
    config: &Config,
    client: &HttpClient,
    runner: &RunnerTag,
    krate: &str,
    version: &VersionSpec,
) -> CrateupResult<()> {
    let version = version
        .exact()
        .ok_or_else(|| CrateupError::VersionUnresolved(krate.to_string()))?;

    let installed = config.install.bin_dir.join(installed_name(krate));
    if installed.exists() {
        warn!(
            "{} already installed at {}, skipping download",
            krate,
            installed.display()
        );
        return Ok(());
    }

    let url = artifact_url(&config.download.distribution_root, krate, runner, version);
    let signature_url = format!("{}.sig", url);
    debug!("Artifact URL for {}: {}", krate, url);

    let scratch = scratch_dir()
        .await
        .map_err(|e| CrateupError::DownloadFailed {
            url: url.clone(),
            reason: format!("creating the scratch directory: {}", e),
        })?;
    let artifact_path = scratch.join(format!("{}-{}{}", krate, version, runner.archive_ext()));
    let signature_path = scratch.join(format!("{}-{}{}.sig", krate, version, runner.archive_ext()));

    info!(
        "Downloading {} signature into {}",
        krate,
        signature_path.display()
    );
    fetch(client, &signature_url, &signature_path).await?;

    info!("Downloading {} {} into {}", krate, version, artifact_path.display());
    fetch(client, &url, &artifact_path).await?;

    let public_key = match &config.download.public_key {
        Some(path) => path.clone(),
        None => signature::materialize_public_key(&scratch)
            .await
            .map_err(|e| CrateupError::SignatureVerification {
                artifact: artifact_path.clone(),
                reason: format!("writing the bundled public key: {}", e),
            })?,
    };

    info!("Extracting {} into {}", krate, config.install.bin_dir.display());
    verify_and_extract(
        &artifact_path,
        &signature_path,
        &public_key,
        &config.install.bin_dir,
    )
    .await
}

/// Verify the downloaded artifact, then extract its binaries into `bin_dir`
/// and mark them executable.
///
/// The downloads never outlive the call: they are removed after a
/// successful extraction and before any verification or extraction error
/// propagates.
pub async fn verify_and_extract(
    artifact: &Path,
    sig: &Path,
    public_key: &Path,
    bin_dir: &Path,
) -> CrateupResult<()> {
    verify_or_discard(artifact, sig, public_key).await?;

    match extract_into(artifact, bin_dir).await {
        Ok(extracted) => {
            debug!("Extracted {} files from {}", extracted.len(), artifact.display());
            discard(artifact, sig).await;
            Ok(())
        }
        Err(err) => {
            warn!("Extraction of {} failed", artifact.display());
            discard(artifact, sig).await;
            Err(err)
        }
    }
}

async fn extract_into(artifact: &Path, bin_dir: &Path) -> CrateupResult<Vec<PathBuf>> {
    let artifact = artifact.to_path_buf();
    let bin_dir = bin_dir.to_path_buf();
    tokio::task::spawn_blocking(move || -> CrateupResult<Vec<PathBuf>> {
        let files = archive::extract_zip(&artifact, &bin_dir)?;
        for file in &files {
            archive::make_executable(file).map_err(|e| CrateupError::ExtractFailed {
                path: artifact.clone(),
                reason: format!("marking {} executable: {}", file.display(), e),
            })?;
        }
        Ok(files)
    })
    .await
    .map_err(|e| CrateupError::Internal(format!("extract task panicked: {}", e)))?
}

/// Verify the artifact signature, deleting both downloads on rejection.
///
/// The error propagates either way; cleanup failures are only logged so a
/// stubborn temp file cannot mask the real failure.
pub async fn verify_or_discard(
    artifact: &Path,
    sig: &Path,
    public_key: &Path,
) -> CrateupResult<()> {
    match signature::verify(artifact, sig, public_key).await {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!("Unable to validate signature of {}", artifact.display());
            discard(artifact, sig).await;
            Err(err)
        }
    }
}

/// Remove downloaded files, logging rather than failing on errors.
async fn discard(artifact: &Path, sig: &Path) {
    for path in [artifact, sig] {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}

async fn scratch_dir() -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir().join("crateup");
    tokio::fs::create_dir_all(&dir).await?;
    Ok(dir)
}

async fn fetch(client: &HttpClient, url: &str, dest: &Path) -> CrateupResult<()> {
    let client = client.clone();
    let url = url.to_string();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || client.download(&url, &dest))
        .await
        .map_err(|e| CrateupError::Internal(format!("download task panicked: {}", e)))?
}
