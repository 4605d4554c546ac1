//! Detached-signature verification for downloaded artifacts
//!
//! Artifacts are signed with RSA/SHA-256; verification shells out to
//! `openssl dgst`, which is present on every supported runner image. The
//! signing public key ships inside the binary and is materialized next to
//! the downloads when no override path is configured.

use crate::error::{CrateupError, CrateupResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Public key of the artifact signing certificate.
const BUNDLED_PUBLIC_KEY: &str = include_str!("../public.pem");

/// Write the bundled public key into `dir`, returning its path.
pub async fn materialize_public_key(dir: &Path) -> CrateupResult<PathBuf> {
    let path = dir.join("crateup-public.pem");
    tokio::fs::write(&path, BUNDLED_PUBLIC_KEY)
        .await
        .map_err(|e| CrateupError::io(format!("writing public key to {}", path.display()), e))?;
    debug!("Materialized bundled public key at {}", path.display());
    Ok(path)
}

/// Verify `artifact` against its detached `signature` using `public_key`.
///
/// A non-zero openssl exit is a verification failure; the caller is
/// responsible for deleting the rejected files.
pub async fn verify(artifact: &Path, signature: &Path, public_key: &Path) -> CrateupResult<()> {
    info!("Verifying signature of {}", artifact.display());

    let output = Command::new("openssl")
        .arg("dgst")
        .arg("-sha256")
        .arg("-verify")
        .arg(public_key)
        .arg("-signature")
        .arg(signature)
        .arg(artifact)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| CrateupError::command_failed("openssl dgst", e))?;

    if output.status.success() {
        debug!("Signature of {} verified", artifact.display());
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        Err(CrateupError::SignatureVerification {
            artifact: artifact.to_path_buf(),
            reason: format!("{}{}", stdout.trim(), stderr.trim()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bundled_key_is_a_pem_public_key() {
        assert!(BUNDLED_PUBLIC_KEY.starts_with("-----BEGIN PUBLIC KEY-----"));
        assert!(BUNDLED_PUBLIC_KEY.trim_end().ends_with("-----END PUBLIC KEY-----"));
    }

    #[tokio::test]
    async fn materialize_writes_key_file() {
        let dir = TempDir::new().unwrap();
        let path = materialize_public_key(dir.path()).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, BUNDLED_PUBLIC_KEY);
    }

    #[tokio::test]
    async fn bogus_signature_is_rejected() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("artifact.zip");
        let signature = dir.path().join("artifact.zip.sig");
        std::fs::write(&artifact, b"payload").unwrap();
        std::fs::write(&signature, b"not a real signature").unwrap();

        let key = materialize_public_key(dir.path()).await.unwrap();
        let err = verify(&artifact, &signature, &key).await.unwrap_err();
        assert!(matches!(err, CrateupError::SignatureVerification { .. }));
        assert!(err.is_tier_local());
    }
}
