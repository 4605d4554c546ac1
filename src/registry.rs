//! Newest-version lookup against the crates.io API
//!
//! One GET per resolution, no retries: when the registry is unreachable
//! the caller abandons the tier and the orchestrator decides what happens
//! next.

use crate::error::{CrateupError, CrateupResult};
use crate::http::HttpClient;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RegistryResponse {
    #[serde(rename = "crate")]
    krate: Option<CrateInfo>,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    newest_version: Option<String>,
}

/// Resolve the newest published version of `krate`.
pub async fn resolve(
    client: &HttpClient,
    registry_root: &str,
    krate: &str,
) -> CrateupResult<String> {
    let url = format!("{}/api/v1/crates/{}", registry_root, krate);
    debug!("Querying registry for {}: {}", krate, url);

    let client = client.clone();
    let krate_owned = krate.to_string();
    let response: RegistryResponse = tokio::task::spawn_blocking(move || {
        client
            .get_json(&url)
            .map_err(|e| CrateupError::RegistryUnavailable {
                krate: krate_owned,
                reason: e.to_string(),
            })
    })
    .await
    .map_err(|e| CrateupError::Internal(format!("registry task panicked: {}", e)))??;

    let version = extract_newest_version(krate, response)?;
    info!("Newest {} version at the registry: {}", krate, version);
    Ok(version)
}

/// Pull `crate.newest_version` out of a registry response and validate it.
fn extract_newest_version(krate: &str, response: RegistryResponse) -> CrateupResult<String> {
    let version = response
        .krate
        .and_then(|c| c.newest_version)
        .ok_or_else(|| CrateupError::MalformedResponse {
            krate: krate.to_string(),
            reason: "missing crate.newest_version field".to_string(),
        })?;

    if semver::Version::parse(&version).is_err() {
        return Err(CrateupError::MalformedResponse {
            krate: krate.to_string(),
            reason: format!("newest_version {:?} is not valid semver", version),
        });
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> RegistryResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn extracts_newest_version() {
        let response = parse(r#"{"crate": {"newest_version": "0.2.1", "name": "cross"}}"#);
        let version = extract_newest_version("cross", response).unwrap();
        assert_eq!(version, "0.2.1");
    }

    #[test]
    fn missing_crate_object_is_malformed() {
        let response = parse(r#"{"errors": [{"detail": "not found"}]}"#);
        let err = extract_newest_version("cross", response).unwrap_err();
        assert!(matches!(err, CrateupError::MalformedResponse { .. }));
    }

    #[test]
    fn missing_version_field_is_malformed() {
        let response = parse(r#"{"crate": {"name": "cross"}}"#);
        let err = extract_newest_version("cross", response).unwrap_err();
        assert!(err.to_string().contains("newest_version"));
    }

    #[test]
    fn non_semver_version_is_malformed() {
        let response = parse(r#"{"crate": {"newest_version": "not-a-version"}}"#);
        let err = extract_newest_version("cross", response).unwrap_err();
        assert!(matches!(err, CrateupError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn unreachable_registry_is_tier_local() {
        let client = HttpClient::new(std::time::Duration::from_millis(200));
        let err = resolve(&client, "http://127.0.0.1:1", "cross")
            .await
            .unwrap_err();
        assert!(matches!(err, CrateupError::RegistryUnavailable { .. }));
        assert!(err.is_tier_local());
    }
}
