//! Tiered installation orchestrator
//!
//! Installation is an ordered list of named tiers: the signed pre-built
//! binary cache, then a cache-assisted source build, then a plain source
//! build when the build cache is disabled. The orchestrator walks the
//! list, short-circuits on the first success, and lets only the final
//! tier's failure escape.

use crate::build_cache;
use crate::config::Config;
use crate::error::{CrateupError, CrateupResult};
use crate::http::HttpClient;
use crate::prebuilt;
use crate::registry;
use crate::request::{InstallRequest, VersionSpec};
use crate::runner::RunnerTag;
use crate::store::DirStore;
use async_trait::async_trait;
use std::fmt;
use tracing::{info, warn};

/// A named installation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Signed pre-built binary from the distribution cache
    Prebuilt,
    /// Source build behind the persistent build cache
    BuildCache,
    /// Plain `cargo install` from source
    PlainBuild,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Prebuilt => "pre-built binary cache",
            Self::BuildCache => "cached source build",
            Self::PlainBuild => "source build",
        };
        write!(f, "{}", name)
    }
}

/// Ordered tiers for a request, with disabled tiers dropped.
///
/// The plain build only joins the list when the build cache is disabled;
/// with the cache enabled a build failure would repeat identically from
/// source, so there is nothing left to fall back to.
pub fn tier_sequence(request: &InstallRequest) -> Vec<Tier> {
    let mut tiers = Vec::new();
    if request.use_prebuilt {
        tiers.push(Tier::Prebuilt);
    }
    if request.use_build_cache {
        tiers.push(Tier::BuildCache);
    } else {
        tiers.push(Tier::PlainBuild);
    }
    tiers
}

/// Executes a single tier; split from the walking loop so tier ordering
/// is testable with a recording double.
#[async_trait]
pub trait TierExec {
    async fn attempt(&mut self, tier: Tier, request: &InstallRequest) -> CrateupResult<()>;
}

/// Walk `tiers` in order until one succeeds.
///
/// Tier-local failures are logged and advance the walk; anything else, or
/// the last tier's failure, propagates.
pub async fn run_tiers(
    tiers: &[Tier],
    exec: &mut dyn TierExec,
    request: &InstallRequest,
) -> CrateupResult<()> {
    let mut last_error = None;

    for (index, tier) in tiers.iter().enumerate() {
        info!("Installing {} via {}", request.krate, tier);
        match exec.attempt(*tier, request).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_tier_local() && index + 1 < tiers.len() => {
                warn!("{} tier failed for {}: {}", tier, request.krate, e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error
        .unwrap_or_else(|| CrateupError::Internal("no install tiers enabled".to_string())))
}

/// Production installer: owns the config, HTTP client, resolved runner
/// identity and the persistent store.
pub struct Installer {
    config: Config,
    client: HttpClient,
    runner: RunnerTag,
    store: DirStore,
}

impl Installer {
    /// Resolve the runner identity and build the shared clients.
    ///
    /// Fails fast with `UnsupportedPlatform` on hosts with no runner tag;
    /// no tier can succeed there.
    pub fn new(config: Config) -> CrateupResult<Self> {
        let runner = RunnerTag::detect()?;
        let client = HttpClient::new(config.http_timeout());
        let store = DirStore::new(config.cache.root.clone());
        Ok(Self {
            config,
            client,
            runner,
            store,
        })
    }

    /// Run the tiered installation for one request.
    pub async fn run(&mut self, request: InstallRequest) -> CrateupResult<()> {
        let request = self.pin_latest(request).await;
        let tiers = tier_sequence(&request);

        run_tiers(&tiers, self, &request).await.map_err(|e| {
            warn!(
                "Could not install {} {} by any enabled tier",
                request.krate, request.version
            );
            e
        })?;

        info!("Installed {} {}", request.krate, request.version);
        Ok(())
    }

    /// Resolve the latest sentinel eagerly, once, so every tier works
    /// with the same pinned version and cache keys stay version-exact.
    ///
    /// When resolution fails the sentinel is kept: the prebuilt tier then
    /// fails over and the build tiers let cargo pick the newest version.
    async fn pin_latest(&self, mut request: InstallRequest) -> InstallRequest {
        if !request.version.is_latest() {
            return request;
        }

        info!("Latest version requested for {}, querying the registry", request.krate);
        match registry::resolve(
            &self.client,
            &self.config.download.registry_root,
            &request.krate,
        )
        .await
        {
            Ok(version) => request.version = VersionSpec::Exact(version),
            Err(e) => {
                warn!(
                    "Could not resolve newest {} version, keeping the sentinel: {}",
                    request.krate, e
                );
            }
        }
        request
    }
}

#[async_trait]
impl TierExec for Installer {
    async fn attempt(&mut self, tier: Tier, request: &InstallRequest) -> CrateupResult<()> {
        match tier {
            Tier::Prebuilt => {
                prebuilt::install(
                    &self.config,
                    &self.client,
                    &self.runner,
                    &request.krate,
                    &request.version,
                )
                .await
            }
            Tier::BuildCache => {
                build_cache::install(
                    &self.config,
                    Some(&self.store),
                    &self.runner,
                    &request.krate,
                    &request.version,
                    &request.options,
                )
                .await
            }
            Tier::PlainBuild => {
                build_cache::install(
                    &self.config,
                    None,
                    &self.runner,
                    &request.krate,
                    &request.version,
                    &request.options,
                )
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request() -> InstallRequest {
        InstallRequest::new("cross", VersionSpec::Exact("0.2.1".to_string()))
    }

    /// Records attempted tiers and fails the configured ones.
    struct Recording {
        attempts: Vec<Tier>,
        failures: HashMap<Tier, fn() -> CrateupError>,
    }

    impl Recording {
        fn new() -> Self {
            Self {
                attempts: Vec::new(),
                failures: HashMap::new(),
            }
        }

        fn failing(mut self, tier: Tier, make: fn() -> CrateupError) -> Self {
            self.failures.insert(tier, make);
            self
        }
    }

    fn download_error() -> CrateupError {
        CrateupError::DownloadFailed {
            url: "https://cdn.example.com/cross.zip".to_string(),
            reason: "404".to_string(),
        }
    }

    fn build_error() -> CrateupError {
        CrateupError::BuildToolFailed {
            krate: "cross".to_string(),
            reason: "exit status 101".to_string(),
        }
    }

    fn platform_error() -> CrateupError {
        CrateupError::UnsupportedPlatform("freebsd".to_string())
    }

    #[async_trait]
    impl TierExec for Recording {
        async fn attempt(&mut self, tier: Tier, _request: &InstallRequest) -> CrateupResult<()> {
            self.attempts.push(tier);
            match self.failures.get(&tier) {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn sequence_with_everything_enabled() {
        assert_eq!(
            tier_sequence(&request()),
            vec![Tier::Prebuilt, Tier::BuildCache]
        );
    }

    #[test]
    fn sequence_without_prebuilt() {
        let mut req = request();
        req.use_prebuilt = false;
        assert_eq!(tier_sequence(&req), vec![Tier::BuildCache]);
    }

    #[test]
    fn sequence_without_build_cache_falls_to_plain() {
        let mut req = request();
        req.use_build_cache = false;
        assert_eq!(tier_sequence(&req), vec![Tier::Prebuilt, Tier::PlainBuild]);
    }

    #[test]
    fn sequence_with_both_disabled_is_plain_build_only() {
        let mut req = request();
        req.use_prebuilt = false;
        req.use_build_cache = false;
        assert_eq!(tier_sequence(&req), vec![Tier::PlainBuild]);
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let mut exec = Recording::new();
        run_tiers(&[Tier::Prebuilt, Tier::BuildCache], &mut exec, &request())
            .await
            .unwrap();
        assert_eq!(exec.attempts, vec![Tier::Prebuilt]);
    }

    #[tokio::test]
    async fn prebuilt_failure_falls_back_to_build_cache_once() {
        let mut exec = Recording::new().failing(Tier::Prebuilt, download_error);
        run_tiers(&[Tier::Prebuilt, Tier::BuildCache], &mut exec, &request())
            .await
            .unwrap();
        assert_eq!(exec.attempts, vec![Tier::Prebuilt, Tier::BuildCache]);
    }

    #[tokio::test]
    async fn last_tier_failure_escapes() {
        let mut exec = Recording::new()
            .failing(Tier::Prebuilt, download_error)
            .failing(Tier::BuildCache, build_error);
        let err = run_tiers(&[Tier::Prebuilt, Tier::BuildCache], &mut exec, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, CrateupError::BuildToolFailed { .. }));
        assert_eq!(exec.attempts, vec![Tier::Prebuilt, Tier::BuildCache]);
    }

    #[tokio::test]
    async fn fatal_error_aborts_without_fallback() {
        let mut exec = Recording::new().failing(Tier::Prebuilt, platform_error);
        let err = run_tiers(&[Tier::Prebuilt, Tier::BuildCache], &mut exec, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, CrateupError::UnsupportedPlatform(_)));
        assert_eq!(exec.attempts, vec![Tier::Prebuilt]);
    }

    #[tokio::test]
    async fn empty_sequence_is_an_internal_error() {
        let mut exec = Recording::new();
        let err = run_tiers(&[], &mut exec, &request()).await.unwrap_err();
        assert!(matches!(err, CrateupError::Internal(_)));
    }
}
