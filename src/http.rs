//! Blocking HTTP client shared by the registry and download paths
//!
//! Wraps a single `ureq` agent with the configured global timeout; callers
//! on the async side run these methods under `spawn_blocking`. Every
//! request in an install run is sequential, so one agent is enough.

use crate::error::{CrateupError, CrateupResult};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

const USER_AGENT: &str = concat!("crateup/", env!("CARGO_PKG_VERSION"));

/// HTTP client with a bounded global timeout
#[derive(Clone)]
pub struct HttpClient {
    agent: Agent,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    /// GET a JSON document. Transport and HTTP-status failures surface as
    /// `ureq::Error` for the caller to classify.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ureq::Error> {
        debug!("GET {}", url);
        let mut response = self.agent.get(url).call()?;
        response.body_mut().read_json::<T>()
    }

    /// GET a URL and stream the body into `dest`.
    pub fn download(&self, url: &str, dest: &Path) -> CrateupResult<()> {
        debug!("Downloading {} into {}", url, dest.display());

        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| CrateupError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let mut file = File::create(dest)
            .map_err(|e| CrateupError::io(format!("creating {}", dest.display()), e))?;

        std::io::copy(&mut response.body_mut().as_reader(), &mut file).map_err(|e| {
            CrateupError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(())
    }
}
