//! Runner identity resolution
//!
//! Maps the host OS and kernel release to the canonical GitHub runner tag
//! used to select pre-built binaries. The mapping is a lookup table so new
//! runner images are a data change, not a logic change.

use crate::error::{CrateupError, CrateupResult};
use std::fmt;
use tracing::debug;

/// Canonical tag for an Actions runner image (e.g. `ubuntu-18.04`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunnerTag {
    tag: &'static str,
    archive_ext: &'static str,
}

impl RunnerTag {
    /// The tag string used in cache keys and artifact URLs
    pub fn as_str(&self) -> &'static str {
        self.tag
    }

    /// File extension of pre-built artifacts for this runner
    pub fn archive_ext(&self) -> &'static str {
        self.archive_ext
    }

    /// Resolve the runner tag for the current host.
    pub fn detect() -> CrateupResult<Self> {
        let release = kernel_release();
        Self::resolve(std::env::consts::OS, &release)
    }

    /// Resolve a runner tag from an OS name and kernel release string.
    ///
    /// Pure and total: every input either matches a table row or fails
    /// with `UnsupportedPlatform`.
    pub fn resolve(os: &str, kernel_release: &str) -> CrateupResult<Self> {
        for row in RUNNER_TABLE {
            if row.os != os {
                continue;
            }
            let prefix_ok = match row.release_prefix {
                Some(prefix) => kernel_release.starts_with(prefix),
                None => true,
            };
            if prefix_ok {
                debug!("Resolved runner for {}/{}: {}", os, kernel_release, row.tag);
                return Ok(Self {
                    tag: row.tag,
                    archive_ext: row.archive_ext,
                });
            }
        }

        Err(CrateupError::UnsupportedPlatform(os.to_string()))
    }
}

impl fmt::Display for RunnerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}

struct RunnerRow {
    /// `std::env::consts::OS` value to match
    os: &'static str,
    /// Kernel release prefix to match, or `None` for any release
    release_prefix: Option<&'static str>,
    tag: &'static str,
    archive_ext: &'static str,
}

/// Runner mapping, checked top to bottom. Rows with a release prefix must
/// precede the catch-all row for the same OS.
const RUNNER_TABLE: &[RunnerRow] = &[
    RunnerRow {
        os: "windows",
        release_prefix: None,
        tag: "windows-2019",
        archive_ext: ".zip",
    },
    RunnerRow {
        os: "macos",
        release_prefix: None,
        tag: "macos-10.15",
        archive_ext: ".zip",
    },
    // Kernel 4.15 is the ubuntu-16.04 runner image; newer kernels
    // mean the ubuntu-18.04 image.
    RunnerRow {
        os: "linux",
        release_prefix: Some("4.15"),
        tag: "ubuntu-16.04",
        archive_ext: ".zip",
    },
    RunnerRow {
        os: "linux",
        release_prefix: None,
        tag: "ubuntu-18.04",
        archive_ext: ".zip",
    },
];

/// Kernel release string for the current host.
///
/// Only meaningful on Linux, where it disambiguates runner images; other
/// platforms match their table rows on OS name alone.
fn kernel_release() -> String {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/sys/kernel/osrelease")
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }
    #[cfg(not(target_os = "linux"))]
    {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_maps_to_fixed_tag() {
        let tag = RunnerTag::resolve("windows", "10.0.17763").unwrap();
        assert_eq!(tag.as_str(), "windows-2019");
    }

    #[test]
    fn macos_maps_to_fixed_tag() {
        let tag = RunnerTag::resolve("macos", "19.6.0").unwrap();
        assert_eq!(tag.as_str(), "macos-10.15");
    }

    #[test]
    fn old_linux_kernel_maps_to_xenial() {
        let tag = RunnerTag::resolve("linux", "4.15.0-1064-azure").unwrap();
        assert_eq!(tag.as_str(), "ubuntu-16.04");
    }

    #[test]
    fn new_linux_kernel_maps_to_bionic() {
        let tag = RunnerTag::resolve("linux", "5.4.0-1031-azure").unwrap();
        assert_eq!(tag.as_str(), "ubuntu-18.04");
    }

    #[test]
    fn linux_empty_release_maps_to_bionic() {
        let tag = RunnerTag::resolve("linux", "").unwrap();
        assert_eq!(tag.as_str(), "ubuntu-18.04");
    }

    #[test]
    fn other_os_is_unsupported() {
        let err = RunnerTag::resolve("freebsd", "13.2").unwrap_err();
        assert!(matches!(err, CrateupError::UnsupportedPlatform(_)));
        assert!(err.to_string().contains("freebsd"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = RunnerTag::resolve("linux", "5.15.0-generic").unwrap();
        let b = RunnerTag::resolve("linux", "5.15.0-generic").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_row_carries_archive_ext() {
        let tag = RunnerTag::resolve("windows", "anything").unwrap();
        assert_eq!(tag.archive_ext(), ".zip");
        let tag = RunnerTag::resolve("linux", "4.15.1").unwrap();
        assert_eq!(tag.archive_ext(), ".zip");
    }

    #[test]
    fn detect_succeeds_on_test_host() {
        // CI and dev hosts are all linux/macos/windows
        assert!(RunnerTag::detect().is_ok());
    }
}
