//! Cache key derivation for build-cache entries
//!
//! Keys are a pure function of the logical request: the feature list is
//! sorted and deduplicated before concatenation, so argument order never
//! changes the key. Feature lists long enough to threaten the backend's
//! key-length limit collapse into a content hash instead.

use crate::request::FeatureOptions;
use crate::runner::RunnerTag;
use sha2::{Digest, Sha256};

const KEY_PREFIX: &str = "crateup";
const KEY_SEPARATOR: &str = "-";

/// Most cache backends cap keys at 512 characters.
const MAX_KEY_LEN: usize = 512;

/// Build the cache key for a crate install.
///
/// Layout: `crateup-{runner}-{crate}-{version}[-no-default-features]
/// [-all-features][-feature...]`.
pub fn build(krate: &str, version: &str, runner: &RunnerTag, options: &FeatureOptions) -> String {
    let mut parts = vec![
        KEY_PREFIX.to_string(),
        runner.as_str().to_string(),
        krate.to_string(),
        version.to_string(),
    ];

    if options.no_default_features {
        parts.push("no-default-features".to_string());
    }
    if options.all_features {
        parts.push("all-features".to_string());
    }

    let mut features = options.features.clone();
    features.sort();
    features.dedup();

    let key = join_with_features(&parts, &features);
    if key.len() <= MAX_KEY_LEN {
        return key;
    }

    // Too many features to spell out; substitute a digest of the sorted
    // list so the key stays unique and under the limit.
    let mut hasher = Sha256::new();
    for feature in &features {
        hasher.update(feature.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hex::encode(&hasher.finalize()[..8]);
    parts.push(format!("features-{}", digest));
    parts.join(KEY_SEPARATOR)
}

fn join_with_features(parts: &[String], features: &[String]) -> String {
    let mut all = parts.to_vec();
    all.extend(features.iter().cloned());
    all.join(KEY_SEPARATOR)
}
