//! Key command - print the build-cache key an install would use
//!
//! Keys depend on the runner identity, so this command only works on
//! supported hosts. The version segment is the literal sentinel when no
//! exact version is given, matching what the build-cache tier would key
//! on for an unresolved request.

use crate::cache_key;
use crate::cli::args::KeyArgs;
use crate::error::CrateupResult;
use crate::request::{FeatureOptions, VersionSpec};
use crate::runner::RunnerTag;

/// Execute the key command
pub async fn execute(args: KeyArgs) -> CrateupResult<()> {
    let runner = RunnerTag::detect()?;
    let version = VersionSpec::parse(&args.version);
    let options = FeatureOptions {
        features: args.features,
        all_features: args.all_features,
        no_default_features: args.no_default_features,
    };

    let key = cache_key::build(&args.krate, &version.to_string(), &runner, &options);
    println!("{}", key);
    Ok(())
}
