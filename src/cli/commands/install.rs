//! Install command - run the tiered installation

use crate::cli::args::InstallArgs;
use crate::config::Config;
use crate::error::{CrateupError, CrateupResult};
use crate::orchestrator::Installer;
use crate::request::{FeatureOptions, InstallRequest, VersionSpec};
use console::style;

/// Execute the install command
pub async fn execute(args: InstallArgs, config: &Config) -> CrateupResult<()> {
    let request = to_request(args)?;
    let krate = request.krate.clone();
    let version = request.version.clone();

    let mut installer = Installer::new(config.clone())?;
    installer.run(request).await?;

    println!(
        "{} Installed {} {} into {}",
        style("[OK]").green(),
        style(&krate).bold(),
        version,
        config.install.bin_dir.display()
    );
    Ok(())
}

/// Translate parsed arguments into a validated request.
fn to_request(args: InstallArgs) -> CrateupResult<InstallRequest> {
    if args.krate.trim().is_empty() {
        return Err(CrateupError::User("Crate name must not be empty".to_string()));
    }

    Ok(InstallRequest {
        krate: args.krate,
        version: VersionSpec::parse(&args.version),
        options: FeatureOptions {
            features: args.features,
            all_features: args.all_features,
            no_default_features: args.no_default_features,
        },
        use_prebuilt: !args.no_prebuilt,
        use_build_cache: !args.no_build_cache,
    })
}
