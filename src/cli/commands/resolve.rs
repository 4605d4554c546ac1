//! Resolve command - print the newest published crate version

use crate::cli::args::ResolveArgs;
use crate::config::Config;
use crate::error::CrateupResult;
use crate::http::HttpClient;
use crate::registry;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> CrateupResult<()> {
    let client = HttpClient::new(config.http_timeout());
    let version = registry::resolve(&client, &config.download.registry_root, &args.krate).await?;
    println!("{}", version);
    Ok(())
}
