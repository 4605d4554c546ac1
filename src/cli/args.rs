//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// crateup - Fast installer for Rust crate binaries on CI runners
///
/// Tries a signed pre-built binary cache first, then a persistent build
/// cache, then a plain `cargo install` from source.
#[derive(Parser, Debug)]
#[command(name = "crateup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CRATEUP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a crate's binaries onto this runner
    Install(InstallArgs),

    /// Print the newest published version of a crate
    Resolve(ResolveArgs),

    /// Print the build-cache key an install would use
    Key(KeyArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the install command
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Crate to install
    #[arg(value_name = "CRATE")]
    pub krate: String,

    /// Version to install ("latest" or "*" mean the newest published)
    #[arg(long, default_value = "latest")]
    pub version: String,

    /// Features to enable, comma separated
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Enable all crate features
    #[arg(long)]
    pub all_features: bool,

    /// Disable default crate features
    #[arg(long)]
    pub no_default_features: bool,

    /// Skip the signed pre-built binary cache
    #[arg(long)]
    pub no_prebuilt: bool,

    /// Skip the persistent build cache and build from source directly
    #[arg(long)]
    pub no_build_cache: bool,
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Crate to look up
    #[arg(value_name = "CRATE")]
    pub krate: String,
}

/// Arguments for the key command
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Crate the key is for
    #[arg(value_name = "CRATE")]
    pub krate: String,

    /// Version segment of the key
    #[arg(long, default_value = "latest")]
    pub version: String,

    /// Features to enable, comma separated
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Enable all crate features
    #[arg(long)]
    pub all_features: bool,

    /// Disable default crate features
    #[arg(long)]
    pub no_default_features: bool,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommand actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}
