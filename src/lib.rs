//! crateup - Fast installer for Rust crate binaries on CI runners
//!
//! Installs a crate's binaries by trying a signed pre-built binary cache,
//! falling back to a persistent build cache, and finally to a plain
//! `cargo install` from source.

pub mod archive;
pub mod build_cache;
pub mod cache_key;
pub mod cargo;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod prebuilt;
pub mod registry;
pub mod request;
pub mod runner;
pub mod signature;
pub mod store;

pub use error::{CrateupError, CrateupResult};
