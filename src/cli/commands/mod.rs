//! CLI command implementations

pub mod config;
pub mod install;
pub mod key;
pub mod resolve;

pub use config::execute as config;
pub use install::execute as install;
pub use key::execute as key;
pub use resolve::execute as resolve;
