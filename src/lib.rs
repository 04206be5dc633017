//! ci-checkout - Materialize a repository revision in a CI workspace

pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod git;
pub mod netrc;
pub mod utils;

pub type Result<T> = anyhow::Result<T>;

// Re-export commonly used types
pub use commands::{CheckoutCommand, Command, CommandContext};
pub use config::{CheckoutOptions, CheckoutTarget, Settings, SubmoduleOverrides};
pub use errors::{CheckoutError, Phase};
