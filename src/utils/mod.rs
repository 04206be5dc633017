//! Utility modules for common functionality

pub mod exit_codes;
pub mod filesystem;
pub mod sanitizers;
pub mod validators;

// Re-export commonly used functions
pub use exit_codes::{exit_code_for, exit_code_for_anyhow, get_exit_code_description};
pub use filesystem::{ensure_directory_exists, has_git_dir};
pub use sanitizers::{redact_url, repository_name};
