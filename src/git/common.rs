//! Common git utilities and shared helpers
//!
//! This module contains utilities shared by the checkout phases, such as
//! logging and argument helpers.

use crate::config::CheckoutTarget;
use crate::utils::sanitizers::redact_args;
use colored::*;

/// Logger for checkout operations with consistent formatting
///
/// Each log message is prefixed with the repository name in cyan/bold for
/// easy identification in CI logs.
///
/// ## Example
///
/// ```rust,no_run
/// use ci_checkout::config::{resolve_target, TargetSourceBuilder};
/// use ci_checkout::git::Logger;
///
/// let target = resolve_target(
///     &TargetSourceBuilder::new("https://github.com/user/repo.git", "/drone/src").build(),
/// )
/// .unwrap();
/// let logger = Logger::default();
/// logger.info(&target, "Starting checkout");
/// logger.success(&target, "Checkout completed");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Logger {
    pub fn info(&self, target: &CheckoutTarget, msg: &str) {
        println!("{} | {}", target.display_name().cyan().bold(), msg);
    }

    pub fn success(&self, target: &CheckoutTarget, msg: &str) {
        println!("{} | {}", target.display_name().cyan().bold(), msg.green());
    }

    pub fn warn(&self, target: &CheckoutTarget, msg: &str) {
        println!("{} | {}", target.display_name().cyan().bold(), msg.yellow());
    }

    pub fn error(&self, target: &CheckoutTarget, msg: &str) {
        eprintln!("{} | {}", target.display_name().cyan().bold(), msg.red());
    }

    /// Echo a git command line, with credentials in URLs masked
    pub fn command(&self, target: &CheckoutTarget, args: &[String]) {
        println!(
            "{} | {}",
            target.display_name().cyan().bold(),
            format!("+ git {}", redact_args(args).join(" ")).dimmed()
        );
    }
}

/// Build an owned argument vector from string slices
pub fn git_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    args.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_args() {
        assert_eq!(
            git_args(["fetch", "origin"]),
            vec!["fetch".to_string(), "origin".to_string()]
        );
    }
}
