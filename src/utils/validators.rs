//! Configuration validation utilities
//!
//! This module provides centralized validation logic for every input that
//! reaches the checkout, so that bad configuration is rejected before the
//! first git invocation.

/// Enumeration of possible validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Resolved remote URL is empty
    EmptyRemoteUrl,
    /// Remote URL format is not understood by git
    InvalidRemoteUrl(String),
    /// Resolved workspace path is empty
    EmptyPath,
    /// Branch override is not a valid git branch name
    InvalidBranchName(String, String),
    /// Pull request number is not numeric
    InvalidPullRequestNumber(String),
    /// Submodule override value could not be parsed
    InvalidSubmoduleOverride(String),
    /// Fetch attempts must be at least one
    InvalidFetchAttempts(u32),
    /// Unknown pull request ref policy
    UnknownPullRequestRefPolicy(String),
    /// Existing workspace is a checkout of another remote
    WorkspaceRemoteMismatch {
        path: String,
        expected: String,
        found: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyRemoteUrl => {
                write!(f, "Remote URL cannot be empty")
            }
            ValidationError::InvalidRemoteUrl(url) => {
                write!(f, "Invalid remote URL: '{}'", url)
            }
            ValidationError::EmptyPath => {
                write!(f, "Workspace path cannot be empty")
            }
            ValidationError::InvalidBranchName(branch, reason) => {
                write!(f, "Invalid branch name '{}': {}", branch, reason)
            }
            ValidationError::InvalidPullRequestNumber(number) => {
                write!(f, "Pull request number must be numeric: '{}'", number)
            }
            ValidationError::InvalidSubmoduleOverride(reason) => {
                write!(f, "Invalid submodule override: {}", reason)
            }
            ValidationError::InvalidFetchAttempts(attempts) => {
                write!(f, "Fetch attempts must be at least 1, got {}", attempts)
            }
            ValidationError::UnknownPullRequestRefPolicy(policy) => {
                write!(
                    f,
                    "Unknown pull request ref policy '{}' (expected head, merge or literal)",
                    policy
                )
            }
            ValidationError::WorkspaceRemoteMismatch {
                path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Workspace '{}' is a checkout of '{}', expected '{}'",
                    path, found, expected
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates a remote URL
///
/// Any form git understands is passed through unchanged, including
/// `[user@]host:path` and local paths. Only values git would misread as an
/// option, or that cannot be stored in a config file, are rejected.
pub fn validate_remote_url(url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::EmptyRemoteUrl);
    }

    if is_valid_remote_url(url) {
        Ok(())
    } else {
        Err(ValidationError::InvalidRemoteUrl(url.to_string()))
    }
}

/// Validates a workspace path
pub fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        Err(ValidationError::EmptyPath)
    } else {
        Ok(())
    }
}

/// Validates a branch name supplied as an override
///
/// Applies the subset of `git check-ref-format` rules that matter for
/// names coming from CI configuration.
pub fn validate_branch_name(branch: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| {
        Err(ValidationError::InvalidBranchName(
            branch.to_string(),
            reason.to_string(),
        ))
    };

    if branch.trim().is_empty() {
        return invalid("branch name cannot be empty or whitespace only");
    }
    if branch.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return invalid("branch name cannot contain whitespace");
    }
    if branch.starts_with('-') || branch.starts_with('/') {
        return invalid("branch name cannot start with '-' or '/'");
    }
    if branch.contains("..") || branch.contains("@{") {
        return invalid("branch name cannot contain '..' or '@{'");
    }
    if branch.ends_with('/') || branch.ends_with('.') || branch.ends_with(".lock") {
        return invalid("branch name cannot end with '/', '.' or '.lock'");
    }
    if branch.chars().any(|c| matches!(c, '~' | '^' | ':' | '?' | '*' | '[' | '\\')) {
        return invalid("branch name contains a character git does not allow");
    }

    Ok(())
}

/// Validates a pull request number
///
/// An empty value means "no pull request" and is accepted.
pub fn validate_pull_request_number(number: &str) -> Result<(), ValidationError> {
    if number.is_empty() || number.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPullRequestNumber(number.to_string()))
    }
}

/// Validates the number of fetch attempts
pub fn validate_fetch_attempts(attempts: u32) -> Result<(), ValidationError> {
    if attempts == 0 {
        Err(ValidationError::InvalidFetchAttempts(attempts))
    } else {
        Ok(())
    }
}

/// Helper function to check if a remote URL is valid
fn is_valid_remote_url(url: &str) -> bool {
    !url.trim_start().starts_with('-') && !url.chars().any(char::is_control)
}
