//! Failure taxonomy of a checkout run
//!
//! Every failure carries the phase it happened in and, for phases that run
//! git, the diagnostic text git printed. The command layer wraps these in
//! `anyhow::Error`; `main` downcasts them back to pick the exit code.

use crate::utils::validators::ValidationError;
use std::path::PathBuf;

/// Phase of the checkout in which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configuration,
    Credentials,
    Clone,
    Fetch,
    Checkout,
    Submodule,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Configuration => "configuration",
            Phase::Credentials => "credentials",
            Phase::Clone => "clone",
            Phase::Fetch => "fetch",
            Phase::Checkout => "checkout",
            Phase::Submodule => "submodule",
        };
        f.write_str(name)
    }
}

/// Terminal failure of a checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Bad or missing input, raised before any external call
    Configuration(ValidationError),
    /// The credential record could not be written
    Credential { path: PathBuf, cause: String },
    /// Workspace initialization or remote configuration failed
    Clone { cause: String },
    /// Fetch failed on every attempt
    Fetch { attempts: u32, cause: String },
    /// Requested commit is not part of the fetched history
    ShaNotFound { sha: String, depth: u32 },
    /// Working tree could not be moved to the requested revision
    Checkout { cause: String },
    /// Submodule configuration, fetch or checkout failed
    Submodule { cause: String },
}

impl CheckoutError {
    /// Phase the failure belongs to
    pub fn phase(&self) -> Phase {
        match self {
            CheckoutError::Configuration(_) => Phase::Configuration,
            CheckoutError::Credential { .. } => Phase::Credentials,
            CheckoutError::Clone { .. } => Phase::Clone,
            CheckoutError::Fetch { .. } => Phase::Fetch,
            CheckoutError::ShaNotFound { .. } | CheckoutError::Checkout { .. } => Phase::Checkout,
            CheckoutError::Submodule { .. } => Phase::Submodule,
        }
    }

    /// Whether retrying the same operation could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::Fetch { .. })
    }
}

impl std::fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutError::Configuration(error) => {
                write!(f, "configuration error: {}", error)
            }
            CheckoutError::Credential { path, cause } => {
                write!(
                    f,
                    "failed to write credentials to {}: {}",
                    path.display(),
                    cause
                )
            }
            CheckoutError::Clone { cause } => {
                write!(f, "failed to prepare workspace: {}", cause)
            }
            CheckoutError::Fetch { attempts, cause } => {
                write!(f, "fetch failed after {} attempt(s): {}", attempts, cause)
            }
            CheckoutError::ShaNotFound { sha, depth: 0 } => {
                write!(f, "commit {} not found in fetched history", sha)
            }
            CheckoutError::ShaNotFound { sha, depth } => {
                write!(
                    f,
                    "commit {} not found in the last {} commit(s); increase the clone depth",
                    sha, depth
                )
            }
            CheckoutError::Checkout { cause } => {
                write!(f, "checkout failed: {}", cause)
            }
            CheckoutError::Submodule { cause } => {
                write!(f, "submodule update failed: {}", cause)
            }
        }
    }
}

impl std::error::Error for CheckoutError {}

impl From<ValidationError> for CheckoutError {
    fn from(error: ValidationError) -> Self {
        CheckoutError::Configuration(error)
    }
}
