//! Run settings
//!
//! [`Settings`] is built once in `main` from the command line and the
//! environment and handed to the checkout command by reference.

use super::resolver::resolve_target;
use super::submodules::SubmoduleOverrides;
use super::target::{CheckoutTarget, TargetSource};
use crate::constants;
use crate::netrc::Credentials;
use crate::utils::validators::{self, ValidationError};
use serde::{Serialize, Serializer};
use std::str::FromStr;
use std::time::Duration;

/// Which reference to fetch for pull request builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestRefPolicy {
    /// `refs/pull/<n>/head`, the contributor's branch tip
    #[default]
    Head,
    /// `refs/pull/<n>/merge`, the forge's test merge
    Merge,
    /// The reference supplied by the job, unchanged
    Literal,
}

impl PullRequestRefPolicy {
    /// Reference to fetch for the given pull request
    pub fn pull_request_ref(&self, number: u64, reference: &str) -> String {
        match self {
            PullRequestRefPolicy::Head => format!("refs/pull/{}/head", number),
            PullRequestRefPolicy::Merge => format!("refs/pull/{}/merge", number),
            PullRequestRefPolicy::Literal => reference.to_string(),
        }
    }
}

impl FromStr for PullRequestRefPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "head" => Ok(PullRequestRefPolicy::Head),
            "merge" => Ok(PullRequestRefPolicy::Merge),
            "literal" | "ref" => Ok(PullRequestRefPolicy::Literal),
            other => Err(ValidationError::UnknownPullRequestRefPolicy(
                other.to_string(),
            )),
        }
    }
}

/// Scalar switches controlling the checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutOptions {
    /// Number of commits to fetch, `0` for full history
    pub depth: u32,
    pub tags: bool,
    pub recursive: bool,
    pub skip_verify: bool,
    /// Update submodules to their remote branch tip instead of the pinned commit
    pub submodule_remote: bool,
    pub fetch_attempts: u32,
    pub retry_backoff: Duration,
    pub pr_ref_policy: PullRequestRefPolicy,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            depth: 0,
            tags: false,
            recursive: true,
            skip_verify: false,
            submodule_remote: false,
            fetch_attempts: constants::retry::DEFAULT_FETCH_ATTEMPTS,
            retry_backoff: Duration::from_secs(constants::retry::DEFAULT_BACKOFF_SECS),
            pr_ref_policy: PullRequestRefPolicy::default(),
        }
    }
}

impl CheckoutOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validators::validate_fetch_attempts(self.fetch_attempts)
    }
}

/// Raw netrc fields as received from the job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetrcSettings {
    pub machine: String,
    pub login: String,
    #[serde(serialize_with = "mask_secret")]
    pub password: String,
}

impl NetrcSettings {
    /// Credentials when all three fields are present
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(&self.machine, &self.login, &self.password)
    }

    /// Some but not all fields are set
    pub fn is_partial(&self) -> bool {
        let set = [&self.machine, &self.login, &self.password]
            .iter()
            .filter(|field| !field.trim().is_empty())
            .count();
        set > 0 && set < 3
    }
}

/// Complete configuration of one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Settings {
    pub target: TargetSource,
    pub options: CheckoutOptions,
    pub submodules: SubmoduleOverrides,
    pub netrc: NetrcSettings,
    /// Timeout applied to each git invocation
    pub command_timeout: Option<Duration>,
    pub debug: bool,
}

impl Settings {
    /// Resolve the checkout target and validate the options
    pub fn resolve(&self) -> Result<CheckoutTarget, ValidationError> {
        self.options.validate()?;
        resolve_target(&self.target)
    }

    /// Pretty JSON dump with secrets masked
    pub fn to_debug_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}

fn mask_secret<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_empty() {
        serializer.serialize_str("")
    } else {
        serializer.serialize_str(constants::redaction::MASK)
    }
}
