//! Checkout target types

use crate::utils::sanitizers::repository_name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Build event that triggered the job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildEvent {
    #[default]
    Push,
    PullRequest,
    Tag,
    Deployment,
    Cron,
    Promote,
    Rollback,
    Custom(String),
}

impl BuildEvent {
    pub fn is_pull_request(&self) -> bool {
        matches!(self, BuildEvent::PullRequest)
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, BuildEvent::Tag)
    }
}

impl FromStr for BuildEvent {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "" | "push" => BuildEvent::Push,
            "pull_request" => BuildEvent::PullRequest,
            "tag" => BuildEvent::Tag,
            "deployment" => BuildEvent::Deployment,
            "cron" => BuildEvent::Cron,
            "promote" => BuildEvent::Promote,
            "rollback" => BuildEvent::Rollback,
            _ => BuildEvent::Custom(s.trim().to_string()),
        })
    }
}

impl std::fmt::Display for BuildEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildEvent::Push => f.write_str("push"),
            BuildEvent::PullRequest => f.write_str("pull_request"),
            BuildEvent::Tag => f.write_str("tag"),
            BuildEvent::Deployment => f.write_str("deployment"),
            BuildEvent::Cron => f.write_str("cron"),
            BuildEvent::Promote => f.write_str("promote"),
            BuildEvent::Rollback => f.write_str("rollback"),
            BuildEvent::Custom(name) => f.write_str(name),
        }
    }
}

/// Raw, layered inputs describing what to check out
///
/// Each `override_*` field, when non-empty, takes precedence over its
/// primary counterpart during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSource {
    pub remote: String,
    pub override_remote: Option<String>,
    pub reference: String,
    pub branch: Option<String>,
    pub path: String,
    pub override_path: Option<String>,
    pub commit: String,
    pub event: BuildEvent,
    pub pull_request: Option<String>,
    /// Pass-through metadata, not used for control flow
    pub commit_message: String,
    /// Pass-through metadata, not used for control flow
    pub commit_branch: String,
}

/// Fully resolved checkout target
///
/// Built once per run by [`super::resolver::resolve_target`]; `remote_url`
/// and `path` are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutTarget {
    pub remote_url: String,
    pub reference: String,
    pub path: PathBuf,
    pub commit: Option<String>,
    pub event: BuildEvent,
    pub pull_request: Option<u64>,
    /// Auxiliary checkout requested through the override remote
    pub dependency_repo: bool,
}

impl CheckoutTarget {
    /// Short name used to prefix log lines
    pub fn display_name(&self) -> String {
        repository_name(&self.remote_url)
    }

    /// Workspace directory
    pub fn workspace(&self) -> &Path {
        &self.path
    }
}
