//! Override resolution
//!
//! Merges the primary and override variants of remote, ref and path into a
//! single [`CheckoutTarget`]. For each field the first non-empty value wins:
//!
//! | field  | override                    | primary                |
//! |--------|-----------------------------|------------------------|
//! | remote | `override_remote`           | `remote`               |
//! | ref    | `refs/heads/<branch>`       | `reference` or default |
//! | path   | `override_path`             | `path`                 |
//!
//! An override remote marks the target as a dependency-repo checkout.

use super::target::{CheckoutTarget, TargetSource};
use crate::constants;
use crate::utils::validators::{self, ValidationError};
use std::path::PathBuf;

/// Resolve the effective checkout target from layered inputs
pub fn resolve_target(source: &TargetSource) -> Result<CheckoutTarget, ValidationError> {
    let (remote_url, dependency_repo) = match non_empty(&source.override_remote) {
        Some(remote) => (remote.to_string(), true),
        None => (source.remote.trim().to_string(), false),
    };
    validators::validate_remote_url(&remote_url)?;

    let reference = match non_empty(&source.branch) {
        Some(branch) => {
            validators::validate_branch_name(branch)?;
            format!("{}{}", constants::git::BRANCH_REF_PREFIX, branch)
        }
        None if source.reference.trim().is_empty() => constants::git::DEFAULT_REF.to_string(),
        None => source.reference.clone(),
    };

    let path = match non_empty(&source.override_path) {
        Some(path) => path.to_string(),
        None => source.path.trim().to_string(),
    };
    validators::validate_path(&path)?;

    let pull_request = match non_empty(&source.pull_request) {
        Some(number) => {
            validators::validate_pull_request_number(number)?;
            Some(
                number
                    .parse::<u64>()
                    .map_err(|_| ValidationError::InvalidPullRequestNumber(number.to_string()))?,
            )
        }
        None => None,
    };

    let commit = Some(source.commit.trim())
        .filter(|commit| !commit.is_empty())
        .map(str::to_string);

    Ok(CheckoutTarget {
        remote_url,
        reference,
        path: PathBuf::from(path),
        commit,
        event: source.event.clone(),
        pull_request,
        dependency_repo,
    })
}

/// Treat empty and whitespace-only overrides as absent
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builder::TargetSourceBuilder;
    use crate::config::target::BuildEvent;
    use pretty_assertions::assert_eq;

    fn source() -> TargetSourceBuilder {
        TargetSourceBuilder::new("https://host/org/app.git", "/drone/src/app")
    }

    #[test]
    fn test_resolve_without_overrides() {
        let target = resolve_target(
            &source()
                .with_reference("refs/heads/main")
                .with_commit("abc123")
                .build(),
        )
        .unwrap();

        assert_eq!(
            target,
            CheckoutTarget {
                remote_url: "https://host/org/app.git".to_string(),
                reference: "refs/heads/main".to_string(),
                path: PathBuf::from("/drone/src/app"),
                commit: Some("abc123".to_string()),
                event: BuildEvent::Push,
                pull_request: None,
                dependency_repo: false,
            }
        );
    }

    #[test]
    fn test_override_remote_enables_dependency_repo_mode() {
        let target = resolve_target(
            &source()
                .with_override_remote("https://host/org/baselib.git")
                .build(),
        )
        .unwrap();

        assert_eq!(target.remote_url, "https://host/org/baselib.git");
        assert!(target.dependency_repo);
        assert_eq!(target.path, PathBuf::from("/drone/src/app"));
    }

    #[test]
    fn test_branch_override_builds_branch_ref() {
        let target = resolve_target(
            &source()
                .with_reference("refs/pull/7/head")
                .with_branch("release/2.0")
                .build(),
        )
        .unwrap();
        assert_eq!(target.reference, "refs/heads/release/2.0");
    }

    #[test]
    fn test_path_override() {
        let target = resolve_target(&source().with_override_path("/drone/deps/baselib").build())
            .unwrap();
        assert_eq!(target.path, PathBuf::from("/drone/deps/baselib"));
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let target = resolve_target(
            &source()
                .with_override_remote("  ")
                .with_branch("")
                .with_override_path("")
                .build(),
        )
        .unwrap();
        assert_eq!(target.remote_url, "https://host/org/app.git");
        assert_eq!(target.reference, constants::git::DEFAULT_REF);
        assert_eq!(target.path, PathBuf::from("/drone/src/app"));
        assert!(!target.dependency_repo);
    }

    #[test]
    fn test_empty_remote_is_configuration_error() {
        let result = resolve_target(&TargetSourceBuilder::new("", "/drone/src").build());
        assert_eq!(result, Err(ValidationError::EmptyRemoteUrl));
    }

    #[test]
    fn test_scp_like_remotes_pass_through() {
        for remote in [
            "deploy@gitlab.internal:org/app.git",
            "gitlab.internal:org/app.git",
        ] {
            let target = resolve_target(&TargetSourceBuilder::new(remote, "/drone/src").build())
                .unwrap();
            assert_eq!(target.remote_url, remote);
        }

        let target = resolve_target(
            &source()
                .with_override_remote("ci@mirror.internal:deps/baselib.git")
                .build(),
        )
        .unwrap();
        assert_eq!(target.remote_url, "ci@mirror.internal:deps/baselib.git");
        assert!(target.dependency_repo);
    }

    #[test]
    fn test_option_like_remote_is_rejected() {
        let result = resolve_target(&TargetSourceBuilder::new("--mirror", "/drone/src").build());
        assert_eq!(
            result,
            Err(ValidationError::InvalidRemoteUrl("--mirror".to_string()))
        );
    }

    #[test]
    fn test_empty_path_is_configuration_error() {
        let result = resolve_target(&TargetSourceBuilder::new("https://host/a.git", "").build());
        assert_eq!(result, Err(ValidationError::EmptyPath));
    }

    #[test]
    fn test_invalid_branch_override() {
        let result = resolve_target(&source().with_branch("bad..name").build());
        assert!(matches!(
            result,
            Err(ValidationError::InvalidBranchName(_, _))
        ));
    }

    #[test]
    fn test_pull_request_number_parsing() {
        let target = resolve_target(
            &source()
                .with_event(BuildEvent::PullRequest)
                .with_pull_request("42")
                .build(),
        )
        .unwrap();
        assert_eq!(target.pull_request, Some(42));

        let result = resolve_target(&source().with_pull_request("forty-two").build());
        assert_eq!(
            result,
            Err(ValidationError::InvalidPullRequestNumber(
                "forty-two".to_string()
            ))
        );
    }
}
