//! Target source builder utilities

use super::target::{BuildEvent, TargetSource};

/// Builder for creating checkout target sources
pub struct TargetSourceBuilder {
    source: TargetSource,
}

impl TargetSourceBuilder {
    /// Create a new builder from the primary remote and workspace path
    pub fn new(remote: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            source: TargetSource {
                remote: remote.into(),
                path: path.into(),
                ..TargetSource::default()
            },
        }
    }

    /// Set the primary reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.source.reference = reference.into();
        self
    }

    /// Set the commit to check out
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.source.commit = commit.into();
        self
    }

    /// Set the build event
    pub fn with_event(mut self, event: BuildEvent) -> Self {
        self.source.event = event;
        self
    }

    /// Set the pull request number
    pub fn with_pull_request(mut self, number: impl Into<String>) -> Self {
        self.source.pull_request = Some(number.into());
        self
    }

    /// Override the remote, switching to a dependency-repo checkout
    pub fn with_override_remote(mut self, remote: impl Into<String>) -> Self {
        self.source.override_remote = Some(remote.into());
        self
    }

    /// Override the reference with a branch name
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.source.branch = Some(branch.into());
        self
    }

    /// Override the workspace path
    pub fn with_override_path(mut self, path: impl Into<String>) -> Self {
        self.source.override_path = Some(path.into());
        self
    }

    /// Attach commit metadata that is logged but not acted on
    pub fn with_commit_metadata(
        mut self,
        message: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        self.source.commit_message = message.into();
        self.source.commit_branch = branch.into();
        self
    }

    /// Build the target source
    pub fn build(self) -> TargetSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic_creation() {
        let source = TargetSourceBuilder::new("https://github.com/user/app.git", "/drone/src").build();
        assert_eq!(source.remote, "https://github.com/user/app.git");
        assert_eq!(source.path, "/drone/src");
        assert!(source.reference.is_empty());
        assert!(source.override_remote.is_none());
        assert_eq!(source.event, BuildEvent::Push);
    }

    #[test]
    fn test_builder_with_all_options() {
        let source = TargetSourceBuilder::new("https://github.com/user/app.git", "/drone/src")
            .with_reference("refs/heads/main")
            .with_commit("abc123")
            .with_event(BuildEvent::PullRequest)
            .with_pull_request("12")
            .with_override_remote("https://github.com/user/lib.git")
            .with_branch("develop")
            .with_override_path("/drone/lib")
            .with_commit_metadata("Fix build", "develop")
            .build();

        assert_eq!(source.reference, "refs/heads/main");
        assert_eq!(source.commit, "abc123");
        assert_eq!(source.pull_request.as_deref(), Some("12"));
        assert_eq!(
            source.override_remote.as_deref(),
            Some("https://github.com/user/lib.git")
        );
        assert_eq!(source.branch.as_deref(), Some("develop"));
        assert_eq!(source.override_path.as_deref(), Some("/drone/lib"));
        assert_eq!(source.commit_message, "Fix build");
        assert_eq!(source.commit_branch, "develop");
    }

    #[test]
    fn test_builder_overwrite_values() {
        let source = TargetSourceBuilder::new("https://github.com/user/app.git", "/drone/src")
            .with_branch("first")
            .with_branch("second")
            .with_override_path("/first")
            .with_override_path("/second")
            .build();
        assert_eq!(source.branch.as_deref(), Some("second"));
        assert_eq!(source.override_path.as_deref(), Some("/second"));
    }
}
