//! Checkout orchestration
//!
//! Drives a [`GitEngine`] through the ordered steps that turn a workspace
//! path into a checkout of the resolved target:
//!
//! 1. `Init → RemotePrepared`: create or reuse the repository and point
//!    `origin` at the remote
//! 2. `RemotePrepared → Fetched`: fetch the reference (retried)
//! 3. `Fetched → CheckedOut`: move the working tree to the commit or the
//!    fetched tip
//! 4. `CheckedOut → SubmodulesSynced`: apply submodule overrides and update
//!    submodules (only when recursive)
//! 5. `→ Done`
//!
//! The first failing step moves the machine to `Failed(phase)` and aborts
//! the remaining steps.

use super::commands;
use super::common::Logger;
use super::engine::{CommandOutput, GitEngine};
use crate::config::{CheckoutOptions, CheckoutTarget, PullRequestRefPolicy, SubmoduleOverrides};
use crate::constants::retry::PERMANENT_FETCH_ERRORS;
use crate::errors::{CheckoutError, Phase};
use crate::utils::filesystem::{ensure_directory_exists, has_git_dir};
use crate::utils::sanitizers::redact_url;
use crate::utils::validators::ValidationError;
use std::thread;

/// Position of a checkout in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Init,
    RemotePrepared,
    Fetched,
    CheckedOut,
    SubmodulesSynced,
    Done,
    Failed(Phase),
}

/// Summary of a successful checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReport {
    /// Every state visited, starting with `Init` and ending with `Done`
    pub states: Vec<CheckoutState>,
    /// Fetch attempts used, including the successful one
    pub fetch_attempts: u32,
    /// Commit checked out, when git reported one
    pub head: Option<String>,
}

/// One checkout run
pub struct Checkout<'a, E: GitEngine> {
    engine: E,
    target: &'a CheckoutTarget,
    options: &'a CheckoutOptions,
    submodules: &'a SubmoduleOverrides,
    logger: Logger,
    states: Vec<CheckoutState>,
}

impl<'a, E: GitEngine> Checkout<'a, E> {
    pub fn new(
        engine: E,
        target: &'a CheckoutTarget,
        options: &'a CheckoutOptions,
        submodules: &'a SubmoduleOverrides,
    ) -> Self {
        Self {
            engine,
            target,
            options,
            submodules,
            logger: Logger,
            states: vec![CheckoutState::Init],
        }
    }

    /// Current state
    pub fn state(&self) -> CheckoutState {
        self.states
            .last()
            .copied()
            .unwrap_or(CheckoutState::Init)
    }

    /// States visited so far
    pub fn states(&self) -> &[CheckoutState] {
        &self.states
    }

    /// Run every step to completion or to the first failure
    pub fn run(&mut self) -> Result<CheckoutReport, CheckoutError> {
        match self.drive() {
            Ok(report) => {
                self.logger.success(self.target, "Checkout complete");
                Ok(report)
            }
            Err(error) => {
                self.transition(CheckoutState::Failed(error.phase()));
                self.logger.error(self.target, &error.to_string());
                Err(error)
            }
        }
    }

    fn drive(&mut self) -> Result<CheckoutReport, CheckoutError> {
        self.prepare_remote()?;
        self.transition(CheckoutState::RemotePrepared);

        let fetch_attempts = self.fetch()?;
        self.transition(CheckoutState::Fetched);

        let head = self.checkout()?;
        self.transition(CheckoutState::CheckedOut);

        if self.options.recursive {
            self.sync_submodules()?;
            self.transition(CheckoutState::SubmodulesSynced);
        }

        self.transition(CheckoutState::Done);
        Ok(CheckoutReport {
            states: self.states.clone(),
            fetch_attempts,
            head,
        })
    }

    fn transition(&mut self, state: CheckoutState) {
        if !matches!(state, CheckoutState::Failed(_)) {
            self.logger.info(self.target, &format!("State: {:?}", state));
        }
        self.states.push(state);
    }

    /// Create or reuse the repository at the workspace path
    fn prepare_remote(&self) -> Result<(), CheckoutError> {
        let path = self.target.workspace();
        let url = self.target.remote_url.as_str();

        ensure_directory_exists(path).map_err(|e| CheckoutError::Clone {
            cause: format!("failed to create {}: {}", path.display(), e),
        })?;

        if !has_git_dir(path) {
            self.logger.info(
                self.target,
                &format!("Initializing repository in {}", path.display()),
            );
            self.git_checked(commands::init(), clone_error)?;
            self.git_checked(commands::remote_add(url), clone_error)?;
            return Ok(());
        }

        let existing = self
            .git(commands::remote_get_url())
            .map_err(|e| clone_error(format!("{e:#}")))?;
        let existing = Some(existing)
            .filter(CommandOutput::success)
            .map(|output| output.stdout.trim().to_string())
            .filter(|existing| !existing.is_empty());

        match existing {
            None => {
                self.logger
                    .info(self.target, "Reusing repository without an origin remote");
                self.git_checked(commands::remote_add(url), clone_error)?;
            }
            Some(existing) if existing == url => {
                self.logger.info(self.target, "Reusing existing repository");
            }
            Some(existing) if self.target.dependency_repo => {
                self.logger.warn(
                    self.target,
                    &format!(
                        "Dependency checkout re-points origin from {}",
                        redact_url(&existing)
                    ),
                );
                self.git_checked(commands::remote_set_url(url), clone_error)?;
            }
            Some(existing) => {
                return Err(CheckoutError::Configuration(
                    ValidationError::WorkspaceRemoteMismatch {
                        path: path.display().to_string(),
                        expected: url.to_string(),
                        found: existing,
                    },
                ));
            }
        }
        Ok(())
    }

    /// Reference to fetch, honoring the pull request policy
    fn fetch_reference(&self) -> String {
        match self.target.pull_request {
            Some(number) if self.target.event.is_pull_request() => self
                .options
                .pr_ref_policy
                .pull_request_ref(number, &self.target.reference),
            _ => self.target.reference.clone(),
        }
    }

    /// Fetch the reference, retrying transient failures
    ///
    /// Failures git reports as permanent (missing ref, rejected credentials,
    /// unknown repository) end the loop at once. Returns the number of
    /// attempts used.
    fn fetch(&self) -> Result<u32, CheckoutError> {
        let reference = self.fetch_reference();
        let attempts = self.options.fetch_attempts.max(1);
        let args = commands::fetch(
            &reference,
            self.options.tags,
            self.options.depth,
            self.options.skip_verify,
        );

        match self.options.depth {
            0 => self
                .logger
                .info(self.target, &format!("Fetching {}", reference)),
            depth => self.logger.info(
                self.target,
                &format!("Fetching {} (depth {})", reference, depth),
            ),
        }

        let mut cause = String::new();
        for attempt in 1..=attempts {
            match self.git(args.clone()) {
                Ok(output) if output.success() => return Ok(attempt),
                Ok(output) if !output.timed_out && is_permanent_fetch_failure(&output) => {
                    if attempt < attempts {
                        self.logger
                            .warn(self.target, "Fetch failure is not transient, not retrying");
                    }
                    return Err(CheckoutError::Fetch {
                        attempts: attempt,
                        cause: output.diagnostic(),
                    });
                }
                Ok(output) => cause = output.diagnostic(),
                Err(e) => cause = format!("{e:#}"),
            }

            if attempt < attempts {
                self.logger.warn(
                    self.target,
                    &format!(
                        "Fetch attempt {}/{} failed: {}; retrying in {}s",
                        attempt,
                        attempts,
                        cause,
                        self.options.retry_backoff.as_secs_f32()
                    ),
                );
                thread::sleep(self.options.retry_backoff);
            }
        }

        Err(CheckoutError::Fetch { attempts, cause })
    }

    /// Move the working tree to the requested commit or the fetched tip
    ///
    /// Returns the resulting HEAD commit when git reports one.
    fn checkout(&self) -> Result<Option<String>, CheckoutError> {
        let merge_build = self.target.event.is_pull_request()
            && self.target.pull_request.is_some()
            && self.options.pr_ref_policy == PullRequestRefPolicy::Merge;

        match &self.target.commit {
            Some(sha) if !merge_build => {
                let verify = self
                    .git(commands::verify_commit(sha))
                    .map_err(|e| checkout_error(format!("{e:#}")))?;
                if !verify.success() {
                    return Err(CheckoutError::ShaNotFound {
                        sha: sha.clone(),
                        depth: self.options.depth,
                    });
                }
                self.logger
                    .info(self.target, &format!("Checking out {}", sha));
                self.git_checked(commands::reset_hard(sha), checkout_error)?;
            }
            _ => {
                self.logger.info(self.target, "Checking out fetched tip");
                self.git_checked(commands::checkout_fetch_head(), checkout_error)?;
            }
        }

        let head = self
            .git(commands::rev_parse_head())
            .ok()
            .filter(CommandOutput::success)
            .map(|output| output.stdout.trim().to_string())
            .filter(|head| !head.is_empty());
        Ok(head)
    }

    /// Apply submodule overrides and update submodules recursively
    fn sync_submodules(&self) -> Result<(), CheckoutError> {
        for (name, entry) in self.submodules.iter() {
            self.logger.info(
                self.target,
                &format!("Overriding submodule {} url", name),
            );
            self.git_checked(commands::set_submodule_url(name, &entry.url), submodule_error)?;
            if let Some(branch) = &entry.branch {
                self.git_checked(
                    commands::set_submodule_branch(name, branch),
                    submodule_error,
                )?;
            }
            self.repoint_cloned_submodule(name, &entry.url)?;
        }

        if self.options.submodule_remote {
            self.logger
                .info(self.target, "Updating submodules to their remote branch tips");
        } else {
            self.logger.info(self.target, "Updating submodules");
        }
        self.git_checked(
            commands::submodule_update(self.options.submodule_remote, self.options.skip_verify),
            submodule_error,
        )?;
        Ok(())
    }

    /// Re-point the origin of a submodule cloned by an earlier run
    ///
    /// `submodule update` fetches through the submodule's own origin, which
    /// keeps the URL it was first cloned from.
    fn repoint_cloned_submodule(&self, name: &str, url: &str) -> Result<(), CheckoutError> {
        let path = self
            .git(commands::submodule_path(name))
            .ok()
            .filter(CommandOutput::success)
            .map(|output| output.stdout.trim().to_string())
            .filter(|path| !path.is_empty());
        let Some(path) = path else {
            return Ok(());
        };

        if has_git_dir(&self.target.workspace().join(&path)) {
            self.logger.info(
                self.target,
                &format!("Re-pointing cloned submodule {} at override", path),
            );
            self.git_checked(commands::submodule_set_origin(&path, url), submodule_error)?;
        }
        Ok(())
    }

    /// Run git in the workspace, echoing the command line
    fn git(&self, args: Vec<String>) -> anyhow::Result<CommandOutput> {
        self.logger.command(self.target, &args);
        self.engine.run(self.target.workspace(), &args)
    }

    /// Run git and map any failure with `to_error`
    fn git_checked(
        &self,
        args: Vec<String>,
        to_error: fn(String) -> CheckoutError,
    ) -> Result<CommandOutput, CheckoutError> {
        match self.git(args) {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => Err(to_error(output.diagnostic())),
            Err(e) => Err(to_error(format!("{e:#}"))),
        }
    }
}

fn is_permanent_fetch_failure(output: &CommandOutput) -> bool {
    let diagnostic = output.diagnostic().to_ascii_lowercase();
    PERMANENT_FETCH_ERRORS
        .iter()
        .any(|fragment| diagnostic.contains(fragment))
}

fn clone_error(cause: String) -> CheckoutError {
    CheckoutError::Clone { cause }
}

fn checkout_error(cause: String) -> CheckoutError {
    CheckoutError::Checkout { cause }
}

fn submodule_error(cause: String) -> CheckoutError {
    CheckoutError::Submodule { cause }
}
