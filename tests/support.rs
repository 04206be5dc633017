//! Common test support utilities and fixtures
//!
//! Provides a scripted git engine for orchestrator tests and helpers for
//! building real repositories in temporary directories.

#![allow(dead_code)]

use ci_checkout::config::{
    CheckoutOptions, CheckoutTarget, SubmoduleOverrides, TargetSourceBuilder, resolve_target,
};
use ci_checkout::git::{CommandOutput, GitEngine};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Rule {
    pattern: String,
    outputs: VecDeque<CommandOutput>,
    repeat: bool,
}

#[derive(Default)]
struct FakeState {
    rules: Vec<Rule>,
    calls: Vec<Vec<String>>,
}

/// Git engine answering from a script instead of running git
///
/// Commands whose space-joined arguments contain a rule's pattern get that
/// rule's next queued output; everything else succeeds with empty output.
#[derive(Clone, Default)]
pub struct FakeGit {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next matching commands with `outputs`, in order
    pub fn on<I>(self, pattern: &str, outputs: I) -> Self
    where
        I: IntoIterator<Item = CommandOutput>,
    {
        self.push_rule(pattern, outputs.into_iter().collect(), false);
        self
    }

    /// Answer every matching command with `output`
    pub fn always(self, pattern: &str, output: CommandOutput) -> Self {
        self.push_rule(pattern, VecDeque::from([output]), true);
        self
    }

    fn push_rule(&self, pattern: &str, outputs: VecDeque<CommandOutput>, repeat: bool) {
        self.state.lock().unwrap().rules.push(Rule {
            pattern: pattern.to_string(),
            outputs,
            repeat,
        });
    }

    /// Every invocation so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Every invocation so far, joined with spaces
    pub fn commands(&self) -> Vec<String> {
        self.calls().iter().map(|args| args.join(" ")).collect()
    }

    /// Number of invocations containing `pattern`
    pub fn count(&self, pattern: &str) -> usize {
        self.commands()
            .iter()
            .filter(|command| command.contains(pattern))
            .count()
    }

    /// Position of the first invocation containing `pattern`
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.commands()
            .iter()
            .position(|command| command.contains(pattern))
    }
}

impl GitEngine for FakeGit {
    fn run(&self, _dir: &Path, args: &[String]) -> anyhow::Result<CommandOutput> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(args.to_vec());

        let command = args.join(" ");
        for rule in state.rules.iter_mut() {
            if !command.contains(&rule.pattern) {
                continue;
            }
            if rule.repeat {
                if let Some(output) = rule.outputs.front() {
                    return Ok(output.clone());
                }
            } else if let Some(output) = rule.outputs.pop_front() {
                return Ok(output);
            }
        }
        Ok(CommandOutput::ok(""))
    }
}

/// Options with no retry delay
pub fn fast_options() -> CheckoutOptions {
    CheckoutOptions {
        retry_backoff: Duration::ZERO,
        ..CheckoutOptions::default()
    }
}

/// Resolve a target for `remote` checked out into `path`
pub fn target_at(remote: &str, path: &Path, builder: fn(TargetSourceBuilder) -> TargetSourceBuilder) -> CheckoutTarget {
    let source = builder(TargetSourceBuilder::new(
        remote,
        path.to_string_lossy().to_string(),
    ))
    .build();
    resolve_target(&source).expect("target resolves")
}

/// Empty submodule override table
pub fn no_overrides() -> SubmoduleOverrides {
    SubmoduleOverrides::new()
}

/// Make `path` look like an existing repository to the orchestrator
pub fn fake_git_dir(path: &Path) {
    let git_dir = path.join(".git");
    fs::create_dir_all(&git_dir).expect("Failed to create .git");
    fs::write(git_dir.join("HEAD"), "ref: refs/heads/master\n").expect("Failed to write HEAD");
}

/// Run git in `dir`, panicking on failure, and return trimmed stdout
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Test User",
            "-c",
            "user.email=test@example.com",
            "-c",
            "protocol.file.allow=always",
            "-c",
            "init.defaultBranch=main",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialize a repository on `main` and create one commit per message
///
/// Returns the commit ids, oldest first.
pub fn init_repo_with_commits(path: &Path, messages: &[&str]) -> Vec<String> {
    fs::create_dir_all(path).expect("Failed to create repository directory");
    git(path, &["init", "-q"]);
    git(path, &["checkout", "-q", "-B", "main"]);

    messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            fs::write(path.join("history.txt"), format!("{}\n{}\n", index, message))
                .expect("Failed to write file");
            git(path, &["add", "."]);
            git(path, &["commit", "-q", "-m", message]);
            git(path, &["rev-parse", "HEAD"])
        })
        .collect()
}

/// `file://` URL for a local repository
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
