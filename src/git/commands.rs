//! Argument lists for the git commands issued during a checkout
//!
//! Each function returns the arguments that follow `git`. Keeping them pure
//! lets the orchestrator's command sequence be asserted without running git.

use super::common::git_args;
use crate::constants::git::{FETCH_HEAD, GITMODULES, REMOTE_NAME};

/// Per-invocation config that disables TLS verification
///
/// Passed with `-c` so nothing is persisted to any config file.
fn with_ssl_verify(skip_verify: bool, args: Vec<String>) -> Vec<String> {
    if skip_verify {
        let mut prefixed = git_args(["-c", "http.sslVerify=false"]);
        prefixed.extend(args);
        prefixed
    } else {
        args
    }
}

pub fn init() -> Vec<String> {
    git_args(["init", "-q"])
}

pub fn remote_add(url: &str) -> Vec<String> {
    git_args(["remote", "add", REMOTE_NAME, url])
}

pub fn remote_set_url(url: &str) -> Vec<String> {
    git_args(["remote", "set-url", REMOTE_NAME, url])
}

pub fn remote_get_url() -> Vec<String> {
    let key = format!("remote.{}.url", REMOTE_NAME);
    git_args(["config", "--get", key.as_str()])
}

/// Fetch a single reference into `FETCH_HEAD`
pub fn fetch(reference: &str, tags: bool, depth: u32, skip_verify: bool) -> Vec<String> {
    let mut args = git_args(["fetch", if tags { "--tags" } else { "--no-tags" }]);
    if depth > 0 {
        args.push(format!("--depth={}", depth));
    }
    args.push(REMOTE_NAME.to_string());
    args.push(format!("+{}:", reference));
    with_ssl_verify(skip_verify, args)
}

/// Succeeds only when `sha` names a commit in the local object store
pub fn verify_commit(sha: &str) -> Vec<String> {
    let object = format!("{}^{{commit}}", sha);
    git_args(["cat-file", "-e", object.as_str()])
}

pub fn reset_hard(sha: &str) -> Vec<String> {
    git_args(["reset", "--hard", "-q", sha])
}

pub fn checkout_fetch_head() -> Vec<String> {
    git_args(["checkout", "-qf", FETCH_HEAD])
}

pub fn rev_parse_head() -> Vec<String> {
    git_args(["rev-parse", "HEAD"])
}

pub fn set_submodule_url(name: &str, url: &str) -> Vec<String> {
    let key = format!("submodule.{}.url", name);
    git_args(["config", key.as_str(), url])
}

pub fn set_submodule_branch(name: &str, branch: &str) -> Vec<String> {
    let key = format!("submodule.{}.branch", name);
    git_args(["config", key.as_str(), branch])
}

/// Look up the checkout path declared for a submodule
pub fn submodule_path(name: &str) -> Vec<String> {
    let key = format!("submodule.{}.path", name);
    git_args(["config", "-f", GITMODULES, "--get", key.as_str()])
}

/// Point the origin of an already cloned submodule at `url`
pub fn submodule_set_origin(path: &str, url: &str) -> Vec<String> {
    git_args(["-C", path, "remote", "set-url", REMOTE_NAME, url])
}

pub fn submodule_update(remote: bool, skip_verify: bool) -> Vec<String> {
    let mut args = git_args(["submodule", "update", "--init", "--recursive"]);
    if remote {
        args.push("--remote".to_string());
    }
    with_ssl_verify(skip_verify, args)
}
