use ci_checkout::commands::{CheckoutCommand, Command, CommandContext};
use ci_checkout::config::{
    BuildEvent, CheckoutOptions, NetrcSettings, PullRequestRefPolicy, Settings,
    SubmoduleOverrides, TargetSource,
};
use ci_checkout::constants;
use ci_checkout::utils::{exit_code_for_anyhow, get_exit_code_description};
use clap::{ArgAction, Parser, builder::BoolishValueParser};
use colored::*;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ci-checkout")]
#[command(about = "Check out a repository revision into a CI workspace")]
#[command(version)]
struct Cli {
    /// Git remote url
    #[arg(long, env = "DRONE_REMOTE_URL", default_value = "")]
    remote: String,

    /// Git clone path
    #[arg(long, env = "DRONE_WORKSPACE", default_value = "")]
    path: String,

    /// Git commit sha
    #[arg(long, env = "DRONE_COMMIT_SHA", default_value = "")]
    sha: String,

    /// Git commit ref
    #[arg(long = "ref", env = "DRONE_COMMIT_REF", default_value_t = constants::git::DEFAULT_REF.to_string())]
    reference: String,

    /// Build event
    #[arg(long, env = "DRONE_BUILD_EVENT", default_value = "push")]
    event: BuildEvent,

    /// Netrc machine
    #[arg(long, env = "DRONE_NETRC_MACHINE", default_value = "")]
    netrc_machine: String,

    /// Netrc username
    #[arg(long, env = "DRONE_NETRC_USERNAME", default_value = "")]
    netrc_username: String,

    /// Netrc password
    #[arg(long, env = "DRONE_NETRC_PASSWORD", default_value = "", hide_env_values = true)]
    netrc_password: String,

    /// Clone depth, 0 for full history
    #[arg(long, env = "PLUGIN_DEPTH", default_value_t = 0)]
    depth: u32,

    /// Clone submodules
    #[arg(
        long,
        env = "PLUGIN_RECURSIVE",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    recursive: bool,

    /// Fetch tags
    #[arg(long, env = "PLUGIN_TAGS")]
    tags: bool,

    /// Skip TLS verification
    #[arg(long, env = "PLUGIN_SKIP_VERIFY")]
    skip_verify: bool,

    /// Update submodules to their remote branch tips
    #[arg(long, env = "PLUGIN_SUBMODULE_UPDATE_REMOTE")]
    submodule_update_remote: bool,

    #[arg(long, env = "PLUGIN_SUBMODULES_UPDATE_REMOTE", hide = true)]
    submodules_update_remote: bool,

    /// JSON map of submodule overrides
    #[arg(long, env = "PLUGIN_SUBMODULE_OVERRIDE")]
    submodule_override: Option<SubmoduleOverrides>,

    /// Commit message
    #[arg(long, env = "DRONE_COMMIT_MESSAGE", default_value = "")]
    commit_message: String,

    /// Commit branch
    #[arg(long, env = "DRONE_COMMIT_BRANCH", default_value = "")]
    commit_branch: String,

    /// Pull request number
    #[arg(long, env = "DRONE_PULL_REQUEST")]
    pr_number: Option<String>,

    /// Custom git remote url, checks out a dependency repository
    #[arg(long, env = "PLUGIN_REMOTE_URL")]
    custom_remote_url: Option<String>,

    /// Repository branch, replaces the ref
    #[arg(long, env = "PLUGIN_BRANCH")]
    branch: Option<String>,

    /// Custom git clone path
    #[arg(long, env = "PLUGIN_PATH")]
    custom_path: Option<String>,

    /// Pull request ref to fetch: head, merge or literal
    #[arg(long = "pr-ref", env = "PLUGIN_PR_REF", default_value = "head")]
    pr_ref: PullRequestRefPolicy,

    /// Fetch attempts before giving up
    #[arg(long, env = "PLUGIN_ATTEMPTS", default_value_t = constants::retry::DEFAULT_FETCH_ATTEMPTS)]
    attempts: u32,

    /// Seconds to wait between fetch attempts
    #[arg(long, env = "PLUGIN_BACKOFF", default_value_t = constants::retry::DEFAULT_BACKOFF_SECS)]
    backoff: u64,

    /// Seconds before a single git command is killed, 0 for no limit
    #[arg(long, env = "PLUGIN_TIMEOUT", default_value_t = 0)]
    timeout: u64,

    /// Show debug info
    #[arg(long, env = "PLUGIN_DEBUG")]
    debug: bool,
}

impl Cli {
    fn into_settings(self) -> Settings {
        Settings {
            target: TargetSource {
                remote: self.remote,
                override_remote: self.custom_remote_url,
                reference: self.reference,
                branch: self.branch,
                path: self.path,
                override_path: self.custom_path,
                commit: self.sha,
                event: self.event,
                pull_request: self.pr_number,
                commit_message: self.commit_message,
                commit_branch: self.commit_branch,
            },
            options: CheckoutOptions {
                depth: self.depth,
                tags: self.tags,
                recursive: self.recursive,
                skip_verify: self.skip_verify,
                submodule_remote: self.submodule_update_remote || self.submodules_update_remote,
                fetch_attempts: self.attempts,
                retry_backoff: Duration::from_secs(self.backoff),
                pr_ref_policy: self.pr_ref,
            },
            submodules: self.submodule_override.unwrap_or_default(),
            netrc: NetrcSettings {
                machine: self.netrc_machine,
                login: self.netrc_username,
                password: self.netrc_password,
            },
            command_timeout: Some(Duration::from_secs(self.timeout))
                .filter(|timeout| !timeout.is_zero()),
            debug: self.debug,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let settings = Cli::parse().into_settings();

    let command = CheckoutCommand::from_settings(&settings);
    let context = CommandContext { settings };

    match command.execute(&context).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code_for_anyhow(&e);
            eprintln!("{}", format!("Error: {e:#}").red());
            eprintln!(
                "{}",
                format!("exit {} ({})", code, get_exit_code_description(code)).red()
            );
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
