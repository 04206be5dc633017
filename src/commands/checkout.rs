//! Checkout command implementation

use super::{Command, CommandContext};
use crate::config::Settings;
use crate::errors::CheckoutError;
use crate::git::{Checkout, GitEngine, SystemGit};
use crate::netrc::NetrcWriter;
use crate::utils::sanitizers::redact_env_value;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;

/// Checkout command materializing the configured revision in the workspace
pub struct CheckoutCommand<E = SystemGit> {
    engine: E,
    netrc: NetrcWriter,
}

impl CheckoutCommand<SystemGit> {
    /// Command using the system git and the current user's home directory
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            SystemGit::new().with_timeout(settings.command_timeout),
            NetrcWriter::from_env(),
        )
    }
}

impl<E> CheckoutCommand<E> {
    pub fn new(engine: E, netrc: NetrcWriter) -> Self {
        Self { engine, netrc }
    }
}

#[async_trait]
impl<E> Command for CheckoutCommand<E>
where
    E: GitEngine + Clone + Send + Sync + 'static,
{
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let settings = &context.settings;

        if settings.debug {
            print_debug_dump(settings);
        }

        let target = settings.resolve().map_err(CheckoutError::from)?;

        if settings.netrc.is_partial() {
            println!(
                "{}",
                "Incomplete netrc credentials supplied, skipping credential setup".yellow()
            );
        }
        if let Some(path) = self.netrc.provision(settings.netrc.credentials().as_ref())? {
            println!("{}", format!("Wrote credentials to {}", path.display()).green());
        }

        if target.dependency_repo {
            println!(
                "{}",
                format!(
                    "Checking out dependency repository into {}",
                    target.path.display()
                )
                .green()
            );
        }

        let engine = self.engine.clone();
        let options = settings.options.clone();
        let submodules = settings.submodules.clone();
        let report = tokio::task::spawn_blocking(move || {
            Checkout::new(engine, &target, &options, &submodules).run()
        })
        .await??;

        match report.head {
            Some(head) => println!("{}", format!("HEAD is now at {}", head).green()),
            None => println!("{}", "Done".green()),
        }

        Ok(())
    }
}

/// Print the resolved settings and the process environment with secrets masked
fn print_debug_dump(settings: &Settings) {
    println!("{}", "Settings:".cyan().bold());
    println!("{}", settings.to_debug_json());

    println!("{}", "Environment:".cyan().bold());
    let mut vars: Vec<(String, String)> = std::env::vars_os()
        .map(|(key, value)| {
            (
                key.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect();
    vars.sort();
    for (key, value) in vars {
        println!("{}={}", key, redact_env_value(&key, &value));
    }
}
