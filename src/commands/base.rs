//! Base types and traits for the command pattern

use crate::config::Settings;
use anyhow::Result;

/// Context passed to all commands containing the run configuration
#[derive(Clone)]
pub struct CommandContext {
    /// Settings built from the command line and environment
    pub settings: Settings,
}

/// Trait that all commands must implement
#[async_trait::async_trait]
pub trait Command {
    /// Execute the command with the given context
    async fn execute(&self, context: &CommandContext) -> Result<()>;
}
