//! Git operations using the system git binary
//!
//! ## Sub-modules
//!
//! - [`engine`]: The process boundary to git
//!   - `GitEngine` - Trait for running one git command
//!   - `SystemGit` - Implementation spawning the git binary
//!
//! - [`commands`]: Argument lists for every git command the checkout issues
//!
//! - [`checkout`]: The checkout state machine
//!   - `Checkout` - Drives an engine from `Init` to `Done`
//!   - `CheckoutReport` - Summary of a successful run
//!
//! - [`common`]: Shared utilities and helpers
//!   - `Logger` - Consistent logging for checkout operations

pub mod checkout;
pub mod commands;
pub mod common;
pub mod engine;

pub use checkout::{Checkout, CheckoutReport, CheckoutState};
pub use common::Logger;
pub use engine::{CommandOutput, GitEngine, SystemGit};
