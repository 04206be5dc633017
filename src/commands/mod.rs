//! Command implementations

pub mod base;
pub mod checkout;

pub use base::{Command, CommandContext};
pub use checkout::CheckoutCommand;
