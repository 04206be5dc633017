//! Exit code utilities and mappings

use crate::errors::{CheckoutError, Phase};

/// Exit code for a failure that is not a [`CheckoutError`]
pub const GENERAL_ERROR: i32 = 1;

/// Get the process exit code for a checkout failure
pub fn exit_code_for(error: &CheckoutError) -> i32 {
    match error.phase() {
        Phase::Configuration => 2,
        Phase::Credentials => 3,
        Phase::Clone | Phase::Fetch => 4,
        Phase::Checkout => 5,
        Phase::Submodule => 6,
    }
}

/// Exit code for any error surfaced by the command layer
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<CheckoutError>()
        .map(exit_code_for)
        .unwrap_or(GENERAL_ERROR)
}

/// Get a human-readable description for an exit code
pub fn get_exit_code_description(exit_code: i32) -> &'static str {
    match exit_code {
        0 => "success",
        1 => "general error",
        2 => "invalid configuration",
        3 => "credential store not writable",
        4 => "clone or fetch failed",
        5 => "checkout failed",
        6 => "submodule update failed",
        _ => "error",
    }
}
