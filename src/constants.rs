//! Central constants for the ci-checkout application

/// Default values for Git operations
pub mod git {
    /// Reference checked out when the job does not supply one
    pub const DEFAULT_REF: &str = "refs/heads/master";

    /// Prefix used to turn a branch name into a fully qualified reference
    pub const BRANCH_REF_PREFIX: &str = "refs/heads/";

    /// Name of the remote configured in the workspace
    pub const REMOTE_NAME: &str = "origin";

    /// Pseudo-ref written by `git fetch` for the last fetched tip
    pub const FETCH_HEAD: &str = "FETCH_HEAD";

    /// Name of the git binary invoked by the system engine
    pub const GIT_BINARY: &str = "git";

    /// File in the workspace root declaring submodule names and paths
    pub const GITMODULES: &str = ".gitmodules";
}

/// Default values for the fetch retry loop
pub mod retry {
    /// Number of fetch attempts before giving up
    pub const DEFAULT_FETCH_ATTEMPTS: u32 = 3;

    /// Seconds to wait between two fetch attempts
    pub const DEFAULT_BACKOFF_SECS: u64 = 5;

    /// Lowercase fragments of fetch diagnostics that another attempt cannot fix
    pub const PERMANENT_FETCH_ERRORS: &[&str] = &[
        "couldn't find remote ref",
        "authentication failed",
        "could not read username",
        "could not read password",
        "permission denied",
        "repository not found",
        "does not appear to be a git repository",
        "invalid refspec",
        "not our ref",
    ];
}

/// Values for the transient credential store
pub mod netrc {
    /// File name of the credential record inside the home directory
    pub const FILE_NAME: &str = ".netrc";

    /// Home directory used when `HOME` is not set
    pub const FALLBACK_HOME: &str = "/root";
}

/// Markers identifying environment variables that carry secrets
pub mod redaction {
    /// Substrings of variable names whose values are never printed
    pub const SENSITIVE_MARKERS: &[&str] = &["PASSWORD", "TOKEN", "SECRET"];

    /// Replacement text for redacted values
    pub const MASK: &str = "******";
}
