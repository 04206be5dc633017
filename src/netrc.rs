//! Transient credential store
//!
//! Git's HTTP transport reads `~/.netrc` for machine-keyed logins. Before any
//! network operation the checkout writes exactly one entry there, replacing
//! whatever a previous job left behind. The file lives as long as the job's
//! home directory and is not cleaned up.

use crate::constants;
use crate::errors::CheckoutError;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Machine, login and password triple
///
/// Only constructible with all three fields present.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    machine: String,
    login: String,
    password: String,
}

impl Credentials {
    /// Build credentials, or `None` when any field is empty
    ///
    /// Machine and login are trimmed; the password is stored exactly as given.
    pub fn from_parts(machine: &str, login: &str, password: &str) -> Option<Self> {
        let (machine, login) = (machine.trim(), login.trim());
        if machine.is_empty() || login.is_empty() || password.trim().is_empty() {
            return None;
        }
        Some(Self {
            machine: machine.to_string(),
            login: login.to_string(),
            password: password.to_string(),
        })
    }

    pub fn machine(&self) -> &str {
        &self.machine
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    /// Render the netrc entry
    pub fn to_netrc(&self) -> String {
        format!(
            "machine {}\nlogin {}\npassword {}\n",
            self.machine, self.login, self.password
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("machine", &self.machine)
            .field("login", &self.login)
            .field("password", &constants::redaction::MASK)
            .finish()
    }
}

/// Writes the netrc file into a home directory
#[derive(Debug, Clone)]
pub struct NetrcWriter {
    home: PathBuf,
}

impl NetrcWriter {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Writer for the current user's home directory
    pub fn from_env() -> Self {
        let home = std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(constants::netrc::FALLBACK_HOME));
        Self::new(home)
    }

    /// Location of the credential record
    pub fn path(&self) -> PathBuf {
        self.home.join(constants::netrc::FILE_NAME)
    }

    /// Write the record for `credentials`
    ///
    /// Returns the written path, or `None` when there is nothing to write.
    pub fn provision(
        &self,
        credentials: Option<&Credentials>,
    ) -> Result<Option<PathBuf>, CheckoutError> {
        let Some(credentials) = credentials else {
            return Ok(None);
        };

        let path = self.path();
        write_private(&self.home, &path, credentials.to_netrc().as_bytes()).map_err(|e| {
            CheckoutError::Credential {
                path: path.clone(),
                cause: e.to_string(),
            }
        })?;
        Ok(Some(path))
    }
}

/// Atomically replace `path` with a file readable only by the owner
fn write_private(dir: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
