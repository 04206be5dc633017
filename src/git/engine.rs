//! Process-execution boundary to the git binary
//!
//! The orchestrator only ever talks to a [`GitEngine`]: arguments in,
//! status and captured output back. [`SystemGit`] runs the real binary;
//! tests substitute scripted engines.

use crate::constants;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Captured result of one git invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            stderr: stderr.into(),
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0) && !self.timed_out
    }

    /// Human-readable failure cause
    ///
    /// Prefers stderr, falls back to stdout, then to the exit status.
    pub fn diagnostic(&self) -> String {
        if self.timed_out {
            return "timed out".to_string();
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.status {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs git with the given arguments inside a directory
pub trait GitEngine {
    /// Run one git command
    ///
    /// `Err` means git could not be started at all; a non-zero exit is an
    /// `Ok` output with a failing status.
    fn run(&self, dir: &Path, args: &[String]) -> Result<CommandOutput>;
}

impl<E: GitEngine + ?Sized> GitEngine for &E {
    fn run(&self, dir: &Path, args: &[String]) -> Result<CommandOutput> {
        (**self).run(dir, args)
    }
}

/// Engine backed by the system git binary
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: String,
    envs: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemGit {
    pub fn new() -> Self {
        Self {
            program: constants::git::GIT_BINARY.to_string(),
            envs: Vec::new(),
            timeout: None,
        }
    }

    /// Use a different executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Add an environment variable to every invocation
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Kill invocations running longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|timeout| !timeout.is_zero());
        self
    }
}

impl GitEngine for SystemGit {
    fn run(&self, dir: &Path, args: &[String]) -> Result<CommandOutput> {
        let mut child = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to execute {} {}", self.program, args.join(" ")))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let (status, timed_out) = wait(&mut child, self.timeout)?;

        Ok(CommandOutput {
            status,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
            timed_out,
        })
    }
}

/// Read a pipe to completion on a separate thread
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut content = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut content);
        }
        String::from_utf8_lossy(&content).into_owned()
    })
}

/// Wait for the child, killing it once the timeout elapses
fn wait(child: &mut Child, timeout: Option<Duration>) -> Result<(Option<i32>, bool)> {
    let Some(timeout) = timeout else {
        let status = child.wait().context("Failed to wait for git")?;
        return Ok((status.code(), false));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait().context("Failed to wait for git")? {
            return Ok((status.code(), false));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let status = child.wait().context("Failed to reap timed out git")?;
            return Ok((status.code(), true));
        }
        thread::sleep(Duration::from_millis(50));
    }
}
