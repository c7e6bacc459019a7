//! Global git identity operations
//!
//! Reads and writes `user.name` / `user.email` in the global git config by
//! shelling out to the git binary. Every invocation goes through the
//! [`GitRunner`] trait so the bridge can be driven without spawning processes.

use std::process::Command;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{GitAuthError, Result};

const NAME_KEY: &str = "user.name";
const EMAIL_KEY: &str = "user.email";

/// Captured result of one git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl GitOutput {
    /// Whether git exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs git with the given arguments
///
/// `Err` means git could not be started at all. A non-zero exit is still
/// `Ok` and shows up in [`GitOutput::exit_code`].
pub trait GitRunner: Send + Sync {
    fn run(&self, args: &[&str]) -> Result<GitOutput>;
}

/// [`GitRunner`] that spawns a real git process
#[derive(Debug, Clone)]
pub struct SystemGit {
    binary: String,
}

impl SystemGit {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str]) -> Result<GitOutput> {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| {
                GitAuthError::GitUnavailable(format!("failed to execute {}: {}", self.binary, e))
            })?;

        Ok(GitOutput {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

/// Global git name and email, each absent if unset or unreadable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl GitIdentity {
    /// Whether git has a global user name
    pub fn is_configured(&self) -> bool {
        self.name.is_some()
    }
}

/// Bridge between the credential set and the global git config
#[derive(Clone)]
pub struct GitConfigBridge {
    runner: Arc<dyn GitRunner>,
}

impl GitConfigBridge {
    pub fn new(runner: Arc<dyn GitRunner>) -> Self {
        Self { runner }
    }

    /// Set global `user.name` and `user.email`
    pub fn configure_global(&self, username: &str, email: &str) -> Result<()> {
        self.set(NAME_KEY, username)?;
        self.set(EMAIL_KEY, email)?;
        debug!(username, email, "global git identity updated");
        Ok(())
    }

    /// Read global `user.name` and `user.email`
    pub fn read_global_config(&self) -> GitIdentity {
        GitIdentity {
            name: self.get(NAME_KEY),
            email: self.get(EMAIL_KEY),
        }
    }

    /// Check whether git is installed and has a global user name
    ///
    /// `Ok(false)` means git ran but `user.name` is unset; `Err` means git
    /// could not be run.
    pub fn probe_liveness(&self) -> Result<bool> {
        let output = self.runner.run(&["config", "--global", NAME_KEY])?;
        Ok(output.success())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let output = self.runner.run(&["config", "--global", key, value])?;
        if !output.success() {
            let detail = if output.stderr.is_empty() {
                format!("git exited with status {}", output.exit_code)
            } else {
                output.stderr
            };
            return Err(GitAuthError::GitConfig(format!(
                "could not set {}: {}",
                key, detail
            )));
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.runner.run(&["config", "--global", key]) {
            Ok(output) if output.success() && !output.stdout.is_empty() => Some(output.stdout),
            Ok(_) => None,
            Err(e) => {
                warn!(key, error = %e, "could not read git config");
                None
            }
        }
    }
}
