//! Application configuration management
//!
//! Handles loading and saving application settings:
//! - Path of the git executable
//! - Simulated connection-test latency

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{GitAuthError, Result};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Git executable used for config reads, writes and probes
    #[serde(default = "default_git_binary")]
    pub git_binary: String,

    /// Delay of the simulated connection test in milliseconds
    #[serde(default = "default_test_latency_ms")]
    pub test_latency_ms: u64,
}

fn default_git_binary() -> String {
    "git".to_string()
}

fn default_test_latency_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_binary: default_git_binary(),
            test_latency_ms: default_test_latency_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "git-auth", "git-auth")
            .ok_or_else(|| GitAuthError::Config("Could not determine config directory".into()))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Simulated connection-test latency
    pub fn test_latency(&self) -> Duration {
        Duration::from_millis(self.test_latency_ms)
    }

    /// Set the git executable
    pub fn set_git_binary(&mut self, binary: impl Into<String>) -> Result<()> {
        let binary = binary.into();
        if binary.trim().is_empty() {
            return Err(GitAuthError::InvalidInput(
                "Git binary path cannot be empty".to_string(),
            ));
        }
        self.git_binary = binary;
        Ok(())
    }

    /// Set the test latency from a user-supplied string of milliseconds
    pub fn set_test_latency(&mut self, value: &str) -> Result<()> {
        self.test_latency_ms = value.trim().parse().map_err(|_| {
            GitAuthError::InvalidInput(format!(
                "Invalid latency '{}'. Expected a whole number of milliseconds.",
                value
            ))
        })?;
        Ok(())
    }
}
