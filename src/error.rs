//! Custom error types for git-auth
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

/// Main error type for the git-auth application
#[derive(Error, Debug)]
pub enum GitAuthError {
    /// Credential storage error
    #[error("Cannot access secure storage: {0}\n\n  → On macOS: Make sure Keychain Access is available.\n  → On Linux: Ensure a secret service (like gnome-keyring) is running.")]
    Credential(String),

    /// The git binary could not be started
    #[error("Could not run git: {0}\n\n  → Make sure git is installed and on your PATH.\n  → Or point 'gitauth config set git-binary' at your git executable.")]
    GitUnavailable(String),

    /// A git command ran but reported failure
    #[error("Git configuration failed: {0}")]
    GitConfig(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials failed local validation
    #[error("Credentials are not valid:\n{0}")]
    Validation(String),

    /// Connection test did not succeed
    #[error("Connection test failed: {0}\n\n  → Check your token, then run 'gitauth auth login' again.")]
    ConnectionFailed(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to read configuration profile: {0}\n\n  → Expected a JSON object like {{\"username\": \"...\", \"email\": \"...\", \"hasToken\": true}}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),

    /// Failure already rendered into the published state's error message
    #[error("{0}")]
    Reported(String),

    /// A background task was dropped before reporting back
    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<keyring::Error> for GitAuthError {
    fn from(err: keyring::Error) -> Self {
        GitAuthError::Credential(err.to_string())
    }
}

impl From<toml::de::Error> for GitAuthError {
    fn from(err: toml::de::Error) -> Self {
        GitAuthError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for GitAuthError {
    fn from(err: toml::ser::Error) -> Self {
        GitAuthError::Toml(err.to_string())
    }
}

/// Result type alias using GitAuthError
pub type Result<T> = std::result::Result<T, GitAuthError>;
