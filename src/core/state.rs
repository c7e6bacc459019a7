//! Published authentication state
//!
//! [`AuthState`] is what the presentation layer renders. It is owned and
//! mutated by the [`AuthController`](crate::core::AuthController) only;
//! everyone else receives snapshots.

use std::fmt;

use crate::core::credentials::Credentials;
use crate::core::git::GitIdentity;
use crate::core::validation::ValidationError;

/// Result of the most recent connection test or status check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    /// A test is in flight
    Testing,
    Connected,
    Failed,
}

impl ConnectionStatus {
    /// Get a human-readable display name
    pub fn display_text(&self) -> &'static str {
        match self {
            ConnectionStatus::Unknown => "Unknown",
            ConnectionStatus::Testing => "Testing...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// Everything the UI needs to render the authentication screens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Credential set currently being edited or in use
    pub credentials: Credentials,
    /// Errors from the last validation pass, in field order
    pub validation_errors: Vec<ValidationError>,
    pub connection_status: ConnectionStatus,
    /// Set by a successful test or status check, cleared by sign-out or a
    /// status check that finds git unconfigured
    pub is_authenticated: bool,
    /// A connection test is outstanding
    pub is_loading: bool,
    /// Last user-facing error, empty when there is none
    pub error_message: String,
    /// Global git identity as last read from git
    pub git_identity: GitIdentity,
}

impl AuthState {
    /// Whether `error` was reported by the last validation pass
    pub fn has_validation_error(&self, error: ValidationError) -> bool {
        self.validation_errors.contains(&error)
    }
}
