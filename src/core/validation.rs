//! Syntax checks for usernames, emails and personal access tokens
//!
//! These are pure functions; they never touch the keyring or git.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::ExposeSecret;

use crate::core::credentials::Credentials;

/// Maximum length of a GitHub username
const USERNAME_MAX_LEN: usize = 39;

/// Length of a classic (hex) personal access token
const CLASSIC_TOKEN_LEN: usize = 40;

/// Prefix of fine-grained personal access tokens
const FINE_GRAINED_PREFIX: &str = "ghp_";

/// Fine-grained tokens must be strictly longer than this
const FINE_GRAINED_MIN_EXCLUSIVE: usize = 20;

/// Alphanumeric runs separated by single hyphens
static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*$")
        .expect("Invalid regex pattern for username validation")
});

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$")
        .expect("Invalid regex pattern for email validation")
});

/// A single field-level validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    UsernameRequired,
    InvalidUsername,
    EmailRequired,
    InvalidEmail,
    TokenRequired,
    InvalidToken,
}

impl ValidationError {
    /// Message shown next to the offending field
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::UsernameRequired => "Username is required",
            ValidationError::InvalidUsername => "Invalid GitHub username format",
            ValidationError::EmailRequired => "Email is required",
            ValidationError::InvalidEmail => "Invalid email format",
            ValidationError::TokenRequired => "Token is required",
            ValidationError::InvalidToken => "Invalid token format",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Check a GitHub username: 1-39 alphanumerics, single inner hyphens only
pub fn validate_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= USERNAME_MAX_LEN
        && USERNAME_PATTERN.is_match(username)
}

/// Check an email of the form `local@domain.tld`
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_PATTERN.is_match(email)
}

/// Check a personal access token
///
/// Accepts either a classic 40-character hex token or a `ghp_`-prefixed
/// token longer than 20 characters.
pub fn validate_token(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }

    let len = token.chars().count();
    let classic = len == CLASSIC_TOKEN_LEN && token.chars().all(|c| c.is_ascii_hexdigit());
    let fine_grained = token.starts_with(FINE_GRAINED_PREFIX) && len > FINE_GRAINED_MIN_EXCLUSIVE;

    classic || fine_grained
}

/// Error for a username field, if any
pub fn username_error(username: &str) -> Option<ValidationError> {
    if username.is_empty() {
        Some(ValidationError::UsernameRequired)
    } else if !validate_username(username) {
        Some(ValidationError::InvalidUsername)
    } else {
        None
    }
}

/// Error for an email field, if any
pub fn email_error(email: &str) -> Option<ValidationError> {
    if email.is_empty() {
        Some(ValidationError::EmailRequired)
    } else if !validate_email(email) {
        Some(ValidationError::InvalidEmail)
    } else {
        None
    }
}

/// Error for a token field, if any
pub fn token_error(token: &str) -> Option<ValidationError> {
    if token.is_empty() {
        Some(ValidationError::TokenRequired)
    } else if !validate_token(token) {
        Some(ValidationError::InvalidToken)
    } else {
        None
    }
}

/// Validate all three fields in username, email, token order
///
/// An empty field only reports its `*Required` error.
pub fn validate_all(credentials: &Credentials) -> Vec<ValidationError> {
    [
        username_error(&credentials.username),
        email_error(&credentials.email),
        token_error(credentials.token.expose_secret()),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Render a list of errors as an indented bullet list
pub fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
