//! The active credential set
//!
//! A single username/email/token triple is active at a time. The token is
//! kept in a [`SecretString`] so it never leaks through `Debug` output.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Username, email and personal access token for one account
#[derive(Clone)]
pub struct Credentials {
    /// GitHub username
    pub username: String,
    /// Commit email address
    pub email: String,
    /// Personal access token
    pub token: SecretString,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let token: String = token.into();
        Self {
            username: username.into(),
            email: email.into(),
            token: SecretString::from(token),
        }
    }

    /// Whether a token has been entered
    pub fn has_token(&self) -> bool {
        !self.token.expose_secret().is_empty()
    }

    /// Whether any of the three fields is empty
    pub fn is_incomplete(&self) -> bool {
        self.username.is_empty() || self.email.is_empty() || !self.has_token()
    }

    /// Masked token for display, or `None` when no token is set
    pub fn masked_token(&self) -> Option<String> {
        self.has_token().then(|| mask_token(&self.token))
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.email == other.email
            && self.token.expose_secret() == other.token.expose_secret()
    }
}

impl Eq for Credentials {}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("token", &self.masked_token())
            .finish()
    }
}

/// Get a masked version of a token for display (shows first 4 and last 4 chars)
pub fn mask_token(token: &SecretString) -> String {
    let exposed = token.expose_secret();
    let chars: Vec<char> = exposed.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
