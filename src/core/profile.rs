//! Configuration profile export and import
//!
//! A profile is a small JSON document carrying the username, the email and
//! whether a token is stored. The token itself is never written out.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::core::credentials::Credentials;
use crate::error::{GitAuthError, Result};

/// Suggested file name for exported profiles
pub const DEFAULT_PROFILE_FILE: &str = "gitauth-config.json";

/// Exported view of a credential set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigProfile {
    pub username: String,
    pub email: String,
    pub has_token: bool,
}

impl ConfigProfile {
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            username: credentials.username.clone(),
            email: credentials.email.clone(),
            has_token: credentials.has_token(),
        }
    }

    /// Write the profile as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Fields read back from a profile; absent or non-string fields are `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileImport {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl ProfileImport {
    /// Read a profile file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse profile JSON
    ///
    /// `hasToken` and unknown fields are ignored.
    pub fn parse(contents: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(contents)?;
        let object = value.as_object().ok_or_else(|| {
            GitAuthError::InvalidInput("Configuration profile must be a JSON object".to_string())
        })?;

        let field = |name: &str| object.get(name).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            username: field("username"),
            email: field("email"),
        })
    }

    /// Overwrite the fields present in this import
    pub fn apply_to(&self, credentials: &mut Credentials) {
        if let Some(username) = &self.username {
            credentials.username = username.clone();
        }
        if let Some(email) = &self.email {
            credentials.email = email.clone();
        }
    }
}
