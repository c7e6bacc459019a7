//! Secure credential storage using the system keyring
//!
//! Three secrets are kept under one service name: the username, the email
//! and the personal access token. Nothing else goes in the vault.
//!
//! Uses the system keyring (macOS Keychain, Linux Secret Service) with
//! an in-memory read cache to minimize keychain prompts.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use keyring::Entry;
use tracing::{debug, warn};

use crate::error::{GitAuthError, Result};

/// Service name all entries are filed under
pub const SERVICE_NAME: &str = "git-auth-manager";

/// Account keys used inside the vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretKey {
    Username,
    Email,
    Token,
}

impl SecretKey {
    pub const ALL: [SecretKey; 3] = [SecretKey::Username, SecretKey::Email, SecretKey::Token];

    /// Account name in the vault
    pub fn account(&self) -> &'static str {
        match self {
            SecretKey::Username => "username",
            SecretKey::Email => "email",
            SecretKey::Token => "token",
        }
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.account())
    }
}

/// Durable storage for the three credential secrets
///
/// `get` never fails: an absent entry and an unreadable one both come back
/// as `None`. Writes report vault failures to the caller.
#[cfg_attr(test, mockall::automock)]
pub trait SecretStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    fn save(&self, key: SecretKey, value: &str) -> Result<()>;

    /// Read the value stored under `key`
    fn get(&self, key: SecretKey) -> Option<String>;

    /// Remove `key`; removing an absent key is not an error
    fn delete(&self, key: SecretKey) -> Result<()>;

    /// Remove all three keys
    ///
    /// Every key is attempted even if an earlier one fails; the first
    /// failure is returned.
    fn clear_all(&self) -> Result<()> {
        let mut first_error = None;
        for key in SecretKey::ALL {
            if let Err(e) = self.delete(key) {
                warn!(key = %key, error = %e, "failed to delete secret");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

// In-memory read cache per key:
//   - missing = not yet fetched from keyring
//   - Some(None) = fetched, but no credential exists
//   - Some(Some(value)) = fetched and cached
type ReadCache = HashMap<SecretKey, Option<String>>;

/// [`SecretStore`] backed by the OS keyring
pub struct KeyringStore {
    service: String,
    cache: RwLock<ReadCache>,
}

impl KeyringStore {
    /// Create a store under the application's service name
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Create a store under a custom service name
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn entry(&self, key: SecretKey) -> Result<Entry> {
        Ok(Entry::new(&self.service, key.account())?)
    }

    fn remember(&self, key: SecretKey, value: Option<String>) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, value);
        }
    }

    /// Fetch directly from the keyring (no cache)
    fn fetch(&self, key: SecretKey) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(GitAuthError::Credential(format!(
                "Cannot access system keychain. Make sure your keyring is unlocked. ({})",
                e
            ))),
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringStore {
    fn save(&self, key: SecretKey, value: &str) -> Result<()> {
        // set_password replaces the existing entry in place
        self.entry(key)?.set_password(value).map_err(|e| {
            warn!(key = %key, error = %e, "failed to save secret");
            GitAuthError::from(e)
        })?;

        self.remember(key, Some(value.to_string()));
        Ok(())
    }

    fn get(&self, key: SecretKey) -> Option<String> {
        if let Ok(cache) = self.cache.read() {
            if let Some(cached) = cache.get(&key) {
                return cached.clone();
            }
        }

        match self.fetch(key) {
            Ok(value) => {
                self.remember(key, value.clone());
                value
            }
            Err(e) => {
                // Not cached so a later read can retry once the keyring unlocks
                warn!(key = %key, error = %e, "secret unreadable, treating as absent");
                None
            }
        }
    }

    fn delete(&self, key: SecretKey) -> Result<()> {
        let result = match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => {
                warn!(key = %key, error = %e, "failed to delete secret");
                Err(GitAuthError::Credential(e.to_string()))
            }
        };

        if result.is_ok() {
            debug!(key = %key, "secret removed");
            self.remember(key, None);
        } else if let Ok(mut cache) = self.cache.write() {
            cache.remove(&key);
        }

        result
    }
}

/// [`SecretStore`] that lives only as long as the process
///
/// Useful for embedding the controller where no OS vault exists, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<SecretKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemoryStore {
    fn save(&self, key: SecretKey, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| GitAuthError::Credential("in-memory store poisoned".into()))?;
        values.insert(key, value.to_string());
        Ok(())
    }

    fn get(&self, key: SecretKey) -> Option<String> {
        self.values.read().ok()?.get(&key).cloned()
    }

    fn delete(&self, key: SecretKey) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| GitAuthError::Credential("in-memory store poisoned".into()))?;
        values.remove(&key);
        Ok(())
    }
}
