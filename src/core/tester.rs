//! Connection verification for a credential set
//!
//! The bundled tester does not contact GitHub. It applies a local policy
//! after a configurable delay standing in for network latency.

use std::thread;
use std::time::Duration;

use secrecy::ExposeSecret;
use thiserror::Error;

use crate::core::credentials::Credentials;
use crate::core::state::ConnectionStatus;

/// Tokens shorter than this are rejected by the simulated remote
const MIN_TOKEN_LEN: usize = 20;

/// Why a connection test did not succeed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFailure {
    #[error("Please fill in all required fields")]
    MissingCredentials,

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Failed to connect to GitHub")]
    ConnectionFailed,
}

/// Verifies that a credential set can authenticate
///
/// Implementations may block; the controller always calls them from a
/// blocking worker.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionTester: Send + Sync {
    fn test(&self, credentials: &Credentials) -> std::result::Result<ConnectionStatus, TestFailure>;
}

/// Local stand-in for a GitHub round trip
#[derive(Debug, Clone)]
pub struct SimulatedTester {
    latency: Duration,
}

impl SimulatedTester {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// A tester that answers immediately
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl ConnectionTester for SimulatedTester {
    fn test(&self, credentials: &Credentials) -> std::result::Result<ConnectionStatus, TestFailure> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        if credentials.is_incomplete() {
            return Err(TestFailure::MissingCredentials);
        }

        if credentials.token.expose_secret().chars().count() < MIN_TOKEN_LEN {
            return Err(TestFailure::InvalidToken);
        }

        Ok(ConnectionStatus::Connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX_TOKEN: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn test_connected() {
        let creds = Credentials::new("octocat", "a@b.com", HEX_TOKEN);
        assert_eq!(
            SimulatedTester::instant().test(&creds),
            Ok(ConnectionStatus::Connected)
        );
    }

    #[test]
    fn test_missing_field() {
        let tester = SimulatedTester::instant();
        for creds in [
            Credentials::new("", "a@b.com", HEX_TOKEN),
            Credentials::new("octocat", "", HEX_TOKEN),
            Credentials::new("octocat", "a@b.com", ""),
        ] {
            assert_eq!(tester.test(&creds), Err(TestFailure::MissingCredentials));
        }
    }

    #[test]
    fn test_short_token() {
        let creds = Credentials::new("octocat", "a@b.com", "0123456789");
        let result = SimulatedTester::instant().test(&creds);
        assert_eq!(result, Err(TestFailure::InvalidToken));
        assert_eq!(result.unwrap_err().to_string(), "Invalid token format");
    }

    #[test]
    fn test_token_at_minimum_length() {
        let creds = Credentials::new("octocat", "a@b.com", "x".repeat(20));
        assert_eq!(
            SimulatedTester::instant().test(&creds),
            Ok(ConnectionStatus::Connected)
        );
    }
}
