//! Core functionality for git-auth
//!
//! This module contains the credential lifecycle engine:
//! - Input validation
//! - Secret persistence in the system keyring
//! - Global git identity reads, writes and probes
//! - Connection testing
//! - The authentication controller and its published state
//! - Application configuration and profile export/import

pub mod config;
pub mod controller;
pub mod credentials;
pub mod git;
pub mod profile;
pub mod secret_store;
pub mod state;
pub mod tester;
pub mod validation;

pub use config::Config;
pub use controller::AuthController;
pub use credentials::Credentials;
pub use git::{GitConfigBridge, GitIdentity, GitRunner, SystemGit};
pub use secret_store::{KeyringStore, MemoryStore, SecretKey, SecretStore};
pub use state::{AuthState, ConnectionStatus};
pub use tester::{ConnectionTester, SimulatedTester, TestFailure};
pub use validation::ValidationError;
