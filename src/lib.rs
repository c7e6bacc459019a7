//! git-auth - store, validate and verify Git/GitHub credentials
//!
//! This library keeps one username/email/token set in the system keyring,
//! checks it against GitHub's formats, reconciles it with the global git
//! configuration and exposes the resulting authentication state. The `cli`
//! module is a thin command-line front end over [`core::AuthController`].

pub mod cli;
pub mod core;
pub mod error;

pub use error::{GitAuthError, Result};
