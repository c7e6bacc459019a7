//! CLI command definitions using clap
//!
//! Defines the command structure for the `gitauth` CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// gitauth - Git/GitHub credential manager
///
/// Stores your GitHub username, email and personal access token in the
/// system keyring and keeps the global git identity in sync.
/// Run without arguments to show the current status.
#[derive(Parser, Debug)]
#[command(name = "gitauth", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign out and check authentication
    Auth(AuthArgs),

    /// Read or write the global git identity
    Git(GitArgs),

    /// Manage configuration and profiles
    Config(ConfigArgs),

    /// Check credential formats without storing anything
    Validate(ValidateArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication commands
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Store credentials and test them
    Login {
        /// GitHub username (prompted if omitted)
        #[arg(long, short)]
        username: Option<String>,

        /// Email address (prompted if omitted)
        #[arg(long, short)]
        email: Option<String>,

        /// Personal access token (prompted if omitted)
        #[arg(long, env = "GITAUTH_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Remove stored credentials
    Logout,
    /// Show current authentication status
    Status,
    /// Test the stored credentials
    Test,
}

// ─────────────────────────────────────────────────────────────────────────────
// Git Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Git identity commands
#[derive(Parser, Debug)]
pub struct GitArgs {
    #[command(subcommand)]
    pub command: GitCommand,
}

#[derive(Subcommand, Debug)]
pub enum GitCommand {
    /// Set global user.name and user.email from the stored credentials
    Configure,
    /// Show global user.name and user.email
    Show,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },

    /// Reset a configuration value to its default
    Remove {
        /// Configuration key
        key: ConfigKey,
    },

    /// Export username, email and token presence to a JSON file
    Export {
        /// Destination file
        #[arg(default_value = crate::core::profile::DEFAULT_PROFILE_FILE)]
        path: PathBuf,
    },

    /// Import username and email from a JSON file and store them
    Import {
        /// Source file
        path: PathBuf,
    },
}

/// Available configuration keys
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigKey {
    /// Path of the git executable
    #[value(name = "git-binary")]
    GitBinary,

    /// Simulated connection test latency in milliseconds
    #[value(name = "test-latency")]
    TestLatency,
}

// ─────────────────────────────────────────────────────────────────────────────
// Validate Command
// ─────────────────────────────────────────────────────────────────────────────

/// Validate command arguments
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// GitHub username to check
    #[arg(long, short)]
    pub username: Option<String>,

    /// Email address to check
    #[arg(long, short)]
    pub email: Option<String>,

    /// Personal access token to check
    #[arg(long)]
    pub token: Option<String>,
}
