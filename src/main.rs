//! gitauth - Git/GitHub credential manager
//!
//! Keeps a GitHub username, email and personal access token in the system
//! keyring and mirrors the identity into the global git config.
//! Run without arguments to show the current status.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_auth::cli::commands::{Cli, Commands};
use git_auth::cli::{auth, config, git, validate};
use git_auth::error::{GitAuthError, Result};

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        handle_error(&e);
        std::process::exit(1);
    }
}

/// Print an error, with a hint for failures the user can fix locally
fn handle_error(e: &GitAuthError) {
    eprintln!("Error: {}", e);

    if let GitAuthError::Validation(_) = e {
        eprintln!();
        eprintln!("Check individual values with: gitauth validate --username <name> --email <email> --token <token>");
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // No subcommand - show status
        None => auth::handle_status().await,

        Some(Commands::Auth(args)) => auth::handle_auth(args.command).await,
        Some(Commands::Git(args)) => git::handle_git(args.command).await,
        Some(Commands::Config(args)) => config::handle_config(args.command).await,

        // Validation never touches the keyring or git
        Some(Commands::Validate(args)) => validate::handle_validate(args),
    }
}
