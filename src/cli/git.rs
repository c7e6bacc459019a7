//! Git identity CLI command handlers

use crate::cli::commands::GitCommand;
use crate::cli::loaded_controller;
use crate::core::AuthState;
use crate::error::{GitAuthError, Result};

/// Handle git commands
pub async fn handle_git(command: GitCommand) -> Result<()> {
    match command {
        GitCommand::Configure => handle_configure().await,
        GitCommand::Show => handle_show().await,
    }
}

/// Write the stored username and email to the global git config
async fn handle_configure() -> Result<()> {
    let mut controller = loaded_controller().await?;
    controller.configure_git();
    controller.settle().await;

    let state = controller.state();
    configure_outcome(state)?;

    println!("✓ Global git identity updated.");
    println!(
        "  user.name:  {}",
        state.git_identity.name.as_deref().unwrap_or_default()
    );
    println!(
        "  user.email: {}",
        state.git_identity.email.as_deref().unwrap_or_default()
    );
    Ok(())
}

/// Result of a finished configure run
///
/// `error_message` already holds the full user-facing text, so it is passed
/// through unchanged.
fn configure_outcome(state: &AuthState) -> Result<()> {
    if state.error_message.is_empty() {
        Ok(())
    } else {
        Err(GitAuthError::Reported(state.error_message.clone()))
    }
}

/// Print the global git identity
async fn handle_show() -> Result<()> {
    let mut controller = loaded_controller().await?;
    controller.load_git_config();
    controller.settle().await;

    let identity = &controller.state().git_identity;
    println!(
        "user.name:  {}",
        identity.name.as_deref().unwrap_or("Not configured")
    );
    println!(
        "user.email: {}",
        identity.email.as_deref().unwrap_or("Not configured")
    );
    Ok(())
}
