//! Authentication CLI command handlers

use tracing::debug;

use crate::cli::commands::AuthCommand;
use crate::cli::{loaded_controller, print_status, prompt};
use crate::core::validation::format_errors;
use crate::core::{AuthController, ConnectionStatus};
use crate::error::{GitAuthError, Result};

/// Handle authentication commands
pub async fn handle_auth(command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Login {
            username,
            email,
            token,
        } => handle_login(username, email, token).await,
        AuthCommand::Logout => handle_logout().await,
        AuthCommand::Status => handle_status().await,
        AuthCommand::Test => handle_test().await,
    }
}

/// Handle the login command
///
/// Missing values are prompted for, defaulting to what is already stored.
async fn handle_login(
    username: Option<String>,
    email: Option<String>,
    token: Option<String>,
) -> Result<()> {
    let mut controller = loaded_controller().await?;
    let stored = controller.state().credentials.clone();

    let username = match username {
        Some(u) => u,
        None => prompt("GitHub username", Some(stored.username.as_str()))?,
    };
    let email = match email {
        Some(e) => e,
        None => prompt("Email address", Some(stored.email.as_str()))?,
    };
    let token = match token {
        Some(t) => t,
        None => {
            println!("Create a token at https://github.com/settings/tokens/new (scopes: repo, read:org)");
            prompt("Personal access token", None)?
        }
    };

    controller.set_username(username);
    controller.set_email(email);
    controller.set_token(token);

    controller.sign_in()?;
    println!("✓ Credentials saved to the system keyring.");

    println!("Testing connection...");
    controller.settle().await;
    report_test(&controller)?;

    println!(
        "✓ Successfully authenticated as {}.",
        controller.state().credentials.username
    );
    println!("  Run 'gitauth git configure' to use this identity for commits.");
    Ok(())
}

/// Handle the logout command
async fn handle_logout() -> Result<()> {
    let mut controller = loaded_controller().await?;
    controller.sign_out()?;
    println!("✓ Stored credentials removed.");
    Ok(())
}

/// Handle the status command
pub async fn handle_status() -> Result<()> {
    let mut controller = loaded_controller().await?;
    controller.load_git_config();
    controller.settle().await;
    print_status(controller.state());
    Ok(())
}

/// Handle the test command
async fn handle_test() -> Result<()> {
    let mut controller = loaded_controller().await?;

    println!("Testing connection...");
    controller.test_connection();
    controller.settle().await;
    report_test(&controller)?;

    println!("✓ Connection test passed.");
    Ok(())
}

/// Turn the outcome of a finished test into a command result
fn report_test(controller: &AuthController) -> Result<()> {
    let state = controller.state();
    debug!(status = %state.connection_status, "connection test reported");

    if !state.validation_errors.is_empty() {
        return Err(GitAuthError::Validation(format_errors(
            &state.validation_errors,
        )));
    }

    match state.connection_status {
        ConnectionStatus::Connected => Ok(()),
        _ => Err(GitAuthError::ConnectionFailed(state.error_message.clone())),
    }
}
