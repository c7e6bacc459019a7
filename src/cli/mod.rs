//! CLI command handlers
//!
//! This module contains handlers for all CLI subcommands. Each handler builds
//! an [`AuthController`], drives it, and renders its state as text.

pub mod auth;
pub mod commands;
pub mod config;
pub mod git;
pub mod validate;

use std::io::{self, Write};

use crate::core::{AuthController, AuthState, Config};
use crate::error::Result;

/// Controller over the system services, with stored credentials loaded and
/// the initial status check finished
pub async fn loaded_controller() -> Result<AuthController> {
    let config = Config::load()?;
    let mut controller = AuthController::with_system_services(&config);
    controller.load();
    controller.settle().await;
    Ok(controller)
}

/// Prompt on stdout and read one trimmed line from stdin
///
/// An empty answer returns `default` when one is given.
pub(crate) fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    match default.filter(|d| !d.is_empty()) {
        Some(d) => print!("{} [{}]: ", label, d),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match default {
        Some(d) if input.is_empty() => d.to_string(),
        _ => input.to_string(),
    })
}

/// Render the authentication and git status block
pub(crate) fn print_status(state: &AuthState) {
    let or_not_set = |value: &str| {
        if value.is_empty() {
            "Not set".to_string()
        } else {
            value.to_string()
        }
    };

    println!("GitHub authentication");
    println!("  Status:         {}", state.connection_status);
    println!(
        "  Authenticated:  {}",
        if state.is_authenticated { "yes" } else { "no" }
    );
    println!("  Username:       {}", or_not_set(&state.credentials.username));
    println!("  Email:          {}", or_not_set(&state.credentials.email));
    println!(
        "  Token:          {}",
        state
            .credentials
            .masked_token()
            .unwrap_or_else(|| "Not set".to_string())
    );

    println!();
    println!("Git configuration");
    println!(
        "  user.name:      {}",
        state.git_identity.name.as_deref().unwrap_or("Not configured")
    );
    println!(
        "  user.email:     {}",
        state.git_identity.email.as_deref().unwrap_or("Not configured")
    );

    if !state.error_message.is_empty() {
        println!();
        println!("! {}", state.error_message);
    }
}
