//! Offline credential format checks

use crate::cli::commands::ValidateArgs;
use crate::core::validation::{
    email_error, format_errors, token_error, username_error, ValidationError,
};
use crate::error::{GitAuthError, Result};

/// Check each supplied field and report the ones that fail
///
/// Nothing is read from or written to the keyring.
pub fn handle_validate(args: ValidateArgs) -> Result<()> {
    let checks: Vec<(&str, Option<ValidationError>)> = [
        ("Username", args.username.as_deref().map(username_error)),
        ("Email", args.email.as_deref().map(email_error)),
        ("Token", args.token.as_deref().map(token_error)),
    ]
    .into_iter()
    .filter_map(|(label, result)| result.map(|error| (label, error)))
    .collect();

    if checks.is_empty() {
        return Err(GitAuthError::InvalidInput(
            "Nothing to validate. Pass --username, --email or --token.".to_string(),
        ));
    }

    let mut errors = Vec::new();
    for (label, error) in checks {
        match error {
            None => println!("✓ {} is valid", label),
            Some(e) => {
                println!("✗ {}: {}", label, e);
                errors.push(e);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(GitAuthError::Validation(format_errors(&errors)))
    }
}
