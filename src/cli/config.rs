//! Configuration CLI command handlers

use std::path::Path;

use crate::cli::commands::{ConfigCommand, ConfigKey};
use crate::cli::loaded_controller;
use crate::core::config::Config;
use crate::error::Result;

/// Handle configuration commands
pub async fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => handle_set(key, value),
        ConfigCommand::Get { key } => handle_get(key),
        ConfigCommand::Remove { key } => handle_remove(key),
        ConfigCommand::Export { path } => handle_export(&path).await,
        ConfigCommand::Import { path } => handle_import(&path).await,
    }
}

/// Handle setting a configuration value
fn handle_set(key: ConfigKey, value: String) -> Result<()> {
    let mut config = Config::load()?;
    match key {
        ConfigKey::GitBinary => {
            config.set_git_binary(value)?;
            println!("Git binary set to: {}", config.git_binary);
        }
        ConfigKey::TestLatency => {
            config.set_test_latency(&value)?;
            println!("Test latency set to: {} ms", config.test_latency_ms);
        }
    }
    config.save()
}

/// Handle getting a configuration value
fn handle_get(key: ConfigKey) -> Result<()> {
    let config = Config::load()?;
    match key {
        ConfigKey::GitBinary => println!("Git binary: {}", config.git_binary),
        ConfigKey::TestLatency => println!("Test latency: {} ms", config.test_latency_ms),
    }
    Ok(())
}

/// Handle resetting a configuration value
fn handle_remove(key: ConfigKey) -> Result<()> {
    let mut config = Config::load()?;
    let defaults = Config::default();
    match key {
        ConfigKey::GitBinary => {
            config.git_binary = defaults.git_binary;
            println!("Git binary reset to default: {}", config.git_binary);
        }
        ConfigKey::TestLatency => {
            config.test_latency_ms = defaults.test_latency_ms;
            println!("Test latency reset to default: {} ms", config.test_latency_ms);
        }
    }
    config.save()
}

/// Export the stored profile. The token itself is never written.
async fn handle_export(path: &Path) -> Result<()> {
    let controller = loaded_controller().await?;
    controller.export_profile(path)?;
    println!("✓ Profile exported to {}", path.display());
    Ok(())
}

/// Import username and email and store them
async fn handle_import(path: &Path) -> Result<()> {
    let mut controller = loaded_controller().await?;
    controller.import_profile(path)?;

    let credentials = &controller.state().credentials;
    println!("✓ Profile imported from {}", path.display());
    println!("  Username: {}", credentials.username);
    println!("  Email:    {}", credentials.email);
    Ok(())
}
