//! Configuration CLI command handlers

use crate::cli::commands::{ConfigCommand, ConfigKey};
use crate::core::config::Config;
use crate::error::Result;

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => handle_set(key, value),
        ConfigCommand::Get { key } => handle_get(key),
        ConfigCommand::Remove { key } => handle_remove(key),
        ConfigCommand::Show => handle_show(),
    }
}

/// Handle setting a configuration value
fn handle_set(key: ConfigKey, value: String) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key.as_str(), &value)?;
    config.save()?;

    let stored = config.get(key.as_str())?.unwrap_or_default();
    println!("{} set to: {}", key.as_str(), stored);
    Ok(())
}

/// Handle getting a configuration value
fn handle_get(key: ConfigKey) -> Result<()> {
    let config = Config::load()?;
    match config.get(key.as_str())? {
        Some(value) => println!("{}: {}", key.as_str(), value),
        None => println!("{}: Not configured", key.as_str()),
    }
    Ok(())
}

/// Handle removing a configuration value
fn handle_remove(key: ConfigKey) -> Result<()> {
    let mut config = Config::load()?;
    config.remove(key.as_str())?;
    config.save()?;

    match config.get(key.as_str())? {
        Some(value) => println!("{} reset to default: {}", key.as_str(), value),
        None => println!("{} has been removed.", key.as_str()),
    }
    Ok(())
}

/// Print the config file location and every value
fn handle_show() -> Result<()> {
    let config = Config::load()?;
    println!("Config file: {}", Config::config_path()?.display());
    println!();
    for key in Config::KEYS {
        let value = config
            .get(key)?
            .unwrap_or_else(|| "(not set)".to_string());
        println!("  {:<16} {}", key, value);
    }
    Ok(())
}
