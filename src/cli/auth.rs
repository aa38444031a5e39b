//! Authentication CLI command handlers

use std::io::{self, Write};

use secrecy::SecretString;

use crate::api::client::ping;
use crate::api::ApiClient;
use crate::cli::commands::AuthCommand;
use crate::core::credentials::{CredentialStore, TokenKind};
use crate::core::{Config, SessionContext};
use crate::error::{DeskError, Result};

/// Handle authentication commands
pub async fn handle_auth(command: AuthCommand, config: &Config) -> Result<()> {
    match command {
        AuthCommand::Login {
            token,
            refresh_token,
            email,
        } => handle_login(token, refresh_token, email, config).await,
        AuthCommand::Logout => handle_logout(),
        AuthCommand::Status { check } => handle_status(check, config).await,
    }
}

/// Store tokens and mark the session as logged in
async fn handle_login(
    token: Option<String>,
    refresh_token: Option<String>,
    email: Option<String>,
    config: &Config,
) -> Result<()> {
    let token = match token {
        Some(token) => token.trim().to_string(),
        None => {
            println!("Marketplace backend authentication");
            println!("==================================");
            println!();
            println!("Sign in to the marketplace web app and copy your access token.");
            println!();
            print!("Paste your token here: ");
            io::stdout().flush()?;

            let mut token = String::new();
            io::stdin().read_line(&mut token)?;
            token.trim().to_string()
        }
    };

    if token.is_empty() {
        return Err(DeskError::InvalidInput("No token provided".to_string()));
    }

    // Validate before storing
    println!();
    println!("Validating token...");
    let client = ApiClient::new(
        &config.api_base_url,
        SecretString::from(token.clone()),
        refresh_token.clone().map(SecretString::from),
    )?;
    ping(&client).await?;

    CredentialStore::store(TokenKind::Access, &token)?;
    if let Some(refresh) = &refresh_token {
        CredentialStore::store(TokenKind::Refresh, refresh.trim())?;
    }

    let mut session = SessionContext::load()?;
    session.login(email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()));
    session.save()?;

    println!();
    println!("✓ Successfully logged in to {}", config.api_base_url);
    if session.email().is_none() {
        println!("  Add --email <address> to enable paid promotions.");
    }
    Ok(())
}

/// Handle the logout command
fn handle_logout() -> Result<()> {
    let mut session = SessionContext::load()?;
    if session.access_token().is_none() && !session.state().logged_in {
        println!("Not currently authenticated.");
        return Ok(());
    }

    CredentialStore::delete(TokenKind::Access)?;
    CredentialStore::delete(TokenKind::Refresh)?;
    session.logout();
    session.save()?;
    println!("Successfully logged out.");
    Ok(())
}

/// Handle the status command
async fn handle_status(check: bool, config: &Config) -> Result<()> {
    let session = SessionContext::load()?;

    println!("Authentication Status:");
    println!("  Backend: {}", config.api_base_url);
    println!(
        "  Session: {}",
        if session.is_logged_in() {
            "Logged in"
        } else {
            "Not logged in"
        }
    );

    if let Some(token) = session.access_token() {
        println!("\n  Access token: {}", CredentialStore::mask_token(token));
    }
    if let Some(token) = session.refresh_token() {
        println!("  Refresh token: {}", CredentialStore::mask_token(token));
    }
    if let Some(email) = session.email() {
        println!("  Email: {}", email);
    }
    if let Some(id) = session.pending_product() {
        println!("  Awaiting payment: {}", id);
    }

    if check {
        let client = ApiClient::from_session(&config.api_base_url, &session)?;
        println!();
        match ping(&client).await {
            Ok(()) => println!("✓ Backend accepted the token."),
            Err(e) => println!("✗ {}", e),
        }
    }

    Ok(())
}
