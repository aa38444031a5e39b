//! Session context shared by screens and flows
//!
//! Replaces ambient browser storage with an explicit object:
//! - Access and refresh tokens, read from the credential store
//! - The pending (unpaid) product id awaiting payment reconciliation
//! - The logged-in flag and the operator's email, used for payments
//!
//! Tokens never touch the state file; only the non-secret fields are
//! persisted to `session.toml` in the config directory.

use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::Config;
use super::credentials::{CredentialStore, TokenKind};
use crate::error::Result;

/// Persisted, non-secret session fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_product_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    state: SessionState,
    path: Option<PathBuf>,
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
}

impl SessionContext {
    /// Load the state file and tokens for the current user
    pub fn load() -> Result<Self> {
        let path = Config::config_dir()?.join("session.toml");
        let mut session = Self::load_from(&path)?;
        session.access_token = read_token(TokenKind::Access);
        session.refresh_token = read_token(TokenKind::Refresh);
        Ok(session)
    }

    /// Load only the state file at `path`; tokens start empty
    pub fn load_from(path: &Path) -> Result<Self> {
        let state = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            SessionState::default()
        };
        debug!("Session state loaded from {}", path.display());
        Ok(Self {
            state,
            path: Some(path.to_path_buf()),
            access_token: None,
            refresh_token: None,
        })
    }

    /// Session that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_tokens(
        mut self,
        access_token: Option<SecretString>,
        refresh_token: Option<SecretString>,
    ) -> Self {
        self.access_token = access_token;
        self.refresh_token = refresh_token;
        self
    }

    /// Persist the non-secret state
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(&self.state)?)?;
        debug!("Session state saved to {}", path.display());
        Ok(())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token.as_ref()
    }

    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.logged_in && self.access_token.is_some()
    }

    pub fn email(&self) -> Option<&str> {
        self.state.email.as_deref()
    }

    pub fn login(&mut self, email: Option<String>) {
        self.state.logged_in = true;
        if email.is_some() {
            self.state.email = email;
        }
    }

    pub fn logout(&mut self) {
        self.state = SessionState::default();
        self.access_token = None;
        self.refresh_token = None;
    }

    pub fn pending_product(&self) -> Option<&str> {
        self.state.pending_product_id.as_deref()
    }

    pub fn set_pending_product(&mut self, id: impl Into<String>) {
        self.state.pending_product_id = Some(id.into());
    }

    /// Clear and return the pending product id
    pub fn take_pending_product(&mut self) -> Option<String> {
        self.state.pending_product_id.take()
    }
}

/// A keyring failure leaves the session logged out instead of aborting
fn read_token(kind: TokenKind) -> Option<SecretString> {
    CredentialStore::get(kind).unwrap_or_else(|e| {
        warn!("Cannot read {}: {}", kind.key(), e);
        None
    })
}
