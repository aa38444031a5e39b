//! Secure token storage using the system keyring
//!
//! Holds the backend access token and the optional refresh token that is
//! forwarded as a cookie. Keyring reads are cached in memory so the
//! keychain is prompted at most once per process.
//!
//! ## Environment Variable Fallback
//!
//! For scripting and CI the tokens can come from the environment:
//! - `MARKETDESK_TOKEN` - access token
//! - `MARKETDESK_REFRESH_TOKEN` - refresh token
//!
//! Priority: env var > cache > keyring

use std::sync::RwLock;

use keyring::Entry;
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::{DeskError, Result};

const SERVICE_NAME: &str = "marketdesk";

// Option<Option<T>>:
//   - None = not yet fetched from keyring
//   - Some(None) = fetched, but no credential exists
//   - Some(Some(value)) = fetched and cached
type Cache = Lazy<RwLock<Option<Option<SecretString>>>>;

static ACCESS_TOKEN_CACHE: Cache = Lazy::new(|| RwLock::new(None));
static REFRESH_TOKEN_CACHE: Cache = Lazy::new(|| RwLock::new(None));

/// The tokens the dashboard keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn key(&self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            TokenKind::Access => "MARKETDESK_TOKEN",
            TokenKind::Refresh => "MARKETDESK_REFRESH_TOKEN",
        }
    }

    fn cache(&self) -> &'static Cache {
        match self {
            TokenKind::Access => &ACCESS_TOKEN_CACHE,
            TokenKind::Refresh => &REFRESH_TOKEN_CACHE,
        }
    }
}

/// Credential store for secure token management
pub struct CredentialStore;

impl CredentialStore {
    /// Store a token in the keyring and the in-memory cache
    pub fn store(kind: TokenKind, token: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, kind.key())?;
        entry.set_password(token)?;

        if let Ok(mut cache) = kind.cache().write() {
            *cache = Some(Some(SecretString::from(token.to_string())));
        }
        debug!("Stored {} in keyring", kind.key());

        Ok(())
    }

    /// Retrieve a token
    ///
    /// Priority: environment variable > cache > keyring
    pub fn get(kind: TokenKind) -> Result<Option<SecretString>> {
        if let Ok(token) = std::env::var(kind.env_var()) {
            if !token.is_empty() {
                return Ok(Some(SecretString::from(token)));
            }
        }

        if let Ok(cache) = kind.cache().read() {
            if let Some(cached_value) = cache.as_ref() {
                return Ok(cached_value.clone());
            }
        }

        let result = Self::fetch_from_keyring(kind)?;

        if let Ok(mut cache) = kind.cache().write() {
            *cache = Some(result.clone());
        }

        Ok(result)
    }

    fn fetch_from_keyring(kind: TokenKind) -> Result<Option<SecretString>> {
        let entry = Entry::new(SERVICE_NAME, kind.key())?;
        match entry.get_password() {
            Ok(password) => Ok(Some(SecretString::from(password))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(DeskError::Credential(format!(
                "Cannot access system keychain. Make sure your keyring is unlocked. ({})",
                e
            ))),
        }
    }

    /// Delete a token from the keyring and the cache
    pub fn delete(kind: TokenKind) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, kind.key())?;
        let result = match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(DeskError::Credential(e.to_string())),
        };

        if let Ok(mut cache) = kind.cache().write() {
            *cache = Some(None);
        }

        result
    }

    /// Get the access token, returning an error if not logged in
    pub fn require_access_token() -> Result<SecretString> {
        Self::get(TokenKind::Access)?.ok_or(DeskError::NotAuthenticated)
    }

    /// Masked token for display (first 4 and last 4 chars)
    pub fn mask_token(token: &SecretString) -> String {
        let exposed = token.expose_secret();
        let chars: Vec<char> = exposed.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        }
    }
}
