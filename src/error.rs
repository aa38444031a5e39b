//! Custom error types for marketdesk
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

/// Main error type for the marketdesk application
#[derive(Error, Debug)]
pub enum DeskError {
    /// No bearer token available
    #[error("You are not logged in to the marketplace backend.\n\n  → Run 'marketdesk auth login' and paste an access token.")]
    NotAuthenticated,

    /// Backend rejected the token
    #[error("The marketplace backend rejected your session: {0}\n\n  → Run 'marketdesk auth logout' then 'marketdesk auth login'.")]
    SessionExpired(String),

    /// Backend returned a non-success status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or a generic fallback
        message: String,
    },

    /// Requested record does not exist in the current view
    #[error("No {kind} with id '{id}'.")]
    RecordNotFound { kind: &'static str, id: String },

    /// Form input failed validation before any request was sent
    #[error("{0}")]
    Validation(String),

    /// A submission is already running
    #[error("A submission is already in progress.")]
    Busy,

    /// Payment return could not be confirmed
    #[error("Payment could not be confirmed: {0}\n\n  → The product stays a draft until payment is verified.")]
    PaymentUnconfirmed(String),

    /// Credential storage error
    #[error("Cannot access secure storage: {0}\n\n  → On macOS: Make sure Keychain Access is available.\n  → On Linux: Ensure a secret service (like gnome-keyring) is running.")]
    Credential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sample data could not be read
    #[error("Cannot load {dataset} data: {reason}")]
    Data { dataset: &'static str, reason: String },

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Network request error
    #[error("Network request failed: {0}\n\n  → Check your internet connection.")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Terminal/TUI error
    #[error("Terminal error: {0}\n\n  → Try resizing your terminal or restarting it.")]
    Terminal(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),

    /// Operation cancelled by user
    #[error("Operation cancelled.")]
    Cancelled,
}

impl From<keyring::Error> for DeskError {
    fn from(err: keyring::Error) -> Self {
        DeskError::Credential(err.to_string())
    }
}

impl From<toml::de::Error> for DeskError {
    fn from(err: toml::de::Error) -> Self {
        DeskError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for DeskError {
    fn from(err: toml::ser::Error) -> Self {
        DeskError::Toml(err.to_string())
    }
}

/// Result type alias using DeskError
pub type Result<T> = std::result::Result<T, DeskError>;
