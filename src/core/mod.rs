//! Core functionality for marketdesk
//!
//! Shared business logic outside the record views:
//! - Application configuration
//! - Credential management
//! - Session context (tokens, pending payment)
//! - Product submission and payment reconciliation

pub mod config;
pub mod credentials;
pub mod session;
pub mod submission;

pub use config::{Config, Section};
pub use credentials::{CredentialStore, TokenKind};
pub use session::SessionContext;
pub use submission::{PaymentReturn, ProductForm, Reconciliation, SubmitOutcome, Submission};
