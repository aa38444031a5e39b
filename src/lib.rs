//! marketdesk - A TUI admin dashboard for an e-commerce marketplace
//!
//! This library provides both CLI and TUI interfaces for browsing and
//! managing marketplace records (users, products, orders, categories and
//! promotion plans), plus the product-creation flow against the
//! marketplace backend API.

pub mod api;
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod records;
pub mod tui;

pub use error::{DeskError, Result};
