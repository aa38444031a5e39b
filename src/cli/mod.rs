//! CLI module for marketdesk
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod auth;
pub mod commands;
pub mod config;
pub mod listing;
pub mod payment;
pub mod products;
pub mod render;

pub use commands::{Cli, Commands};
