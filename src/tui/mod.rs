//! Terminal User Interface module
//!
//! The ratatui dashboard: a section sidebar, one screen per record kind,
//! the overview and the add-product form.

pub mod app;
pub mod event;
pub mod screens;
pub mod theme;
pub mod ui;

pub use app::App;
