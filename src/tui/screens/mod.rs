//! TUI screen state
//!
//! Screens own their input handling; rendering lives in `ui`.

pub mod add_product;
pub mod category_editor;
pub mod listing;
