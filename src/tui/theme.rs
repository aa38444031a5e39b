//! TUI theme and styles

use ratatui::style::{Color, Modifier, Style};

use crate::models::ListingStatus;

/// Application color theme
pub struct Theme;

impl Theme {
    /// Primary accent color
    pub const PRIMARY: Color = Color::Cyan;

    /// Secondary accent color
    pub const SECONDARY: Color = Color::Yellow;

    /// Success color
    pub const SUCCESS: Color = Color::Green;

    /// Error color
    pub const ERROR: Color = Color::Red;

    /// Warning color
    pub const WARNING: Color = Color::Yellow;

    /// Muted text color
    pub const MUTED: Color = Color::DarkGray;

    /// Header style
    pub fn header() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().bg(Color::DarkGray)
    }

    /// Selected item style
    pub fn selected() -> Style {
        Style::default().bg(Self::PRIMARY).fg(Color::Black)
    }

    /// Normal text style
    pub fn normal() -> Style {
        Style::default()
    }

    /// Muted text style
    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED)
    }

    /// Focused form field or filter control
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Trend arrow color
    pub fn trend(increasing: bool) -> Style {
        Style::default().fg(if increasing { Self::SUCCESS } else { Self::ERROR })
    }

    pub fn listing_status(status: ListingStatus) -> Style {
        let color = match status {
            ListingStatus::Uploaded => Self::SUCCESS,
            ListingStatus::Drafted => Self::WARNING,
            ListingStatus::Return => Self::ERROR,
        };
        Style::default().fg(color)
    }
}
