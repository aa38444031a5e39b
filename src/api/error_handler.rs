//! Backend error classification
//!
//! Turns non-success HTTP responses into actionable `DeskError`s, preferring
//! the server-provided `message` and falling back to readable text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::DeskError;

/// Strips tags from HTML error pages served by the hosting proxy
static HTML_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex pattern for HTML tags"));

static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern for whitespace"));

/// Longest plain-text body shown to the user
const MAX_BODY_CHARS: usize = 200;

/// Classify a failed response into a `DeskError`
///
/// `fallback` is shown when the body carries nothing useful, e.g.
/// "Failed to add product".
pub fn classify_response(status: u16, body: &str, fallback: &str) -> DeskError {
    let message = extract_message(body);

    match status {
        401 => DeskError::SessionExpired(
            message.unwrap_or_else(|| "access token is invalid or expired".to_string()),
        ),
        404 => DeskError::Api {
            status,
            message: message.unwrap_or_else(|| "The requested resource was not found.".to_string()),
        },
        _ => DeskError::Api {
            status,
            message: message.unwrap_or_else(|| fallback.to_string()),
        },
    }
}

/// The backend's `message` field, or readable text from a non-JSON body
pub fn extract_message(body: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        return json
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
    }

    let text = HTML_TAG_PATTERN.replace_all(body, " ");
    let text = WHITESPACE_PATTERN.replace_all(&text, " ");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_BODY_CHARS).collect())
}

/// Whether an error means the operator must log in again
pub fn needs_login(err: &DeskError) -> bool {
    matches!(err, DeskError::NotAuthenticated | DeskError::SessionExpired(_))
}
