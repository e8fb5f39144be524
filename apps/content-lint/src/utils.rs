//! Supporting helpers: colorized stderr prefixes and color gating.

use owo_colors::OwoColorize;

/// Whether colored output should be used for the given output mode.
pub fn use_colors(json: bool) -> bool {
    !json && std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}
