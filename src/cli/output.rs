//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{Error, ErrorKind};
use owo_colors::OwoColorize;

/// Map domain errors to a string for CLI output, with a hint where one helps.
pub fn map_error(e: &Error) -> String {
    let hint = match e.kind() {
        ErrorKind::NotConfigured => Some("run `registry-admin config fetch` first"),
        ErrorKind::UnknownConfigKey => Some("set strict_config = false to allow extra keys"),
        _ => None,
    };
    match hint {
        Some(hint) => format!("{} {}\n  hint: {}", "error:".red().bold(), e, hint),
        None => format!("{} {}", "error:".red().bold(), e),
    }
}
