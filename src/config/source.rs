//! Config source normalization: bare host, host:port, or full URL.

use crate::error::{Error, Result};
use url::{ParseError, Url};

/// Compiled-in catalog used when no source is given.
pub const DEFAULT_CONFIG_SOURCE: &str = "https://catalog.example.com";

/// Normalize and validate a config source.
///
/// A source without `://` is treated as `https://<source>`.
pub fn normalize_source(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.trim_end_matches('/').is_empty() {
        return Err(Error::invalid_source(raw, "Config source cannot be empty"));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| match e {
        ParseError::InvalidPort => {
            Error::invalid_source(raw, "Port must be a number in the range 0-65535")
        }
        ParseError::EmptyHost => Error::invalid_source(raw, "URL must include a host"),
        other => Error::invalid_source(raw, format!("Not a valid URL: {}", other)),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_source(
            raw,
            format!("URL scheme must be http or https, got '{}'", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::invalid_source(raw, "URL must include a host"));
    }

    Ok(url)
}

/// Source rendered without a trailing slash.
pub fn source_string(url: &Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

/// `{source}/config.json`
pub fn config_json_url(url: &Url) -> String {
    format!("{}/config.json", source_string(url))
}
