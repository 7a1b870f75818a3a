//! Error types for the registry configuration resolver and admin client.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Discriminant of an [`Error`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfigSource,
    ConfigFetch,
    AdminRequest,
    AdminResponse,
    Storage,
    UnknownConfigKey,
    InvalidConfigValue,
    NotConfigured,
    Settings,
}

/// Every failure surfaced by the resolver, the admin client and the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// Config source failed URL or port validation. Raised before any request.
    #[error("Invalid config source '{source_url}': {reason}")]
    InvalidConfigSource { source_url: String, reason: String },

    #[error("Failed to fetch config: {0}")]
    ConfigFetch(String),

    /// Non-2xx status (or no response at all) from an admin endpoint.
    #[error("Admin request failed: {message}")]
    AdminRequest { status: Option<u16>, message: String },

    /// 2xx status whose body does not have the expected shape.
    #[error("Unexpected admin response: {0}")]
    AdminResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown config key: {0}")]
    UnknownConfigKey(String),

    #[error("Invalid value for config key '{key}': {reason}")]
    InvalidConfigValue { key: String, reason: String },

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidConfigSource { .. } => ErrorKind::InvalidConfigSource,
            Error::ConfigFetch(_) => ErrorKind::ConfigFetch,
            Error::AdminRequest { .. } => ErrorKind::AdminRequest,
            Error::AdminResponse(_) => ErrorKind::AdminResponse,
            Error::Storage(_) => ErrorKind::Storage,
            Error::UnknownConfigKey(_) => ErrorKind::UnknownConfigKey,
            Error::InvalidConfigValue { .. } => ErrorKind::InvalidConfigValue,
            Error::NotConfigured(_) => ErrorKind::NotConfigured,
            Error::Settings(_) => ErrorKind::Settings,
        }
    }

    /// HTTP status attached to an admin request failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::AdminRequest { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn invalid_source(source_url: &str, reason: impl Into<String>) -> Self {
        Error::InvalidConfigSource {
            source_url: source_url.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Settings(err.to_string())
    }
}
