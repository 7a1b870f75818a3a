//! Client Settings
//!
//! Settings for the client itself (as opposed to the reconciled registry
//! configuration document). Layered with the `config` crate:
//!
//! 1. Built-in defaults
//! 2. `settings.toml` in the user config directory, or an explicit file
//! 3. Environment variables prefixed with `REGISTRY_ADMIN_` (`__` separates nesting,
//!    e.g. `REGISTRY_ADMIN_HTTP__REQUEST_TIMEOUT_SECS`)

use crate::config::{normalize_source, MergePolicy, DEFAULT_CONFIG_SOURCE};
use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const ENV_PREFIX: &str = "REGISTRY_ADMIN";
const SETTINGS_FILE: &str = "settings.toml";
const CONFIG_FILE: &str = "config.yml";

/// Root settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Registry API base; falls back to `registryUrl` from the reconciled config
    #[serde(default)]
    pub registry_url: Option<String>,

    /// Catalog fetched by `config fetch` when no source is given
    #[serde(default = "default_config_source")]
    pub default_config_source: String,

    /// Persisted configuration file (defaults to `<config dir>/config.yml`)
    #[serde(default)]
    pub config_path: Option<PathBuf>,

    /// Local package directory (defaults to `<data dir>/packages`)
    #[serde(default)]
    pub package_dir: Option<PathBuf>,

    /// Opaque bearer credential sent with every request
    #[serde(default)]
    pub credential: Option<String>,

    /// Reject config keys outside the default template
    #[serde(default)]
    pub strict_config: bool,

    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_config_source() -> String {
    DEFAULT_CONFIG_SOURCE.to_string()
}

/// Transport timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_url: None,
            default_config_source: default_config_source(),
            config_path: None,
            package_dir: None,
            credential: None,
            strict_config: false,
            http: HttpSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Platform directories for registry-admin.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "registry-admin")
}

impl Settings {
    /// Default location of `settings.toml`.
    pub fn default_settings_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Persisted configuration file path.
    pub fn resolved_config_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.config_path {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or_else(|| {
                Error::Settings("Could not determine a config directory; set config_path".into())
            })
    }

    /// Local package directory backing `default_local_registry`.
    pub fn resolved_package_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.package_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join("packages"))
            .ok_or_else(|| {
                Error::Settings("Could not determine a data directory; set package_dir".into())
            })
    }

    pub fn merge_policy(&self) -> MergePolicy {
        if self.strict_config {
            MergePolicy::Strict
        } else {
            MergePolicy::Permissive
        }
    }

    pub fn validate(&self) -> Result<()> {
        normalize_source(&self.default_config_source).map_err(|e| {
            Error::Settings(format!("default_config_source is invalid: {}", e))
        })?;

        // Accepts the same forms as `AdminClient::new`
        if let Some(ref registry_url) = self.registry_url {
            normalize_source(registry_url)
                .map_err(|e| Error::Settings(format!("registry_url is invalid: {}", e)))?;
        }

        if self.http.connect_timeout_secs == 0 || self.http.request_timeout_secs == 0 {
            return Err(Error::Settings(
                "http timeouts must be greater than zero".to_string(),
            ));
        }

        if let Some(ref dir) = self.package_dir {
            if !dir.is_absolute() {
                return Err(Error::Settings(format!(
                    "package_dir must be an absolute path: {}",
                    dir.display()
                )));
            }
        }

        self.logging.validate()
    }

    /// Effective settings as TOML, credential masked.
    pub fn to_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.credential.is_some() {
            shown.credential = Some("********".to_string());
        }
        toml::to_string_pretty(&shown)
            .map_err(|e| Error::Settings(format!("Failed to render settings: {}", e)))
    }
}

/// Settings loader
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load from the default settings file (if present) and the environment.
    pub fn load() -> Result<Settings> {
        let mut builder = builder_with_defaults()?;
        match Settings::default_settings_path() {
            Some(path) if path.exists() => {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            Some(path) => {
                warn!(
                    settings_path = %path.display(),
                    "Settings file not found; using defaults and environment"
                );
            }
            None => {}
        }
        Self::finish(builder)
    }

    /// Load from an explicit file (required) and the environment.
    pub fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Err(Error::Settings(format!(
                "Settings file not found: {}",
                path.display()
            )));
        }
        let builder = builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Settings> {
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Create a Config builder with default settings applied.
fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("default_config_source", DEFAULT_CONFIG_SOURCE)?
        .set_default("strict_config", false)?
        .set_default("http.connect_timeout_secs", default_connect_timeout_secs() as i64)?
        .set_default("http.request_timeout_secs", default_request_timeout_secs() as i64)?)
}
