//! Configuration document: ordered key/value mapping with typed accessors for the
//! well-known keys and pass-through for everything else.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use url::Url;

/// Well-known configuration keys.
pub mod keys {
    pub const NAVIGATOR_URL: &str = "navigator_url";
    pub const REGISTRY_URL: &str = "registryUrl";
    pub const ELASTIC_SEARCH_URL: &str = "elastic_search_url";
    pub const DEFAULT_LOCAL_REGISTRY: &str = "default_local_registry";
    pub const DEFAULT_REMOTE_REGISTRY: &str = "default_remote_registry";
    pub const DEFAULT_INSTALL_LOCATION: &str = "default_install_location";
    pub const TELEMETRY_DISABLED: &str = "telemetry_disabled";

    /// Keys whose values must be http(s) URLs when set.
    pub const HTTP_URL_KEYS: [&str; 3] = [NAVIGATOR_URL, REGISTRY_URL, ELASTIC_SEARCH_URL];

    /// Keys whose values must be absolute URLs of any scheme when set.
    pub const LOCATION_KEYS: [&str; 2] = [DEFAULT_LOCAL_REGISTRY, DEFAULT_REMOTE_REGISTRY];

    /// Keys whose values are filesystem paths when set.
    pub const PATH_KEYS: [&str; 1] = [DEFAULT_INSTALL_LOCATION];
}

const FILE_HEADER: &str = "\
# registry-admin configuration file
#
# navigator_url: catalog this configuration was fetched from
# elastic_search_url: search endpoint backing the catalog
# default_local_registry: file URL of the local package registry
# default_remote_registry: default target for push and browse
# default_install_location: default filesystem target for install
# registryUrl: registry API used by admin commands
# telemetry_disabled: disable anonymous usage metrics
#
# The whole file is rewritten by `registry-admin config fetch|set|reset`.
";

/// Configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    entries: IndexMap<String, Value>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in default template.
    ///
    /// `package_dir` must be absolute; it becomes the `default_local_registry` file URL.
    pub fn default_template(package_dir: &Path) -> Result<Self> {
        let local_registry = Url::from_file_path(package_dir).map_err(|_| {
            Error::Settings(format!(
                "Local package directory must be an absolute path: {}",
                package_dir.display()
            ))
        })?;

        Ok([
            (keys::NAVIGATOR_URL, Value::Null),
            (keys::ELASTIC_SEARCH_URL, Value::Null),
            (
                keys::DEFAULT_LOCAL_REGISTRY,
                Value::String(local_registry.to_string()),
            ),
            (keys::DEFAULT_REMOTE_REGISTRY, Value::Null),
            (keys::DEFAULT_INSTALL_LOCATION, Value::Null),
            (keys::REGISTRY_URL, Value::Null),
            (keys::TELEMETRY_DISABLED, Value::Bool(false)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect())
    }

    /// Build from a JSON value; `None` unless it is an object.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(map.into_iter().collect()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or overwrite. Existing keys keep their position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn str_value(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn navigator_url(&self) -> Option<&str> {
        self.str_value(keys::NAVIGATOR_URL)
    }

    /// Registry API base used by the admin client.
    pub fn registry_url(&self) -> Option<&str> {
        self.str_value(keys::REGISTRY_URL)
    }

    pub fn elastic_search_url(&self) -> Option<&str> {
        self.str_value(keys::ELASTIC_SEARCH_URL)
    }

    pub fn default_local_registry(&self) -> Option<&str> {
        self.str_value(keys::DEFAULT_LOCAL_REGISTRY)
    }

    pub fn default_remote_registry(&self) -> Option<&str> {
        self.str_value(keys::DEFAULT_REMOTE_REGISTRY)
    }

    pub fn default_install_location(&self) -> Option<&str> {
        self.str_value(keys::DEFAULT_INSTALL_LOCATION)
    }

    /// Missing or non-boolean values read as `false`.
    pub fn telemetry_disabled(&self) -> bool {
        self.entries
            .get(keys::TELEMETRY_DISABLED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Keys present here but not in `template`, in document order.
    pub fn extra_keys<'a>(&'a self, template: &ConfigDocument) -> Vec<&'a str> {
        self.keys()
            .filter(|key| !template.contains_key(key))
            .collect()
    }

    /// Render as YAML with the descriptive header.
    pub fn to_yaml(&self) -> Result<String> {
        self.to_yaml_with_header(FILE_HEADER)
    }

    /// Render as YAML under `header`, which must already be a `#` comment block.
    pub fn to_yaml_with_header(&self, header: &str) -> Result<String> {
        let body = serde_yaml::to_string(&self.entries)
            .map_err(|e| Error::Storage(format!("Failed to serialize configuration: {}", e)))?;
        Ok(format!("{}\n{}", header, body))
    }

    /// Parse a persisted YAML document. An empty or comment-only file is an empty document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let blank = text.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(Self::new());
        }
        let raw: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| Error::Storage(format!("Failed to parse configuration: {}", e)))?;
        if raw.is_null() {
            return Ok(Self::new());
        }
        let entries: IndexMap<String, Value> = serde_yaml::from_value(raw).map_err(|e| {
            Error::Storage(format!(
                "Configuration must be a mapping of string keys: {}",
                e
            ))
        })?;
        Ok(Self { entries })
    }
}

impl FromIterator<(String, Value)> for ConfigDocument {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Leading comment block of a persisted file, up to the first mapping line.
///
/// Trailing blank lines are dropped; `None` when the file starts with content.
pub(crate) fn leading_comments(text: &str) -> Option<String> {
    let block: Vec<&str> = text
        .lines()
        .take_while(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        })
        .collect();
    let end = block.iter().rposition(|line| !line.trim().is_empty())?;
    let mut header = block[..=end].join("\n");
    header.push('\n');
    Some(header)
}

/// Check a locally supplied value for a key.
pub fn validate_value(key: &str, value: &Value) -> Result<()> {
    let invalid = |reason: String| Error::InvalidConfigValue {
        key: key.to_string(),
        reason,
    };

    if key == keys::TELEMETRY_DISABLED {
        return match value {
            Value::Bool(_) => Ok(()),
            _ => Err(invalid("must be true or false".to_string())),
        };
    }

    let text = match value {
        Value::Null => return Ok(()),
        Value::Array(_) | Value::Object(_) => {
            return Err(invalid("must be a scalar or null".to_string()))
        }
        Value::String(s) => s.as_str(),
        Value::Bool(_) | Value::Number(_) => {
            if keys::HTTP_URL_KEYS.contains(&key) || keys::LOCATION_KEYS.contains(&key) {
                return Err(invalid("must be a URL string or null".to_string()));
            }
            if keys::PATH_KEYS.contains(&key) {
                return Err(invalid("must be a path string or null".to_string()));
            }
            return Ok(());
        }
    };

    if keys::HTTP_URL_KEYS.contains(&key) {
        let url = Url::parse(text).map_err(|e| invalid(format!("not a valid URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid("must be an http or https URL".to_string()));
        }
    } else if keys::LOCATION_KEYS.contains(&key) {
        Url::parse(text).map_err(|e| invalid(format!("not a valid URL: {}", e)))?;
    } else if keys::PATH_KEYS.contains(&key) && text.trim().is_empty() {
        return Err(invalid("must not be empty; use null to clear".to_string()));
    }

    Ok(())
}
