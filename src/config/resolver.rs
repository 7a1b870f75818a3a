//! Config resolver: fetch, reconcile, persist.

use super::document::{keys, leading_comments, validate_value, ConfigDocument};
use super::merge::{reconcile, MergePolicy};
use super::source::{config_json_url, normalize_source, source_string, DEFAULT_CONFIG_SOURCE};
use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::store::ConfigStore;
use crate::transport::{status_description, Method, Transport, TransportRequest};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

/// Where the reconciled document lives and what it starts from.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub config_path: PathBuf,
    pub default_source: String,
    pub template: ConfigDocument,
    pub policy: MergePolicy,
}

impl ResolverConfig {
    pub fn new(config_path: impl Into<PathBuf>, template: ConfigDocument) -> Self {
        Self {
            config_path: config_path.into(),
            default_source: DEFAULT_CONFIG_SOURCE.to_string(),
            template,
            policy: MergePolicy::Permissive,
        }
    }

    pub fn with_default_source(mut self, source: impl Into<String>) -> Self {
        self.default_source = source.into();
        self
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let template = ConfigDocument::default_template(&settings.resolved_package_dir()?)?;
        Ok(Self::new(settings.resolved_config_path()?, template)
            .with_default_source(settings.default_config_source.clone())
            .with_policy(settings.merge_policy()))
    }
}

/// Reconciles the remote configuration with the local template and persists it.
pub struct ConfigResolver<T, S> {
    transport: T,
    store: S,
    config: ResolverConfig,
}

impl<T: Transport, S: ConfigStore> ConfigResolver<T, S> {
    pub fn new(transport: T, store: S, config: ResolverConfig) -> Self {
        Self {
            transport,
            store,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Fetch `{source}/config.json`, merge it over the template and persist the result.
    ///
    /// `None` uses the configured default source. Nothing is written unless every
    /// step before the write succeeds.
    pub fn configure(&self, source: Option<&str>) -> Result<ConfigDocument> {
        let raw_source = source.unwrap_or(self.config.default_source.as_str());
        let source_url = normalize_source(raw_source)?;

        let remote = self.fetch(&source_url)?;
        let mut merged = reconcile(&self.config.template, &remote, self.config.policy)?;

        if merged.navigator_url().is_none() {
            merged.insert(keys::NAVIGATOR_URL, Value::String(source_string(&source_url)));
        }

        self.persist(&merged)?;
        info!(
            source = %source_string(&source_url),
            path = %self.config.config_path.display(),
            keys = merged.len(),
            "Configuration updated"
        );
        Ok(merged)
    }

    /// Persisted document overlaid on the template; the template alone if nothing is persisted.
    pub fn load(&self) -> Result<ConfigDocument> {
        match self.store.read(&self.config.config_path)? {
            None => Ok(self.config.template.clone()),
            Some(bytes) => {
                let text = String::from_utf8(bytes).map_err(|e| {
                    Error::Storage(format!(
                        "{} is not valid UTF-8: {}",
                        self.config.config_path.display(),
                        e
                    ))
                })?;
                let persisted = ConfigDocument::from_yaml(&text)?;
                reconcile(&self.config.template, &persisted, MergePolicy::Permissive)
            }
        }
    }

    /// Apply local `key = value` edits and persist once.
    ///
    /// The file's leading comment block survives the rewrite; comments placed
    /// between keys are dropped.
    pub fn set<I, K>(&self, values: I) -> Result<ConfigDocument>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let edits: ConfigDocument = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        for (key, value) in edits.iter() {
            validate_value(key, value)?;
        }

        let current = self.load()?;
        if edits.is_empty() {
            return Ok(current);
        }

        if self.config.policy == MergePolicy::Strict {
            let unknown = edits.extra_keys(&self.config.template);
            if !unknown.is_empty() {
                return Err(Error::UnknownConfigKey(unknown.join(", ")));
            }
        }

        let updated = reconcile(&current, &edits, MergePolicy::Permissive)?;
        self.persist(&updated)?;
        info!(
            keys = %edits.keys().collect::<Vec<_>>().join(","),
            "Configuration values set"
        );
        Ok(updated)
    }

    /// Persist the template as-is.
    pub fn reset(&self) -> Result<ConfigDocument> {
        let template = self.config.template.clone();
        self.persist(&template)?;
        info!(path = %self.config.config_path.display(), "Configuration reset to defaults");
        Ok(template)
    }

    fn fetch(&self, source: &Url) -> Result<ConfigDocument> {
        let url = config_json_url(source);
        let response = self
            .transport
            .send(TransportRequest::new(Method::Get, url.clone()))
            .map_err(|e| {
                warn!(url = %url, error = %e, "Config fetch failed");
                Error::ConfigFetch(format!("Request to {} failed: {}", url, e))
            })?;

        if !response.is_success() {
            let mut message = format!(
                "An HTTP error ({}) occurred fetching {}",
                status_description(response.status),
                url
            );
            if let Some(body) = response.body_text() {
                message.push_str(": ");
                message.push_str(&body);
            }
            warn!(url = %url, status = response.status, "Config fetch rejected");
            return Err(Error::ConfigFetch(message));
        }

        response
            .json_body
            .clone()
            .and_then(ConfigDocument::from_json)
            .ok_or_else(|| {
                let body = response.body_text().unwrap_or_else(|| "<empty>".to_string());
                Error::ConfigFetch(format!(
                    "Response from {} is not a JSON object: {}",
                    url, body
                ))
            })
    }

    /// Rewrite the file. A leading comment block in the existing file is kept;
    /// comments between keys are not.
    fn persist(&self, document: &ConfigDocument) -> Result<()> {
        let header = self
            .store
            .read(&self.config.config_path)?
            .and_then(|bytes| leading_comments(&String::from_utf8_lossy(&bytes)));
        let text = match header {
            Some(header) => document.to_yaml_with_header(&header)?,
            None => document.to_yaml()?,
        };
        self.store.write(&self.config.config_path, text.as_bytes())
    }
}
