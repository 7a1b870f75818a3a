//! Configuration Resolver
//!
//! Fetches a catalog's `config.json`, reconciles it with the built-in default
//! template and persists the merged document as YAML. Later runs read the persisted
//! copy through [`ConfigResolver::load`] until the configuration is fetched again.

mod document;
mod merge;
mod resolver;
mod source;

pub use document::{keys, validate_value, ConfigDocument};
pub use merge::{reconcile, MergePolicy};
pub use resolver::{ConfigResolver, ResolverConfig};
pub use source::{config_json_url, normalize_source, source_string, DEFAULT_CONFIG_SOURCE};
