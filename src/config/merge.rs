//! Merge rules: template first, overlay wins, template keys are never dropped.

use super::document::ConfigDocument;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How keys outside the template are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Unknown keys pass through.
    #[default]
    Permissive,
    /// Unknown keys are rejected.
    Strict,
}

/// Overlay every key of `overlay` onto `template`.
///
/// Template keys keep their position; overlay-only keys follow in overlay order.
pub fn reconcile(
    template: &ConfigDocument,
    overlay: &ConfigDocument,
    policy: MergePolicy,
) -> Result<ConfigDocument> {
    if policy == MergePolicy::Strict {
        let unknown = overlay.extra_keys(template);
        if !unknown.is_empty() {
            return Err(Error::UnknownConfigKey(unknown.join(", ")));
        }
    }

    let mut merged = template.clone();
    for (key, value) in overlay.iter() {
        merged.insert(key.clone(), value.clone());
    }
    Ok(merged)
}
