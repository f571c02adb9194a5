use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use preset_export_core::{PresetId, ProductId};

/// Status the host store gives saved presets.
pub const PRESET_STATUS: &str = "preset";

/// Meta key holding a preset-specific barcode.
pub const BARCODE_META_KEY: &str = "_barcode";

fn default_status() -> String {
    PRESET_STATUS.to_string()
}

/// A saved set of choices for a configurable parent product.
///
/// Read-only to the export; created and edited by the host store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: PresetId,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub parent_id: Option<ProductId>,
    #[serde(default)]
    pub author_id: u64,
    #[serde(default)]
    pub author_name: String,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
    #[serde(default)]
    pub permalink: String,
    /// Raw configuration payload: a JSON list of layer-choice records.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
}

impl Preset {
    /// String value of a meta key, if present and non-empty.
    pub fn meta_str(&self, key: &str) -> Option<String> {
        match self.meta.get(key)? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Thumbnail URL, ignoring blank values.
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}
