//! Resolved configuration models (the chosen layer choices of a preset).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use preset_export_core::money::parse_amount;

/// One chosen choice within a configured layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerChoice {
    #[serde(default)]
    pub layer_id: Option<i64>,
    pub choice_id: String,
    #[serde(default)]
    pub layer_name: String,
    #[serde(default)]
    pub choice_name: String,
    /// Raw per-choice extra price; `None` when the field is empty or absent.
    #[serde(default)]
    pub extra_price: Option<Decimal>,
    /// The original record, for hooks that need fields the export ignores.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl LayerChoice {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// The configuration model of a preset: what was chosen, and its rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigurationModel {
    #[serde(default)]
    pub layers: Vec<LayerChoice>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_amount(&n.to_string()),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

impl ConfigurationModel {
    /// Build a model from a raw preset payload.
    ///
    /// Records without a `choice_id` are not choices and are skipped; a payload
    /// that is not a JSON list yields `None`.
    pub fn from_payload(payload: &str) -> Option<Self> {
        if payload.trim().is_empty() {
            return None;
        }
        let decoded: Value = serde_json::from_str(payload).ok()?;
        let items = decoded.as_array()?;

        let layers = items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|record| {
                let choice_id = record.get("choice_id").and_then(value_to_string)?;
                if choice_id.is_empty() {
                    return None;
                }
                let choice_name = record
                    .get("name")
                    .and_then(value_to_string)
                    .filter(|name| !name.is_empty())
                    .or_else(|| record.get("choice_name").and_then(value_to_string))
                    .unwrap_or_default();

                Some(LayerChoice {
                    layer_id: record.get("layer_id").and_then(|v| match v {
                        Value::Number(n) => n.as_i64(),
                        Value::String(s) => s.trim().parse().ok(),
                        _ => None,
                    }),
                    choice_id,
                    layer_name: record
                        .get("layer_name")
                        .and_then(value_to_string)
                        .unwrap_or_default(),
                    choice_name,
                    extra_price: record.get("extra_price").and_then(value_to_amount),
                    fields: record.clone(),
                })
            })
            .collect();

        Some(Self {
            layers,
            image_url: None,
        })
    }
}
