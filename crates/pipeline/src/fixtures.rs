//! Shared test fixtures.

use core::str::FromStr;
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::json;

use preset_export_catalog::{Preset, Product};
use preset_export_core::{PresetId, ProductId};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn preset(id: u64, parent: Option<u64>, payload: &str) -> Preset {
    Preset {
        id: PresetId::new(id).unwrap(),
        title: format!("Preset {id}"),
        slug: format!("preset-{id}"),
        status: "preset".into(),
        parent_id: parent.and_then(ProductId::new),
        author_id: 1,
        author_name: "Admin".into(),
        created_at: at(1),
        modified_at: at(2),
        permalink: format!("https://shop.test/?p={id}"),
        content: payload.into(),
        thumbnail_url: None,
        meta: BTreeMap::new(),
    }
}

pub fn product(id: u64, name: &str) -> Product {
    Product::new(ProductId::new(id).unwrap(), name)
}

/// Payload with one chosen choice per `(layer, choice, extra price)`.
pub fn payload(choices: &[(&str, &str, Option<&str>)]) -> String {
    let records: Vec<_> = choices
        .iter()
        .enumerate()
        .map(|(idx, (layer, choice, extra))| {
            json!({
                "layer_id": idx + 1,
                "choice_id": idx + 10,
                "is_choice": true,
                "layer_name": layer,
                "name": choice,
                "extra_price": extra.unwrap_or(""),
            })
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}

/// Payload with a size and a colour choice.
pub fn size_colour(size: &str, colour: &str) -> String {
    payload(&[("Size", size, None), ("Colour", colour, None)])
}
