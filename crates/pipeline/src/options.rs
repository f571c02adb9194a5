//! Option extraction from a preset's raw configuration payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Layers whose name starts with this prefix are presentational only.
pub const VISUAL_LAYER_PREFIX: &str = "Visual -";

/// A chosen option: layer label, choice value and an ordering hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionEntry {
    #[serde(rename = "name")]
    pub label: String,
    pub value: String,
    pub order: i64,
}

/// Loose text coercion of a JSON scalar (`null` and containers are empty).
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "1".to_string(),
        _ => String::new(),
    }
}

/// Leading integer of a string (`"12abc"` → 12), zero when there is none.
pub(crate) fn leading_int(raw: &str) -> i64 {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    raw[..end].parse().unwrap_or(0)
}

/// Loose integer coercion: numbers truncate, strings use their leading integer.
fn int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => leading_int(s),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Tri-state boolean: `Some(true)`, `Some(false)` or `None` when unparseable.
pub fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn present<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}

fn is_visual_layer(label: &str) -> bool {
    label
        .get(..VISUAL_LAYER_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(VISUAL_LAYER_PREFIX))
}

fn accept(record: &Map<String, Value>, accepted: usize) -> Option<OptionEntry> {
    match present(record, "choice_id") {
        None => return None,
        Some(Value::String(s)) if s.is_empty() => return None,
        Some(_) => {}
    }

    if present(record, "is_choice").and_then(parse_flag) == Some(false) {
        return None;
    }

    let label = text(present(record, "layer_name"));
    if label.is_empty() || is_visual_layer(&label) {
        return None;
    }

    let mut value = text(present(record, "name"));
    if value.is_empty() {
        value = text(present(record, "choice_name"));
    }

    let order = ["image_order", "order", "layer_id"]
        .iter()
        .find_map(|key| present(record, key))
        .map(int)
        .unwrap_or(accepted as i64);

    Some(OptionEntry { label, value, order })
}

/// Parse a preset payload into its ordered option entries.
///
/// Fails closed: an absent or non-list payload yields no entries. Records
/// without a choice id, explicitly marked as non-choices, with a blank layer
/// name or on a visual layer are skipped. The result is sorted by `order`,
/// ties broken by label.
pub fn extract_options(payload: &str) -> Vec<OptionEntry> {
    if payload.trim().is_empty() {
        return Vec::new();
    }
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(payload) else {
        tracing::debug!("preset payload is not a list; no options extracted");
        return Vec::new();
    };

    let mut entries: Vec<OptionEntry> = Vec::new();
    for record in items.iter().filter_map(Value::as_object) {
        if let Some(entry) = accept(record, entries.len()) {
            entries.push(entry);
        }
    }

    entries.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.label.cmp(&b.label)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(entries: &[OptionEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn extracts_and_orders_entries() {
        let payload = r#"[
            {"choice_id": 2, "layer_name": "Colour", "name": "Red", "order": 2},
            {"choice_id": 1, "layer_name": "Size", "name": "Large", "order": 1},
            {"choice_id": 3, "layer_name": "Worktop", "name": "Oak", "order": 1}
        ]"#;
        let entries = extract_options(payload);
        assert_eq!(labels(&entries), vec!["Size", "Worktop", "Colour"]);
        assert_eq!(entries[0].value, "Large");
        assert_eq!(entries[2].order, 2);
    }

    #[test]
    fn order_hint_precedence() {
        let payload = r#"[
            {"choice_id": 1, "layer_name": "A", "image_order": "7", "order": 1, "layer_id": 2},
            {"choice_id": 1, "layer_name": "B", "order": 3, "layer_id": 2},
            {"choice_id": 1, "layer_name": "C", "layer_id": "5"},
            {"choice_id": 1, "layer_name": "D"}
        ]"#;
        let entries = extract_options(payload);
        let orders: Vec<(&str, i64)> = entries.iter().map(|e| (e.label.as_str(), e.order)).collect();
        // D has no hint and falls back to the number of entries accepted before it.
        assert_eq!(orders, vec![("B", 3), ("D", 3), ("C", 5), ("A", 7)]);
    }

    #[test]
    fn skips_non_choices_blank_and_visual_layers() {
        let payload = r#"[
            {"layer_name": "No choice id", "name": "x"},
            {"choice_id": "", "layer_name": "Empty choice id", "name": "x"},
            {"choice_id": 1, "is_choice": false, "layer_name": "Not a choice", "name": "x"},
            {"choice_id": 1, "is_choice": "no", "layer_name": "Also not", "name": "x"},
            {"choice_id": 1, "is_choice": "maybe", "layer_name": "Unparseable flag", "name": "x"},
            {"choice_id": 1, "layer_name": "   ", "name": "x"},
            {"choice_id": 1, "layer_name": "VISUAL - Shadow", "name": "x"},
            {"choice_id": 0, "is_choice": true, "layer_name": "Kept", "name": "", "choice_name": "Fallback"}
        ]"#;
        let entries = extract_options(payload);
        assert_eq!(labels(&entries), vec!["Unparseable flag", "Kept"]);
        assert_eq!(entries[1].value, "Fallback");
    }

    #[test]
    fn fails_closed_on_bad_payloads() {
        assert!(extract_options("").is_empty());
        assert!(extract_options("{\"choice_id\": 1}").is_empty());
        assert!(extract_options("[{").is_empty());
    }

    #[test]
    fn parse_flag_is_tri_state() {
        assert_eq!(parse_flag(&Value::Bool(false)), Some(false));
        assert_eq!(parse_flag(&Value::from("On")), Some(true));
        assert_eq!(parse_flag(&Value::from(0)), Some(false));
        assert_eq!(parse_flag(&Value::from(2)), None);
        assert_eq!(parse_flag(&Value::from("perhaps")), None);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn record() -> impl Strategy<Value = Value> {
            (
                prop_oneof![Just(Value::Null), Just(Value::from(1)), Just(Value::from(""))],
                prop_oneof![
                    Just(Value::Null),
                    Just(Value::Bool(true)),
                    Just(Value::Bool(false)),
                    Just(Value::from("false")),
                    Just(Value::from("0")),
                ],
                prop_oneof![
                    "[A-Za-z ]{0,12}".prop_map(Value::from),
                    "[vV][iI][sS][uU][aA][lL] - [A-Za-z]{0,6}".prop_map(Value::from),
                    Just(Value::from("  ")),
                ],
                0i64..5,
            )
                .prop_map(|(choice_id, is_choice, layer_name, order)| {
                    serde_json::json!({
                        "choice_id": choice_id,
                        "is_choice": is_choice,
                        "layer_name": layer_name,
                        "name": "value",
                        "order": order,
                    })
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: excluded records never surface as options.
            #[test]
            fn excluded_records_never_surface(records in proptest::collection::vec(record(), 0..12)) {
                let payload = Value::Array(records).to_string();
                for entry in extract_options(&payload) {
                    prop_assert!(!entry.label.trim().is_empty());
                    prop_assert!(!entry.label.to_ascii_lowercase().starts_with("visual -"));
                }
            }

            /// Property: output is sorted by order, then label.
            #[test]
            fn output_is_sorted(records in proptest::collection::vec(record(), 0..12)) {
                let payload = Value::Array(records).to_string();
                let entries = extract_options(&payload);
                for pair in entries.windows(2) {
                    prop_assert!((pair[0].order, &pair[0].label) <= (pair[1].order, &pair[1].label));
                }
            }
        }
    }
}
