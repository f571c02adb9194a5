//! Raw diagnostic rows: one per preset, nothing grouped or deduplicated.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use preset_export_catalog::Preset;

use crate::classify::ClassifiedOption;
use crate::pricing::PriceBreakdown;
use crate::row::Row;
use crate::settings::ExportSettings;
use crate::variant::PresetDetails;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// The payload re-encoded compactly when it is a JSON container, else verbatim.
fn configuration_json(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => to_json(&value),
        _ => raw.to_string(),
    }
}

fn option_cells(row: &mut Row, slot: u8, option: Option<&ClassifiedOption>) {
    let (label, value, slug) = option
        .map(|o| (o.label.as_str(), o.value.as_str(), o.slug.as_str()))
        .unwrap_or(("", "", ""));
    row.set(format!("Option{slot} Label"), label);
    row.set(format!("Option{slot} Value"), value);
    row.set(format!("Option{slot} Slug"), slug);
}

/// Format one preset for the raw export.
pub fn format_raw_row(preset: &Preset, details: &PresetDetails, settings: &ExportSettings) -> Row {
    let format = &settings.price_format;
    let price = |pick: fn(&PriceBreakdown) -> Decimal| {
        details.pricing.as_ref().map(|p| format.format(pick(p))).unwrap_or_default()
    };
    let mut row = Row::new();

    row.set("Preset ID", preset.id.to_string());
    row.set("Preset Title", preset.title.as_str());
    row.set("Preset Slug", preset.slug.as_str());
    row.set("Preset Status", preset.status.as_str());
    row.set("Preset Author ID", preset.author_id.to_string());
    row.set("Preset Author Name", preset.author_name.as_str());
    row.set("Preset Date", preset.created_at.format(DATE_FORMAT).to_string());
    row.set("Preset Modified", preset.modified_at.format(DATE_FORMAT).to_string());
    row.set("Preset Permalink", preset.permalink.as_str());

    row.set("Product Price", price(|p| p.base_price));
    row.set("Product Regular Price", format.zero());
    if let Some(product) = &details.product {
        row.set("Product ID", product.id.to_string());
        row.set("Product Title", product.name.as_str());
        row.set("Product Slug", product.slug.as_str());
        row.set("Product Status", product.status.as_str());
        row.set("Product Type", product.product_type.as_str());
        row.set("Product SKU", product.sku.as_str());
        row.set("Product Regular Price", format.format(product.regular_price_or_zero()));
        row.set(
            "Product Categories",
            product.categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join("|"),
        );
        row.set(
            "Product Tags",
            product.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join("|"),
        );
        row.set("Product Permalink", product.permalink.as_str());
        if let Some(image) = &product.image {
            row.set("Product Featured Image", image.url.as_str());
        }
    }

    row.set("Variant Price", price(|p| p.price));
    row.set("Variant Price (Raw)", price(|p| p.price));
    row.set("Base Price Component", price(|p| p.base_component));
    row.set("Extra Price Total", price(|p| p.extra_total));
    row.set("Extra Price Raw", price(|p| p.extra_price));
    row.set(
        "Extra Price Overrides Product Price",
        flag(settings.extra_price_overrides_product_price),
    );
    row.set("Variant Requires Shipping", flag(details.requires_shipping));
    row.set("Variant Taxable", flag(details.taxable));
    row.set(
        "Variant Weight Grams",
        details.grams.map(|grams| grams.to_string()).unwrap_or_default(),
    );
    row.set("Variant Weight Unit", details.weight_unit.as_str());
    row.set("Variant SKU", details.sku.as_str());
    row.set("Variant Key", details.variant_key.as_str());

    option_cells(&mut row, 1, details.classified.size.as_ref());
    option_cells(&mut row, 2, details.classified.colour.as_ref());

    row.set("Other Options JSON", to_json(&details.classified.other));
    row.set("Option Entries JSON", to_json(&details.options));
    row.set("Configuration JSON", configuration_json(&preset.content));
    row.set("Preset Meta JSON", to_json(&preset.meta));
    row.set("Variant Image", details.image.as_str());

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use preset_export_catalog::{CategoryTerm, InMemoryCatalog, PayloadConfigurationResolver, Term};
    use serde_json::json;

    use crate::classify::VariantLayerOverrides;
    use crate::context::{ExportContext, ExportRun};
    use crate::fixtures::{dec, payload, preset, product};
    use crate::variant::build_preset_details;

    fn run(catalog: InMemoryCatalog) -> ExportRun {
        ExportRun::new(
            ExportContext::new(Arc::new(catalog), Arc::new(PayloadConfigurationResolver)),
            VariantLayerOverrides::default(),
        )
    }

    #[test]
    fn formats_a_preset_with_product() {
        let mut bench = product(100, "Workbench");
        bench.sku = "WB".into();
        bench.price = Some(dec("100"));
        bench.categories = vec![
            CategoryTerm { name: "Benches".into(), slug: "benches".into(), ancestors: vec![] },
            CategoryTerm { name: "Steel".into(), slug: "steel".into(), ancestors: vec![] },
        ];
        bench.tags = vec![Term { name: "Heavy".into(), slug: "heavy".into() }];
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(bench);
        let mut run = run(catalog);

        let mut preset = preset(
            5,
            Some(100),
            &payload(&[("Size", "Large", Some("10")), ("Colour", "Red", None), ("Worktop", "Oak", Some("5"))]),
        );
        preset.meta.insert("_barcode".into(), json!("123"));
        let details = build_preset_details(&mut run, &preset);
        let row = format_raw_row(&preset, &details, &ExportSettings::default());

        assert_eq!(row.get("Preset ID"), "5");
        assert_eq!(row.get("Preset Date"), "2024-03-01 09:30:00");
        assert_eq!(row.get("Product Categories"), "Benches|Steel");
        assert_eq!(row.get("Product Tags"), "Heavy");
        assert_eq!(row.get("Variant Price"), "115.00");
        assert_eq!(row.get("Variant Price (Raw)"), "115.00");
        assert_eq!(row.get("Extra Price Total"), "15.00");
        assert_eq!(row.get("Extra Price Overrides Product Price"), "false");
        assert_eq!(row.get("Variant Key"), "large|red");
        assert_eq!(row.get("Option1 Label"), "Size");
        assert_eq!(row.get("Option2 Slug"), "red");
        assert_eq!(row.get("Variant SKU"), "WB-5");
        assert_eq!(
            row.get("Other Options JSON"),
            r#"[{"name":"Worktop","value":"Oak","order":3}]"#
        );
        assert_eq!(row.get("Preset Meta JSON"), r#"{"_barcode":"123"}"#);
        assert!(row.get("Configuration JSON").starts_with(r#"[{"#));
    }

    #[test]
    fn degrades_without_product_or_valid_payload() {
        let mut run = run(InMemoryCatalog::new());
        let preset = preset(9, None, "not json");
        let details = build_preset_details(&mut run, &preset);
        let row = format_raw_row(&preset, &details, &ExportSettings::default());

        assert_eq!(row.get("Product ID"), "");
        assert_eq!(row.get("Product Price"), "0.00");
        assert_eq!(row.get("Product Regular Price"), "0.00");
        assert_eq!(row.get("Variant SKU"), "preset-9");
        assert_eq!(row.get("Variant Requires Shipping"), "false");
        assert_eq!(row.get("Option1 Value"), "");
        assert_eq!(row.get("Option Entries JSON"), "[]");
        assert_eq!(row.get("Configuration JSON"), "not json");
    }

    #[test]
    fn unpriced_preset_keeps_its_row_with_blank_prices() {
        let mut bench = product(100, "Workbench");
        bench.price = Some(Decimal::MAX);
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(bench);
        let mut run = run(catalog);

        let preset = preset(5, Some(100), &payload(&[("Size", "Large", Some("10"))]));
        let details = build_preset_details(&mut run, &preset);
        let row = format_raw_row(&preset, &details, run.settings());

        assert_eq!(row.get("Preset ID"), "5");
        assert_eq!(row.get("Product ID"), "100");
        assert_eq!(row.get("Variant Price"), "");
        assert_eq!(row.get("Product Price"), "");
    }
}
