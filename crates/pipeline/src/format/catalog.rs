//! Catalog rows: one per variant, product columns on the first row only.

use crate::format::headers::CONFIGURATION_PRICE_HEADER;
use crate::format::product_fields::{
    primary_image, product_category, product_handle, product_tags, product_type_label, seo_description,
    seo_title, vendor,
};
use crate::group::ProductGroup;
use crate::hooks::ExportHooks;
use crate::row::Row;
use crate::settings::ExportSettings;

pub const DEFAULT_SIZE_LABEL: &str = "Size";
pub const DEFAULT_COLOUR_LABEL: &str = "Colour";
pub const COLOUR_LINK: &str = "product.metafields.shopify.color-pattern";

const FRAME_COLOURS: &str = "Frame colours (product.metafields.custom.frame_colour)";
const COLOR_PATTERN: &str = "Color (product.metafields.shopify.color-pattern)";

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn label_or<'a>(label: &'a str, default: &'a str) -> &'a str {
    if label.is_empty() { default } else { label }
}

/// Format every variant of a product group into catalog rows.
pub fn format_product_rows(group: &ProductGroup, settings: &ExportSettings, hooks: &ExportHooks) -> Vec<Row> {
    let product = &group.product;
    let Some(first) = group.variants.first() else {
        return Vec::new();
    };

    let handle = product_handle(product, hooks);
    let status = if product.is_published() { "active" } else { "draft" };

    let mut colour_slugs: Vec<&str> = Vec::new();
    for variant in &group.variants {
        let slug = variant.colour.slug.as_str();
        if !slug.is_empty() && !colour_slugs.contains(&slug) {
            colour_slugs.push(slug);
        }
    }
    let colour_slugs = colour_slugs.join("; ");

    let mut rows = Vec::with_capacity(group.variants.len());
    for (idx, variant) in group.variants.iter().enumerate() {
        let is_first = idx == 0;
        let mut row = Row::new();
        row.set("Handle", handle.as_str());

        if is_first {
            row.set("Title", product.name.as_str());
            row.set("Body (HTML)", product.description.as_str());
            row.set("Vendor", vendor(product, settings));
            row.set("Product Category", product_category(product, hooks));
            row.set("Type", product_type_label(product));
            row.set("Tags", product_tags(product));
            row.set("Published", flag(product.is_published()));
            row.set("Gift Card", "false");
            row.set("SEO Title", seo_title(product));
            row.set("SEO Description", seo_description(product));
            row.set("Google Shopping / Custom Product", "TRUE");
            row.set("Status", status);
            row.set("Option1 Name", label_or(&first.size.label, DEFAULT_SIZE_LABEL));
            row.set("Option2 Name", label_or(&first.colour.label, DEFAULT_COLOUR_LABEL));
            row.set("Option2 Linked To", COLOUR_LINK);
            row.set("Assembly Required (product.metafields.custom.assembly_required)", "FALSE");
            row.set(FRAME_COLOURS, colour_slugs.as_str());
            row.set(
                "Google: Custom Product (product.metafields.mm-google-shopping.custom_product)",
                "TRUE",
            );
            row.set(COLOR_PATTERN, colour_slugs.as_str());

            if let Some(image) = primary_image(product) {
                row.set("Image Src", image.url);
                row.set("Image Position", "1");
                row.set("Image Alt Text", image.alt);
            }
        }

        row.set("Option1 Value", variant.size.value.as_str());
        row.set("Option2 Value", variant.colour.slug.as_str());
        row.set("Variant SKU", variant.sku.as_str());
        row.set(
            "Variant Grams",
            variant.grams.map(|grams| grams.to_string()).unwrap_or_else(|| "0.0".to_string()),
        );
        row.set("Variant Inventory Qty", "0");
        row.set("Variant Inventory Policy", "deny");
        row.set("Variant Fulfillment Service", "manual");
        row.set("Variant Price", variant.price.as_str());
        row.set("Variant Compare At Price", variant.compare_at_price.as_str());
        row.set("Variant Requires Shipping", flag(variant.requires_shipping));
        row.set("Variant Taxable", flag(variant.taxable));
        row.set("Variant Barcode", variant.barcode.as_str());
        row.set("Variant Image", variant.image.as_str());
        row.set("Variant Weight Unit", variant.weight_unit.as_str());
        row.set("Cost per item", variant.cost.as_str());
        row.set(CONFIGURATION_PRICE_HEADER, variant.extra_total.as_str());

        rows.push(hooks.catalog_row(row, variant, product, is_first));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use preset_export_catalog::{InMemoryCatalog, PayloadConfigurationResolver, ProductImage};
    use preset_export_core::ProductId;

    use crate::classify::VariantLayerOverrides;
    use crate::context::{ExportContext, ExportRun};
    use crate::fixtures::{dec, preset, product, size_colour};
    use crate::group::build_product_group;

    fn group(hooks: ExportHooks) -> (ProductGroup, ExportSettings, ExportHooks) {
        let mut bench = product(100, "Workbench – Size: 1800");
        bench.price = Some(dec("199"));
        bench.image = Some(ProductImage {
            url: "https://cdn.test/bench.png".into(),
            alt: "Bench".into(),
        });
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(bench);

        let mut run = ExportRun::new(
            ExportContext::new(Arc::new(catalog), Arc::new(PayloadConfigurationResolver)),
            VariantLayerOverrides::default(),
        );
        let presets = vec![
            preset(5, Some(100), &size_colour("Large", "Red")),
            preset(7, Some(100), &size_colour("Small", "Blue")),
            preset(8, Some(100), &size_colour("Medium", "Red")),
        ];
        let group = build_product_group(&mut run, ProductId::new(100).unwrap(), &presets).unwrap();
        (group, ExportSettings::default(), hooks)
    }

    #[test]
    fn first_row_carries_product_columns() {
        let (group, settings, hooks) = group(ExportHooks::default());
        let rows = format_product_rows(&group, &settings, &hooks);

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.get("Handle") == "workbench"));

        let first = &rows[0];
        assert_eq!(first.get("Title"), "Workbench – Size: 1800");
        assert_eq!(first.get("Published"), "true");
        assert_eq!(first.get("Status"), "active");
        assert_eq!(first.get("Option1 Name"), "Size");
        assert_eq!(first.get("Option2 Name"), "Colour");
        assert_eq!(first.get("Option2 Linked To"), COLOUR_LINK);
        assert_eq!(first.get("Image Position"), "1");
        assert_eq!(first.get(FRAME_COLOURS), "red; blue");
        assert_eq!(first.get("Variant Grams"), "0.0");

        let second = &rows[1];
        for column in ["Title", "Vendor", "Published", "Status", "Option1 Name", "Image Src", "Option2 Linked To"] {
            assert_eq!(second.get(column), "", "{column} should be blank on later rows");
        }
        assert_eq!(second.get("Option1 Value"), "Small");
        assert_eq!(second.get("Option2 Value"), "blue");
        assert_eq!(second.get("Variant Price"), "199.00");
        assert_eq!(second.get(CONFIGURATION_PRICE_HEADER), "0.00");
    }

    #[test]
    fn row_hook_sees_first_flag() {
        let hooks = ExportHooks::new().on_catalog_row(|mut row, _, _, is_first| {
            row.set("Tags", if is_first { "first" } else { "rest" });
            row
        });
        let (group, settings, hooks) = group(hooks);
        let rows = format_product_rows(&group, &settings, &hooks);

        let tags: Vec<&str> = rows.iter().map(|row| row.get("Tags")).collect();
        assert_eq!(tags, vec!["first", "rest", "rest"]);
    }
}
