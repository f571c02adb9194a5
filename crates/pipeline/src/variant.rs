//! Variant records built from presets.

use rust_decimal::Decimal;
use serde::Serialize;

use preset_export_catalog::preset::BARCODE_META_KEY;
use preset_export_catalog::{ConfigurationModel, Preset, Product};
use preset_export_core::money::parse_amount;
use preset_export_core::{PresetId, PriceFormat};

use crate::classify::{ClassifiedOption, ClassifiedOptions, classify_options};
use crate::context::ExportRun;
use crate::options::{OptionEntry, extract_options};
use crate::pricing::{PriceBreakdown, calculate};

/// Product meta key holding the cost of goods.
pub const COST_META_KEY: &str = "_wc_cog_cost";

/// One size/colour combination of a product, ready to be formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub preset_id: PresetId,
    pub name: String,
    pub options: Vec<OptionEntry>,
    /// `lower(size value) | lower(colour slug)`; unique within a product.
    pub variant_key: String,
    pub size: ClassifiedOption,
    pub colour: ClassifiedOption,
    pub price: String,
    pub price_raw: Decimal,
    pub extra_total: String,
    pub extra_total_raw: Decimal,
    pub base_component: String,
    pub base_component_raw: Decimal,
    pub compare_at_price: String,
    pub sku: String,
    pub grams: Option<i64>,
    pub weight_unit: String,
    pub requires_shipping: bool,
    pub taxable: bool,
    pub barcode: String,
    pub image: String,
    pub cost: String,
}

/// Dedup key of a size/colour pair; empty unless both parts are present.
pub fn variant_key(size_value: &str, colour_slug: &str) -> String {
    let size = size_value.trim();
    if size.is_empty() || colour_slug.is_empty() {
        return String::new();
    }
    format!("{}|{}", size.to_lowercase(), colour_slug.to_lowercase())
}

/// `{sku}-{preset}`, falling back to `preset-{product}-{preset}`, or
/// `preset-{preset}` when there is no product at all.
pub fn variant_sku(product: Option<&Product>, preset_id: PresetId) -> String {
    match product {
        Some(product) if !product.sku.is_empty() => format!("{}-{preset_id}", product.sku),
        Some(product) => format!("preset-{}-{preset_id}", product.id),
        None => format!("preset-{preset_id}"),
    }
}

/// Preset thumbnail, else the configuration's rendered image, else empty.
pub fn variant_image(preset: &Preset, config: Option<&ConfigurationModel>) -> String {
    preset
        .thumbnail()
        .map(str::to_string)
        .or_else(|| config.and_then(|model| model.image_url.clone()))
        .unwrap_or_default()
}

pub fn barcode(preset: &Preset, product: &Product) -> String {
    preset
        .meta_str(BARCODE_META_KEY)
        .or_else(|| product.meta(BARCODE_META_KEY).map(str::to_string))
        .unwrap_or_default()
}

/// Regular price when it exceeds the variant price, else formatted zero.
pub fn compare_at_price(product: &Product, price: Decimal, format: &PriceFormat) -> String {
    let regular = product.regular_price_or_zero();
    if regular > price {
        format.format(regular)
    } else {
        format.zero()
    }
}

pub fn cost_per_item(product: &Product, format: &PriceFormat) -> String {
    product
        .meta(COST_META_KEY)
        .map(|raw| format.format(parse_amount(raw).unwrap_or(Decimal::ZERO)))
        .unwrap_or_default()
}

/// Build the catalog variant of `preset`.
///
/// Returns `None` unless both a size and a colour can be classified and the
/// preset can be priced.
pub fn build_catalog_variant(run: &mut ExportRun, product: &Product, preset: &Preset) -> Option<Variant> {
    let options = extract_options(&preset.content);
    let ClassifiedOptions { size, colour, .. } = classify_options(&options, run.overrides(), run.hooks());

    let (Some(mut size), Some(mut colour)) = (size, colour) else {
        tracing::debug!(preset_id = %preset.id, "preset has no size/colour pair; skipped");
        return None;
    };
    size.value = size.value.trim().to_string();
    colour.value = colour.value.trim().to_string();

    let config = run.configuration(preset);
    let settings = run.settings();
    let format = settings.price_format;
    let pricing = calculate(
        Some(product),
        preset,
        config.as_deref(),
        settings.extra_price_overrides_product_price,
        run.hooks(),
    )?;

    let variant = Variant {
        preset_id: preset.id,
        name: preset.title.clone(),
        variant_key: variant_key(&size.value, &colour.slug),
        options,
        price: format.format(pricing.price),
        price_raw: pricing.price,
        extra_total: format.format(pricing.effective_extra),
        extra_total_raw: pricing.effective_extra,
        base_component: format.format(pricing.base_component),
        base_component_raw: pricing.base_component,
        compare_at_price: compare_at_price(product, pricing.price, &format),
        sku: variant_sku(Some(product), preset.id),
        grams: settings.weight_unit.to_grams(product.weight),
        weight_unit: settings.weight_unit.catalog_label().to_string(),
        requires_shipping: product.requires_shipping(),
        taxable: product.is_taxable(),
        barcode: barcode(preset, product),
        image: variant_image(preset, config.as_deref()),
        cost: cost_per_item(product, &format),
        size,
        colour,
    };

    Some(run.hooks().variant(variant, product, preset, config.as_deref()))
}

/// Everything the raw format reports about one preset.
///
/// Unlike [`Variant`] nothing is required: fields stay empty when the parent
/// product or a classification is missing.
#[derive(Debug, Clone)]
pub struct PresetDetails {
    pub product: Option<Product>,
    pub options: Vec<OptionEntry>,
    pub classified: ClassifiedOptions,
    pub variant_key: String,
    /// `None` when the preset's price overflows.
    pub pricing: Option<PriceBreakdown>,
    pub sku: String,
    pub grams: Option<i64>,
    pub weight_unit: String,
    pub requires_shipping: bool,
    pub taxable: bool,
    pub image: String,
}

pub fn build_preset_details(run: &mut ExportRun, preset: &Preset) -> PresetDetails {
    let product = preset.parent_id.and_then(|id| run.product(id));
    let config = run.configuration(preset);
    let options = extract_options(&preset.content);
    let mut classified = classify_options(&options, run.overrides(), run.hooks());
    for option in [classified.size.as_mut(), classified.colour.as_mut()].into_iter().flatten() {
        option.value = option.value.trim().to_string();
    }

    let variant_key = variant_key(
        classified.size.as_ref().map(|o| o.value.as_str()).unwrap_or(""),
        classified.colour.as_ref().map(|o| o.slug.as_str()).unwrap_or(""),
    );

    let settings = run.settings();
    let pricing = calculate(
        product.as_ref(),
        preset,
        config.as_deref(),
        settings.extra_price_overrides_product_price,
        run.hooks(),
    );

    let (grams, weight_unit, requires_shipping, taxable) = match &product {
        Some(product) => (
            settings.weight_unit.to_grams(product.weight),
            settings.weight_unit.catalog_label().to_string(),
            product.requires_shipping(),
            product.is_taxable(),
        ),
        None => (None, String::new(), false, false),
    };

    PresetDetails {
        sku: variant_sku(product.as_ref(), preset.id),
        image: variant_image(preset, config.as_deref()),
        product,
        options,
        classified,
        variant_key,
        pricing,
        grams,
        weight_unit,
        requires_shipping,
        taxable,
    }
}
