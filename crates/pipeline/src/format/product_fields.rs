//! Product-level columns of the catalog format.

use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use preset_export_catalog::{Product, ProductImage};
use preset_export_core::{strip_tags, title_slug};

use crate::hooks::ExportHooks;
use crate::settings::ExportSettings;

pub const DEFAULT_CATEGORY: &str = "Hardware > Hardware Accessories > Tool Storage & Organization > Work Benches > Stationary Work Benches";
pub const TOOL_CART_CATEGORY: &str = "Hardware > Hardware Accessories > Tool Storage & Organization > Tool Carts";

/// Product meta keys holding a hand-picked catalog category, by priority.
pub const MANUAL_CATEGORY_KEYS: [&str; 3] = [
    "_shopify_product_category",
    "shopify_product_category",
    "_product_category",
];

pub const PRODUCT_TYPE_ATTRIBUTE: &str = "pa_product_type";

const SEO_DESCRIPTION_WORDS: usize = 40;

/// Option suffixes some product titles carry (`"Bench – Size: 1800"`).
static TITLE_SUFFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        "Size",
        "Colour",
        "Color",
        "Worktop",
        "Left-side Options",
        "Right-side Options",
    ]
    .iter()
    .map(|label| Regex::new(&format!(r"(?i)\s*[–-]\s*{label}:\s*[^–-]+")).expect("valid regex"))
    .collect()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Handle shared by every row of a product.
///
/// Built from the title without option suffixes; falls back to the product
/// slug, then `product-{id}`.
pub fn product_handle(product: &Product, hooks: &ExportHooks) -> String {
    let mut clean = product.name.clone();
    for pattern in TITLE_SUFFIXES.iter() {
        clean = pattern.replace_all(&clean, "").into_owned();
    }
    let clean = WHITESPACE.replace_all(clean.trim(), " ");

    let mut handle = title_slug(&clean);
    if handle.is_empty() {
        handle = title_slug(&product.slug);
    }
    if handle.is_empty() {
        handle = title_slug(&product.name);
    }

    let handle = hooks.handle(handle, product);
    if handle.is_empty() {
        return format!("product-{}", product.id);
    }
    handle
}

/// Primary image with alt text defaulting to the product name.
pub fn primary_image(product: &Product) -> Option<ProductImage> {
    let image = product.image.as_ref().filter(|image| !image.url.trim().is_empty())?;
    let alt = if image.alt.trim().is_empty() {
        &product.name
    } else {
        &image.alt
    };
    Some(ProductImage {
        url: image.url.clone(),
        alt: strip_tags(alt),
    })
}

pub fn vendor(product: &Product, settings: &ExportSettings) -> String {
    settings
        .vendor_attributes
        .iter()
        .find_map(|attribute| product.attribute(attribute))
        .map(strip_tags)
        .unwrap_or_else(|| settings.store_name.clone())
}

/// Names on the primary category's path, root first.
pub fn category_names(product: &Product) -> Vec<String> {
    product
        .primary_category()
        .map(|category| {
            let mut names = category.ancestors.clone();
            names.push(category.name.clone());
            names
        })
        .unwrap_or_default()
}

/// Whether a category string looks like catalog taxonomy: a numeric id or a
/// `>`-separated breadcrumb.
pub fn is_valid_category(category: &str) -> bool {
    let category = category.trim();
    if category.is_empty() {
        return false;
    }
    Decimal::from_str(category).is_ok() || category.contains('>')
}

/// Catalog category: manual meta, then the taxonomy breadcrumb, then a
/// default picked from the product's wording.
pub fn product_category(product: &Product, hooks: &ExportHooks) -> String {
    let names = category_names(product);

    if let Some(manual) = MANUAL_CATEGORY_KEYS.iter().find_map(|key| product.meta(key)) {
        let manual = hooks.manual_category(manual.trim().to_string(), product);
        if !manual.is_empty() {
            return manual;
        }
    }

    let derived = names.iter().map(|name| strip_tags(name)).collect::<Vec<_>>().join(" > ");
    let derived = hooks.category_from_terms(derived, &names, product);
    if is_valid_category(&derived) {
        return derived;
    }

    let haystack = format!("{} {} {}", product.name, product.slug, names.join(" ")).to_lowercase();
    let fallback = if haystack.contains("trolley") {
        TOOL_CART_CATEGORY
    } else {
        DEFAULT_CATEGORY
    };
    hooks.default_category(fallback.to_string(), &names, product)
}

fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start && !ch.is_whitespace() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }
    out
}

pub fn product_type_label(product: &Product) -> String {
    match product.attribute(PRODUCT_TYPE_ATTRIBUTE) {
        Some(label) => strip_tags(label),
        None => capitalize_words(&product.product_type.replace('-', " ")),
    }
}

pub fn product_tags(product: &Product) -> String {
    product
        .tags
        .iter()
        .map(|tag| strip_tags(&tag.name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn seo_title(product: &Product) -> String {
    product
        .meta("_yoast_wpseo_title")
        .or_else(|| product.meta("_aioseo_title"))
        .unwrap_or(product.name.as_str())
        .to_string()
}

pub fn seo_description(product: &Product) -> String {
    if let Some(description) = product
        .meta("_yoast_wpseo_metadesc")
        .or_else(|| product.meta("_aioseo_description"))
    {
        return description.to_string();
    }
    if !product.short_description.is_empty() {
        return strip_tags(&product.short_description);
    }
    trim_words(&product.description, SEO_DESCRIPTION_WORDS, "…")
}

/// First `limit` words of the plain text, with `more` appended when cut.
pub fn trim_words(text: &str, limit: usize, more: &str) -> String {
    let plain = strip_tags(text);
    let words: Vec<&str> = plain.split_whitespace().collect();
    if words.len() > limit {
        format!("{}{more}", words[..limit].join(" "))
    } else {
        words.join(" ")
    }
}
