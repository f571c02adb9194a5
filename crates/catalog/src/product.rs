use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use preset_export_core::ProductId;

fn default_status() -> String {
    "publish".to_string()
}

fn default_type() -> String {
    "simple".to_string()
}

fn default_tax_status() -> String {
    "taxable".to_string()
}

/// Primary product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// A taxonomy term (name + slug).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub slug: String,
}

/// A product category with its ancestor names (root first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTerm {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub ancestors: Vec<String>,
}

/// Parent product as exposed by the host catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_type")]
    pub product_type: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub regular_price: Option<Decimal>,
    /// Weight in the store's configured unit.
    #[serde(default)]
    pub weight: Option<Decimal>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default = "default_tax_status")]
    pub tax_status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub image: Option<ProductImage>,
    #[serde(default)]
    pub categories: Vec<CategoryTerm>,
    #[serde(default)]
    pub tags: Vec<Term>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    #[serde(default)]
    pub permalink: String,
}

impl Product {
    /// Minimal published product, mostly useful for tests and fixtures.
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: String::new(),
            status: default_status(),
            product_type: default_type(),
            sku: String::new(),
            price: None,
            regular_price: None,
            weight: None,
            is_virtual: false,
            tax_status: default_tax_status(),
            description: String::new(),
            short_description: String::new(),
            image: None,
            categories: Vec::new(),
            tags: Vec::new(),
            attributes: BTreeMap::new(),
            meta: BTreeMap::new(),
            permalink: String::new(),
        }
    }

    /// Non-empty meta value for `key`.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Non-empty attribute value for `key` (e.g. `pa_brand`).
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn is_published(&self) -> bool {
        self.status == "publish"
    }

    pub fn requires_shipping(&self) -> bool {
        !self.is_virtual
    }

    pub fn is_taxable(&self) -> bool {
        self.tax_status == "taxable"
    }

    /// Current selling price, zero when unset.
    pub fn price_or_zero(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }

    /// Regular (list) price, zero when unset.
    pub fn regular_price_or_zero(&self) -> Decimal {
        self.regular_price.unwrap_or(Decimal::ZERO)
    }

    pub fn primary_category(&self) -> Option<&CategoryTerm> {
        self.categories.first()
    }
}
