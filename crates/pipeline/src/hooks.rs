//! Transform hooks.
//!
//! Every customisation point of the export is an ordered list of callbacks.
//! Callbacks run in registration order; each one receives the value produced
//! by the previous one. An empty list leaves the value untouched.
//!
//! Hooks are registered once, when the exporter is built, and are shared
//! read-only by every run afterwards.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use preset_export_catalog::{ConfigurationModel, LayerChoice, Preset, PresetQuery, Product};

use crate::options::OptionEntry;
use crate::pricing::PriceContext;
use crate::request::ExportRequest;
use crate::row::Row;
use crate::variant::Variant;

pub type ColourSlugHook = Arc<dyn Fn(String, &str, &OptionEntry) -> String + Send + Sync>;
pub type IncludeChoiceHook = Arc<dyn Fn(&LayerChoice, &PriceContext<'_>) -> bool + Send + Sync>;
pub type ChoicePriceHook = Arc<dyn Fn(Decimal, &LayerChoice, &Product) -> Decimal + Send + Sync>;
pub type ChoiceAmountHook =
    Arc<dyn Fn(Decimal, &LayerChoice, &PriceContext<'_>) -> Decimal + Send + Sync>;
pub type ExtraTotalHook = Arc<dyn Fn(Decimal, &PriceContext<'_>) -> Decimal + Send + Sync>;
pub type VariantPriceHook = Arc<
    dyn Fn(Decimal, Option<&Product>, &Preset, Option<&ConfigurationModel>) -> Decimal
        + Send
        + Sync,
>;
pub type VariantHook = Arc<
    dyn Fn(Variant, &Product, &Preset, Option<&ConfigurationModel>) -> Variant + Send + Sync,
>;
pub type ProductTextHook = Arc<dyn Fn(String, &Product) -> String + Send + Sync>;
pub type CategoryHook = Arc<dyn Fn(String, &[String], &Product) -> String + Send + Sync>;
pub type CatalogRowHook = Arc<dyn Fn(Row, &Variant, &Product, bool) -> Row + Send + Sync>;
pub type CatalogRowsHook = Arc<dyn Fn(Vec<Row>) -> Vec<Row> + Send + Sync>;
pub type RawRowsHook = Arc<dyn Fn(Vec<Row>, &[Preset]) -> Vec<Row> + Send + Sync>;
pub type HeadersHook = Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;
pub type QueryHook = Arc<dyn Fn(PresetQuery, &ExportRequest) -> PresetQuery + Send + Sync>;

/// Ordered transform callbacks injected into the pipeline.
#[derive(Clone, Default)]
pub struct ExportHooks {
    colour_slug: Vec<ColourSlugHook>,
    include_choice: Vec<IncludeChoiceHook>,
    choice_price: Vec<ChoicePriceHook>,
    choice_quantity: Vec<ChoiceAmountHook>,
    extra_item_total: Vec<ChoiceAmountHook>,
    extra_total: Vec<ExtraTotalHook>,
    variant_price: Vec<VariantPriceHook>,
    variant: Vec<VariantHook>,
    manual_category: Vec<ProductTextHook>,
    category_from_terms: Vec<CategoryHook>,
    default_category: Vec<CategoryHook>,
    handle: Vec<ProductTextHook>,
    catalog_row: Vec<CatalogRowHook>,
    catalog_rows: Vec<CatalogRowsHook>,
    raw_rows: Vec<RawRowsHook>,
    headers: Vec<HeadersHook>,
    query: Vec<QueryHook>,
}

impl fmt::Debug for ExportHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportHooks")
            .field("colour_slug", &self.colour_slug.len())
            .field("include_choice", &self.include_choice.len())
            .field("choice_price", &self.choice_price.len())
            .field("choice_quantity", &self.choice_quantity.len())
            .field("extra_item_total", &self.extra_item_total.len())
            .field("extra_total", &self.extra_total.len())
            .field("variant_price", &self.variant_price.len())
            .field("variant", &self.variant.len())
            .field("manual_category", &self.manual_category.len())
            .field("category_from_terms", &self.category_from_terms.len())
            .field("default_category", &self.default_category.len())
            .field("handle", &self.handle.len())
            .field("catalog_row", &self.catalog_row.len())
            .field("catalog_rows", &self.catalog_rows.len())
            .field("raw_rows", &self.raw_rows.len())
            .field("headers", &self.headers.len())
            .field("query", &self.query.len())
            .finish()
    }
}

impl ExportHooks {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- registration ----

    /// Remap a colour slug (e.g. onto a controlled vocabulary).
    pub fn on_colour_slug(
        mut self,
        hook: impl Fn(String, &str, &OptionEntry) -> String + Send + Sync + 'static,
    ) -> Self {
        self.colour_slug.push(Arc::new(hook));
        self
    }

    /// Returning `false` excludes a choice from the extra total.
    pub fn on_include_choice(
        mut self,
        hook: impl Fn(&LayerChoice, &PriceContext<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.include_choice.push(Arc::new(hook));
        self
    }

    /// Rewrite the displayed per-choice extra price.
    pub fn on_choice_price(
        mut self,
        hook: impl Fn(Decimal, &LayerChoice, &Product) -> Decimal + Send + Sync + 'static,
    ) -> Self {
        self.choice_price.push(Arc::new(hook));
        self
    }

    pub fn on_choice_quantity(
        mut self,
        hook: impl Fn(Decimal, &LayerChoice, &PriceContext<'_>) -> Decimal + Send + Sync + 'static,
    ) -> Self {
        self.choice_quantity.push(Arc::new(hook));
        self
    }

    pub fn on_extra_item_total(
        mut self,
        hook: impl Fn(Decimal, &LayerChoice, &PriceContext<'_>) -> Decimal + Send + Sync + 'static,
    ) -> Self {
        self.extra_item_total.push(Arc::new(hook));
        self
    }

    pub fn on_extra_total(
        mut self,
        hook: impl Fn(Decimal, &PriceContext<'_>) -> Decimal + Send + Sync + 'static,
    ) -> Self {
        self.extra_total.push(Arc::new(hook));
        self
    }

    /// Final say on a variant's price, before formatting.
    pub fn on_variant_price(
        mut self,
        hook: impl Fn(Decimal, Option<&Product>, &Preset, Option<&ConfigurationModel>) -> Decimal
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.variant_price.push(Arc::new(hook));
        self
    }

    pub fn on_variant(
        mut self,
        hook: impl Fn(Variant, &Product, &Preset, Option<&ConfigurationModel>) -> Variant
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.variant.push(Arc::new(hook));
        self
    }

    pub fn on_manual_category(
        mut self,
        hook: impl Fn(String, &Product) -> String + Send + Sync + 'static,
    ) -> Self {
        self.manual_category.push(Arc::new(hook));
        self
    }

    pub fn on_category_from_terms(
        mut self,
        hook: impl Fn(String, &[String], &Product) -> String + Send + Sync + 'static,
    ) -> Self {
        self.category_from_terms.push(Arc::new(hook));
        self
    }

    pub fn on_default_category(
        mut self,
        hook: impl Fn(String, &[String], &Product) -> String + Send + Sync + 'static,
    ) -> Self {
        self.default_category.push(Arc::new(hook));
        self
    }

    pub fn on_handle(
        mut self,
        hook: impl Fn(String, &Product) -> String + Send + Sync + 'static,
    ) -> Self {
        self.handle.push(Arc::new(hook));
        self
    }

    /// Rewrite each catalog row; the flag marks the first row of a product.
    pub fn on_catalog_row(
        mut self,
        hook: impl Fn(Row, &Variant, &Product, bool) -> Row + Send + Sync + 'static,
    ) -> Self {
        self.catalog_row.push(Arc::new(hook));
        self
    }

    /// Rewrite or filter the catalog row set before it is written.
    pub fn on_catalog_rows(
        mut self,
        hook: impl Fn(Vec<Row>) -> Vec<Row> + Send + Sync + 'static,
    ) -> Self {
        self.catalog_rows.push(Arc::new(hook));
        self
    }

    /// Rewrite or filter the raw row set before it is written.
    pub fn on_raw_rows(
        mut self,
        hook: impl Fn(Vec<Row>, &[Preset]) -> Vec<Row> + Send + Sync + 'static,
    ) -> Self {
        self.raw_rows.push(Arc::new(hook));
        self
    }

    pub fn on_headers(
        mut self,
        hook: impl Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.headers.push(Arc::new(hook));
        self
    }

    /// Adjust the preset query built from an export request.
    pub fn on_query(
        mut self,
        hook: impl Fn(PresetQuery, &ExportRequest) -> PresetQuery + Send + Sync + 'static,
    ) -> Self {
        self.query.push(Arc::new(hook));
        self
    }

    // ---- application ----

    pub fn colour_slug(&self, slug: String, value: &str, entry: &OptionEntry) -> String {
        self.colour_slug.iter().fold(slug, |acc, hook| hook(acc, value, entry))
    }

    /// `true` unless some hook vetoes the choice.
    pub fn include_choice(&self, choice: &LayerChoice, ctx: &PriceContext<'_>) -> bool {
        self.include_choice.iter().all(|hook| hook(choice, ctx))
    }

    pub fn choice_price(&self, price: Decimal, choice: &LayerChoice, product: &Product) -> Decimal {
        self.choice_price.iter().fold(price, |acc, hook| hook(acc, choice, product))
    }

    pub fn choice_quantity(
        &self,
        quantity: Decimal,
        choice: &LayerChoice,
        ctx: &PriceContext<'_>,
    ) -> Decimal {
        self.choice_quantity.iter().fold(quantity, |acc, hook| hook(acc, choice, ctx))
    }

    pub fn extra_item_total(
        &self,
        total: Decimal,
        choice: &LayerChoice,
        ctx: &PriceContext<'_>,
    ) -> Decimal {
        self.extra_item_total.iter().fold(total, |acc, hook| hook(acc, choice, ctx))
    }

    pub fn extra_total(&self, total: Decimal, ctx: &PriceContext<'_>) -> Decimal {
        self.extra_total.iter().fold(total, |acc, hook| hook(acc, ctx))
    }

    pub fn variant_price(
        &self,
        price: Decimal,
        product: Option<&Product>,
        preset: &Preset,
        config: Option<&ConfigurationModel>,
    ) -> Decimal {
        self.variant_price
            .iter()
            .fold(price, |acc, hook| hook(acc, product, preset, config))
    }

    pub fn variant(
        &self,
        variant: Variant,
        product: &Product,
        preset: &Preset,
        config: Option<&ConfigurationModel>,
    ) -> Variant {
        self.variant
            .iter()
            .fold(variant, |acc, hook| hook(acc, product, preset, config))
    }

    pub fn manual_category(&self, category: String, product: &Product) -> String {
        self.manual_category.iter().fold(category, |acc, hook| hook(acc, product))
    }

    pub fn category_from_terms(&self, category: String, names: &[String], product: &Product) -> String {
        self.category_from_terms
            .iter()
            .fold(category, |acc, hook| hook(acc, names, product))
    }

    pub fn default_category(&self, category: String, names: &[String], product: &Product) -> String {
        self.default_category
            .iter()
            .fold(category, |acc, hook| hook(acc, names, product))
    }

    pub fn handle(&self, handle: String, product: &Product) -> String {
        self.handle.iter().fold(handle, |acc, hook| hook(acc, product))
    }

    pub fn catalog_row(&self, row: Row, variant: &Variant, product: &Product, is_first: bool) -> Row {
        self.catalog_row
            .iter()
            .fold(row, |acc, hook| hook(acc, variant, product, is_first))
    }

    pub fn catalog_rows(&self, rows: Vec<Row>) -> Vec<Row> {
        self.catalog_rows.iter().fold(rows, |acc, hook| hook(acc))
    }

    pub fn raw_rows(&self, rows: Vec<Row>, presets: &[Preset]) -> Vec<Row> {
        self.raw_rows.iter().fold(rows, |acc, hook| hook(acc, presets))
    }

    pub fn headers(&self, headers: Vec<String>) -> Vec<String> {
        self.headers.iter().fold(headers, |acc, hook| hook(acc))
    }

    pub fn query(&self, query: PresetQuery, request: &ExportRequest) -> PresetQuery {
        self.query.iter().fold(query, |acc, hook| hook(acc, request))
    }
}
