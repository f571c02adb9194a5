//! Export request parsing and scope resolution.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use serde::{Deserialize, Serialize};

use preset_export_catalog::{PresetOrderBy, PresetQuery, SortOrder};
use preset_export_core::{PresetId, ProductId, strip_tags, title_slug};

use crate::classify::VariantLayerOverrides;
use crate::options::leading_int;

pub const DEFAULT_PER_PAGE: usize = 20;

/// Highest page number a request may ask for.
pub const MAX_PAGE: usize = u32::MAX as usize;

/// List-table keys that may carry the parent product filter, by priority.
pub const PARENT_FILTER_KEYS: [&str; 5] = [
    "post_parent",
    "product_id",
    "parent",
    "post_parent_id",
    "mkl_pc_product",
];

/// The export form as submitted. Every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportForm {
    pub scope: Option<String>,
    pub preset_ids: Option<String>,
    pub page_scope_ids: Option<String>,
    pub paged: Option<String>,
    pub per_page: Option<String>,
    pub source_query: Option<String>,
    pub variant_product_id: Option<String>,
    pub variant_size_layer: Option<String>,
    pub variant_colour_layer: Option<String>,
    pub export_format: Option<String>,
    pub export_all: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    #[default]
    Page,
    Selection,
    All,
}

impl ExportScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Selection => "selection",
            Self::All => "all",
        }
    }

    /// `all` is unbounded and is streamed; the other scopes are buffered.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Grouped product-import rows (`shopify` / `catalog`).
    #[default]
    Catalog,
    /// One diagnostic row per preset.
    Raw,
}

impl ExportFormat {
    pub fn from_param(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "raw" => Self::Raw,
            _ => Self::Catalog,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Raw => "raw",
        }
    }
}

/// Filters decoded from the list table's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilters {
    /// Explicit statuses; empty keeps the default preset status.
    pub statuses: Vec<String>,
    pub search: Option<String>,
    pub author: Option<u64>,
    pub month: Option<String>,
    pub order_by: Option<PresetOrderBy>,
    pub order: Option<SortOrder>,
    pub parent: Option<ProductId>,
    pub product_categories: Vec<String>,
    pub product_tags: Vec<String>,
}

fn sanitize_key(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn absint(raw: &str) -> u64 {
    leading_int(raw).unsigned_abs()
}

/// Decode a base64 `key=value&…` blob into its parameters.
///
/// Array keys (`product_cat[]`, `product_cat[0]`) are folded onto their base
/// name; values keep submission order.
fn decode_source_query(raw: &str) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();
    let raw = raw.trim();
    if raw.is_empty() {
        return params;
    }

    let Ok(bytes) = STANDARD.decode(raw).or_else(|_| STANDARD_NO_PAD.decode(raw)) else {
        tracing::debug!("source query is not base64; filters ignored");
        return params;
    };

    for (key, value) in url::form_urlencoded::parse(&bytes) {
        let key = key.split('[').next().unwrap_or_default().to_string();
        if key.is_empty() {
            continue;
        }
        params.entry(key).or_default().push(value.into_owned());
    }
    params
}

impl ExportFilters {
    /// Parse an encoded list-table query.
    pub fn from_source_query(raw: &str) -> Self {
        let params = decode_source_query(raw);
        let last = |key: &str| {
            params
                .get(key)
                .and_then(|values| values.last())
                .map(|value| value.trim())
                .filter(|value| !value.is_empty() && *value != "0")
        };
        let terms = |key: &str| -> Vec<String> {
            params
                .get(key)
                .map(|values| {
                    values
                        .iter()
                        .map(|value| title_slug(value))
                        .filter(|slug| !slug.is_empty())
                        .collect()
                })
                .unwrap_or_default()
        };

        let statuses = match params.get("post_status") {
            Some(values) if !values.iter().any(|v| v == "all") => values
                .iter()
                .map(|value| sanitize_key(value))
                .filter(|status| !status.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        Self {
            statuses,
            search: last("s")
                .map(|s| strip_tags(s).trim().to_string())
                .filter(|s| !s.is_empty()),
            author: last("author").map(absint).filter(|id| *id > 0),
            month: last("m")
                .map(|m| m.chars().filter(char::is_ascii_digit).collect::<String>())
                .filter(|m| !m.is_empty()),
            order_by: last("orderby").map(PresetOrderBy::from_param),
            order: last("order").and_then(|order| match order.to_ascii_uppercase().as_str() {
                "ASC" => Some(SortOrder::Asc),
                "DESC" => Some(SortOrder::Desc),
                _ => None,
            }),
            parent: PARENT_FILTER_KEYS
                .iter()
                .find_map(|key| last(key))
                .and_then(|raw| ProductId::new(absint(raw))),
            product_categories: terms("product_cat"),
            product_tags: terms("product_tag"),
        }
    }
}

/// Split a comma/whitespace separated id list; duplicates keep their first
/// position and invalid ids are dropped.
pub fn parse_id_list(raw: &str) -> Vec<PresetId> {
    let mut ids: Vec<PresetId> = Vec::new();
    for candidate in raw.split(|c: char| c == ',' || c.is_whitespace()) {
        if let Some(id) = PresetId::new(absint(candidate)) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// A fully resolved export call. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub scope: ExportScope,
    pub format: ExportFormat,
    pub filters: ExportFilters,
    pub selected_ids: Vec<PresetId>,
    pub page_ids: Vec<PresetId>,
    pub per_page: usize,
    pub paged: usize,
    pub product_override: Option<ProductId>,
    pub overrides: VariantLayerOverrides,
}

impl ExportRequest {
    /// Resolve a submitted form.
    ///
    /// Scope precedence: `export_all` forces `all`; any selected id forces
    /// `selection`; `selection` without ids falls back to `page`, as does an
    /// unknown scope.
    pub fn from_form(form: &ExportForm) -> Self {
        let text = |field: &Option<String>| field.as_deref().unwrap_or("").to_string();

        let selected_ids = parse_id_list(&text(&form.preset_ids));
        let page_ids = parse_id_list(&text(&form.page_scope_ids));
        let export_all = leading_int(&text(&form.export_all)) != 0;

        let requested = match sanitize_key(&text(&form.scope)).as_str() {
            "selection" => ExportScope::Selection,
            "all" => ExportScope::All,
            _ => ExportScope::Page,
        };
        let scope = if export_all {
            ExportScope::All
        } else if !selected_ids.is_empty() {
            ExportScope::Selection
        } else if requested == ExportScope::Selection {
            ExportScope::Page
        } else {
            requested
        };

        let per_page = match leading_int(&text(&form.per_page)) {
            n if n <= 0 => DEFAULT_PER_PAGE,
            n => n as usize,
        };
        let paged = leading_int(&text(&form.paged)).clamp(1, MAX_PAGE as i64) as usize;

        let product_override = ProductId::new(absint(&text(&form.variant_product_id)));
        let mut filters = ExportFilters::from_source_query(&text(&form.source_query));
        if product_override.is_some() {
            filters.parent = product_override;
        }

        Self {
            scope,
            format: ExportFormat::from_param(&text(&form.export_format)),
            filters,
            selected_ids,
            page_ids,
            per_page,
            paged,
            product_override,
            overrides: VariantLayerOverrides::new(
                &text(&form.variant_size_layer),
                &text(&form.variant_colour_layer),
            ),
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// The preset query this request selects.
    ///
    /// Explicit id lists (selection, or the ids shown on the current page)
    /// keep their given order; otherwise the list table's order applies.
    pub fn to_query(&self) -> PresetQuery {
        let mut query = PresetQuery::default();
        if !self.filters.statuses.is_empty() {
            query.statuses = self.filters.statuses.clone();
        }

        let ids = match self.scope {
            ExportScope::Selection => Some(self.selected_ids.clone()),
            ExportScope::Page if !self.page_ids.is_empty() => Some(self.page_ids.clone()),
            ExportScope::Page => {
                query.limit = Some(self.per_page);
                query.page = self.paged;
                None
            }
            ExportScope::All => None,
        };

        match ids {
            Some(ids) => {
                query.ids = Some(ids);
                query.order_by = PresetOrderBy::Given;
            }
            None => {
                if let Some(order_by) = self.filters.order_by {
                    query.order_by = order_by;
                }
            }
        }
        if let Some(order) = self.filters.order {
            query.order = order;
        }

        query.search = self.filters.search.clone();
        query.author = self.filters.author;
        query.month = self.filters.month.clone();
        query.parent = self.filters.parent;
        query.product_categories = self.filters.product_categories.clone();
        query.product_tags = self.filters.product_tags.clone();
        query
    }
}
