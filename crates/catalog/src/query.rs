//! Preset selection criteria handed to a [`crate::PresetSource`].

use preset_export_core::{PresetId, ProductId};

use crate::preset::PRESET_STATUS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresetOrderBy {
    #[default]
    Id,
    Date,
    Modified,
    Title,
    /// Keep the order of [`PresetQuery::ids`].
    Given,
}

impl PresetOrderBy {
    /// Parse a list-table `orderby` value; unknown values fall back to id order.
    pub fn from_param(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "date" | "post_date" => Self::Date,
            "modified" | "post_modified" => Self::Modified,
            "title" | "post_title" => Self::Title,
            "post__in" => Self::Given,
            _ => Self::Id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// What to fetch and in which order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetQuery {
    /// Accepted preset statuses; empty accepts any status.
    pub statuses: Vec<String>,
    /// Restrict to these ids.
    pub ids: Option<Vec<PresetId>>,
    pub search: Option<String>,
    pub author: Option<u64>,
    /// Digits-only `YYYY[MM[DD]]` prefix of the creation date.
    pub month: Option<String>,
    pub parent: Option<ProductId>,
    /// Category slugs of the parent product (any match).
    pub product_categories: Vec<String>,
    /// Tag slugs of the parent product (any match).
    pub product_tags: Vec<String>,
    pub order_by: PresetOrderBy,
    pub order: SortOrder,
    /// Page size; `None` returns every match.
    pub limit: Option<usize>,
    /// 1-based page number, used with `limit`.
    pub page: usize,
}

impl Default for PresetQuery {
    fn default() -> Self {
        Self {
            statuses: vec![PRESET_STATUS.to_string()],
            ids: None,
            search: None,
            author: None,
            month: None,
            parent: None,
            product_categories: Vec::new(),
            product_tags: Vec::new(),
            order_by: PresetOrderBy::Id,
            order: SortOrder::Asc,
            limit: None,
            page: 1,
        }
    }
}
