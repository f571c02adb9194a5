//! In-memory catalog for development and tests.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use preset_export_core::{PresetId, ProductId};

use crate::configuration::ConfigurationModel;
use crate::error::CatalogError;
use crate::preset::Preset;
use crate::product::Product;
use crate::query::{PresetOrderBy, PresetQuery, SortOrder};
use crate::source::{ConfigurationResolver, PresetSource, ProductCatalog};

/// A writer panicked while holding `lock`; the maps stay structurally valid,
/// so keep serving them instead of reporting an empty store.
fn read<'a, T>(lock: &'a RwLock<T>, store: &'static str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned: PoisonError<_>| {
        tracing::warn!(store, "catalog lock poisoned; recovering");
        poisoned.into_inner()
    })
}

fn write<'a, T>(lock: &'a RwLock<T>, store: &'static str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned: PoisonError<_>| {
        tracing::warn!(store, "catalog lock poisoned; recovering");
        poisoned.into_inner()
    })
}

/// Explicit configuration model for one preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetConfiguration {
    pub preset_id: PresetId,
    #[serde(flatten)]
    pub model: ConfigurationModel,
}

/// Serialized form of a catalog (a JSON fixture file).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub presets: Vec<Preset>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub configurations: Vec<PresetConfiguration>,
}

/// In-memory store implementing every catalog capability.
///
/// Configuration models fall back to the preset payload when no explicit
/// model was inserted.
#[derive(Debug)]
pub struct InMemoryCatalog {
    presets: RwLock<BTreeMap<PresetId, Preset>>,
    products: RwLock<HashMap<ProductId, Product>>,
    configurations: RwLock<HashMap<PresetId, ConfigurationModel>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            presets: RwLock::new(BTreeMap::new()),
            products: RwLock::new(HashMap::new()),
            configurations: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let catalog = Self::new();
        for preset in snapshot.presets {
            catalog.insert_preset(preset);
        }
        for product in snapshot.products {
            catalog.insert_product(product);
        }
        for configured in snapshot.configurations {
            catalog.insert_configuration(configured.preset_id, configured.model);
        }
        catalog
    }

    /// Load a snapshot from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&raw)?;
        tracing::info!(
            presets = snapshot.presets.len(),
            products = snapshot.products.len(),
            "catalog snapshot loaded"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn insert_preset(&self, preset: Preset) {
        write(&self.presets, "presets").insert(preset.id, preset);
    }

    pub fn insert_product(&self, product: Product) {
        write(&self.products, "products").insert(product.id, product);
    }

    pub fn insert_configuration(&self, preset_id: PresetId, model: ConfigurationModel) {
        write(&self.configurations, "configurations").insert(preset_id, model);
    }

    fn matches(&self, preset: &Preset, query: &PresetQuery, products: &HashMap<ProductId, Product>) -> bool {
        if !query.statuses.is_empty() && !query.statuses.iter().any(|s| s == &preset.status) {
            return false;
        }
        if let Some(ids) = &query.ids {
            if !ids.contains(&preset.id) {
                return false;
            }
        }
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            if !preset.title.to_lowercase().contains(&needle)
                && !preset.content.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(author) = query.author {
            if preset.author_id != author {
                return false;
            }
        }
        if let Some(month) = &query.month {
            let stamp = preset.created_at.format("%Y%m%d%H%M%S").to_string();
            if !stamp.starts_with(month.as_str()) {
                return false;
            }
        }
        if let Some(parent) = query.parent {
            if preset.parent_id != Some(parent) {
                return false;
            }
        }

        if query.product_categories.is_empty() && query.product_tags.is_empty() {
            return true;
        }

        let Some(product) = preset.parent_id.and_then(|id| products.get(&id)) else {
            return false;
        };
        if !query.product_categories.is_empty()
            && !product
                .categories
                .iter()
                .any(|c| query.product_categories.contains(&c.slug))
        {
            return false;
        }
        if !query.product_tags.is_empty()
            && !product.tags.iter().any(|t| query.product_tags.contains(&t.slug))
        {
            return false;
        }
        true
    }

    fn compare(a: &Preset, b: &Preset, query: &PresetQuery) -> Ordering {
        let ordering = match query.order_by {
            PresetOrderBy::Id => a.id.cmp(&b.id),
            PresetOrderBy::Date => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
            PresetOrderBy::Modified => a.modified_at.cmp(&b.modified_at).then(a.id.cmp(&b.id)),
            PresetOrderBy::Title => a.title.cmp(&b.title).then(a.id.cmp(&b.id)),
            PresetOrderBy::Given => {
                let position = |id: PresetId| {
                    query
                        .ids
                        .as_ref()
                        .and_then(|ids| ids.iter().position(|candidate| *candidate == id))
                        .unwrap_or(usize::MAX)
                };
                // Given order is absolute; ASC/DESC does not flip it.
                return position(a.id).cmp(&position(b.id));
            }
        };
        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetSource for InMemoryCatalog {
    fn fetch(&self, query: &PresetQuery) -> Vec<Preset> {
        let presets = read(&self.presets, "presets");
        let products = read(&self.products, "products");

        let mut matched: Vec<Preset> = presets
            .values()
            .filter(|preset| self.matches(preset, query, &products))
            .cloned()
            .collect();
        matched.sort_by(|a, b| Self::compare(a, b, query));

        let Some(limit) = query.limit else {
            return matched;
        };
        // A page past any representable offset is simply empty.
        let Some(offset) = query.page.saturating_sub(1).checked_mul(limit) else {
            return vec![];
        };
        matched.into_iter().skip(offset).take(limit).collect()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn product(&self, id: ProductId) -> Option<Product> {
        read(&self.products, "products").get(&id).cloned()
    }
}

impl ConfigurationResolver for InMemoryCatalog {
    fn resolve(&self, preset: &Preset) -> Option<ConfigurationModel> {
        if let Some(model) = read(&self.configurations, "configurations").get(&preset.id) {
            return Some(model.clone());
        }
        ConfigurationModel::from_payload(&preset.content)
    }
}
