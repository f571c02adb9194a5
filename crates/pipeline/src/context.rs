//! Shared export context and the per-run state built from it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use preset_export_catalog::{ConfigurationModel, ConfigurationResolver, Preset, Product, ProductCatalog};
use preset_export_core::{PresetId, ProductId};

use crate::classify::VariantLayerOverrides;
use crate::hooks::ExportHooks;
use crate::settings::ExportSettings;

/// Long-lived collaborators and configuration, shared by every run.
#[derive(Clone)]
pub struct ExportContext {
    pub products: Arc<dyn ProductCatalog>,
    pub configurations: Arc<dyn ConfigurationResolver>,
    pub settings: ExportSettings,
    pub hooks: Arc<ExportHooks>,
}

impl fmt::Debug for ExportContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportContext")
            .field("settings", &self.settings)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl ExportContext {
    pub fn new(
        products: Arc<dyn ProductCatalog>,
        configurations: Arc<dyn ConfigurationResolver>,
    ) -> Self {
        Self {
            products,
            configurations,
            settings: ExportSettings::default(),
            hooks: Arc::new(ExportHooks::default()),
        }
    }
}

/// Memo of resolved configuration models, keyed by preset.
///
/// Misses are remembered too, so an unresolvable preset is looked up once.
#[derive(Debug, Default)]
pub struct ConfigurationCache {
    entries: HashMap<PresetId, Option<Arc<ConfigurationModel>>>,
}

impl ConfigurationCache {
    pub fn get_or_resolve(
        &mut self,
        preset: &Preset,
        resolver: &dyn ConfigurationResolver,
    ) -> Option<Arc<ConfigurationModel>> {
        self.entries
            .entry(preset.id)
            .or_insert_with(|| resolver.resolve(preset).map(Arc::new))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State of a single export call.
///
/// Created per request and dropped with it; nothing here outlives the run.
#[derive(Debug)]
pub struct ExportRun {
    ctx: ExportContext,
    overrides: VariantLayerOverrides,
    configurations: ConfigurationCache,
}

impl ExportRun {
    pub fn new(ctx: ExportContext, overrides: VariantLayerOverrides) -> Self {
        Self {
            ctx,
            overrides,
            configurations: ConfigurationCache::default(),
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.ctx.settings
    }

    pub fn hooks(&self) -> &ExportHooks {
        &self.ctx.hooks
    }

    pub fn overrides(&self) -> &VariantLayerOverrides {
        &self.overrides
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.ctx.products.product(id)
    }

    pub fn configuration(&mut self, preset: &Preset) -> Option<Arc<ConfigurationModel>> {
        self.configurations
            .get_or_resolve(preset, self.ctx.configurations.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::fixtures::preset;

    #[derive(Default)]
    struct CountingResolver {
        calls: AtomicUsize,
    }

    impl ConfigurationResolver for CountingResolver {
        fn resolve(&self, preset: &Preset) -> Option<ConfigurationModel> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ConfigurationModel::from_payload(&preset.content)
        }
    }

    #[test]
    fn cache_resolves_each_preset_once() {
        let resolver = CountingResolver::default();
        let mut cache = ConfigurationCache::default();
        let hit = preset(1, Some(100), r#"[{"choice_id": 1, "layer_name": "Size"}]"#);
        let miss = preset(2, Some(100), "not json");

        assert!(cache.get_or_resolve(&hit, &resolver).is_some());
        assert!(cache.get_or_resolve(&hit, &resolver).is_some());
        assert!(cache.get_or_resolve(&miss, &resolver).is_none());
        assert!(cache.get_or_resolve(&miss, &resolver).is_none());

        assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }
}
