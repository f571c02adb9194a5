//! Read-only capabilities the export needs from the host store.

use std::sync::Arc;

use preset_export_core::ProductId;

use crate::configuration::ConfigurationModel;
use crate::preset::Preset;
use crate::product::Product;
use crate::query::PresetQuery;

/// Fetches presets matching a query, in query order.
pub trait PresetSource: Send + Sync {
    fn fetch(&self, query: &PresetQuery) -> Vec<Preset>;
}

/// Resolves parent products by id.
pub trait ProductCatalog: Send + Sync {
    fn product(&self, id: ProductId) -> Option<Product>;
}

/// Resolves the configuration model of a preset.
pub trait ConfigurationResolver: Send + Sync {
    fn resolve(&self, preset: &Preset) -> Option<ConfigurationModel>;
}

impl<S> PresetSource for Arc<S>
where
    S: PresetSource + ?Sized,
{
    fn fetch(&self, query: &PresetQuery) -> Vec<Preset> {
        (**self).fetch(query)
    }
}

impl<S> ProductCatalog for Arc<S>
where
    S: ProductCatalog + ?Sized,
{
    fn product(&self, id: ProductId) -> Option<Product> {
        (**self).product(id)
    }
}

impl<S> ConfigurationResolver for Arc<S>
where
    S: ConfigurationResolver + ?Sized,
{
    fn resolve(&self, preset: &Preset) -> Option<ConfigurationModel> {
        (**self).resolve(preset)
    }
}

/// Resolver that reads the model straight from the preset payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct PayloadConfigurationResolver;

impl ConfigurationResolver for PayloadConfigurationResolver {
    fn resolve(&self, preset: &Preset) -> Option<ConfigurationModel> {
        ConfigurationModel::from_payload(&preset.content)
    }
}
