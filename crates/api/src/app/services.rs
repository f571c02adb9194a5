//! Export service wiring.

use std::path::Path;
use std::sync::Arc;

use preset_export_catalog::{CatalogError, InMemoryCatalog};
use preset_export_pipeline::{ExportError, ExportSettings, Exporter};

use crate::config::ApiConfig;

/// Name reported when no catalog backend is wired.
pub const CATALOG_DEPENDENCY: &str = "A product catalog";

/// Services shared by the export routes.
#[derive(Debug, Clone, Default)]
pub struct ExportServices {
    exporter: Option<Exporter>,
}

impl ExportServices {
    pub fn new(exporter: Exporter) -> Self {
        Self {
            exporter: Some(exporter),
        }
    }

    /// No catalog backend: every export fails with a dependency error.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: InMemoryCatalog, settings: ExportSettings) -> Self {
        let catalog = Arc::new(catalog);
        Self::new(Exporter::new(catalog.clone(), catalog.clone(), catalog).with_settings(settings))
    }

    pub fn exporter(&self) -> Result<&Exporter, ExportError> {
        self.exporter
            .as_ref()
            .ok_or_else(|| ExportError::dependency(CATALOG_DEPENDENCY))
    }
}

/// Build services from configuration, loading the catalog snapshot if one is
/// configured.
pub fn build_services(config: &ApiConfig) -> Result<ExportServices, CatalogError> {
    match &config.catalog_path {
        Some(path) => load_catalog(path, config.settings.clone()),
        None => {
            tracing::warn!("CATALOG_PATH not set; exports will report the catalog as unavailable");
            Ok(ExportServices::unavailable())
        }
    }
}

fn load_catalog(path: &Path, settings: ExportSettings) -> Result<ExportServices, CatalogError> {
    let catalog = InMemoryCatalog::load_json(path)?;
    tracing::info!(path = %path.display(), "catalog backend ready");
    Ok(ExportServices::from_catalog(catalog, settings))
}
