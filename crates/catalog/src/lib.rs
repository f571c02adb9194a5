//! Catalog collaborators for the preset export.
//!
//! The export reads presets, products and configuration models that are owned
//! by the host store. This crate models those records and the read-only
//! capabilities the export needs from them (no HTTP, no export logic).

pub mod configuration;
pub mod error;
pub mod memory;
pub mod preset;
pub mod product;
pub mod query;
pub mod source;

pub use configuration::{ConfigurationModel, LayerChoice};
pub use error::CatalogError;
pub use memory::{CatalogSnapshot, InMemoryCatalog};
pub use preset::Preset;
pub use product::{CategoryTerm, Product, ProductImage, Term};
pub use query::{PresetOrderBy, PresetQuery, SortOrder};
pub use source::{ConfigurationResolver, PayloadConfigurationResolver, PresetSource, ProductCatalog};
