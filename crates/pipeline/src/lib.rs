//! `preset-export-pipeline`: turns saved presets into catalog CSV.
//!
//! The pipeline is synchronous and storage-agnostic: presets, products and
//! configuration models come from the capabilities in
//! `preset-export-catalog`, and the result is written to any `io::Write`.
//!
//! Flow: [`request::ExportRequest`] → preset query → option extraction →
//! classification → pricing → variants → product groups → rows → CSV.

pub mod classify;
pub mod context;
pub mod csv_writer;
pub mod error;
pub mod exporter;
pub mod format;
pub mod group;
pub mod hooks;
pub mod options;
pub mod pricing;
pub mod request;
pub mod row;
pub mod settings;
pub mod variant;

#[cfg(test)]
mod fixtures;

pub use classify::{ClassifiedOption, ClassifiedOptions, VariantLayerOverrides, classify_options};
pub use context::{ExportContext, ExportRun};
pub use csv_writer::{BOM, CsvSink};
pub use error::{EMPTY_EXPORT_MESSAGE, ExportError, ExportResult};
pub use exporter::{CONTENT_TYPE, Exporter, PreparedExport, export_filename};
pub use hooks::ExportHooks;
pub use options::{OptionEntry, extract_options};
pub use pricing::{PriceBreakdown, PriceContext};
pub use request::{ExportFilters, ExportForm, ExportFormat, ExportRequest, ExportScope};
pub use row::Row;
pub use settings::ExportSettings;
pub use variant::{PresetDetails, Variant};
