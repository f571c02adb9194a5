//! Export error model.

use thiserror::Error;

/// Message shown when nothing survives scoping, filtering and grouping.
pub const EMPTY_EXPORT_MESSAGE: &str = "No presets matched the current filters for export. \
Adjust the product filter or variant layer overrides and try again.";

pub type ExportResult<T> = Result<T, ExportError>;

/// Failures that abort a whole export.
///
/// Malformed individual records never show up here: they are skipped where
/// they are found and only total emptiness escalates to [`ExportError::Empty`].
#[derive(Debug, Error)]
pub enum ExportError {
    /// No valid session.
    #[error("Authentication is required to export presets.")]
    Unauthenticated,

    /// The caller lacks the export permission.
    #[error("You do not have permission to export presets.")]
    Unauthorized,

    /// A required external integration is not present.
    #[error("{0} is required for this export.")]
    DependencyUnavailable(String),

    /// Scope and filters selected nothing exportable.
    #[error("{}", EMPTY_EXPORT_MESSAGE)]
    Empty,

    #[error("failed to encode csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn dependency(name: impl Into<String>) -> Self {
        Self::DependencyUnavailable(name.into())
    }
}
