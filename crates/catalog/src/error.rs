use thiserror::Error;

/// Failure loading a catalog snapshot.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}
