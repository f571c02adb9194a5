//! Process-wide logging setup shared by the export binaries and tests.

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(DEFAULT_FILTER);
}

/// Like [`init`] with an explicit fallback filter (e.g. `"debug"` to see
/// skipped presets).
pub fn init_with_default(filter: &str) {
    tracing::init(filter);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
