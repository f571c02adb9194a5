//! Row formatters for the two output shapes.

pub mod catalog;
pub mod headers;
pub mod product_fields;
pub mod raw;

pub use catalog::format_product_rows;
pub use headers::{CATALOG_HEADERS, CONFIGURATION_PRICE_HEADER, RAW_HEADERS, catalog_headers, raw_headers};
pub use raw::format_raw_row;
