//! `preset-export-core`: shared building blocks for the preset export.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no storage):
//! typed identifiers, the domain error model, price formatting, slugs and
//! weight conversion.

pub mod error;
pub mod id;
pub mod money;
pub mod slug;
pub mod weight;

pub use error::{DomainError, DomainResult};
pub use id::{PresetId, ProductId};
pub use money::{MAX_PRICE_DECIMALS, PriceFormat};
pub use slug::{slugify_value, strip_tags, title_slug};
pub use weight::WeightUnit;

pub use rust_decimal::Decimal;
