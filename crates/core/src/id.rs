//! Strongly-typed identifiers used across the export.
//!
//! Presets and products are owned by the host catalog, which numbers them
//! with positive integers. Zero is never a valid id.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a saved preset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetId(u64);

/// Identifier of a catalog (parent) product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

macro_rules! impl_u64_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier, rejecting zero.
            pub fn new(value: u64) -> Option<Self> {
                (value > 0).then_some(Self(value))
            }

            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Self::new(value)
                    .ok_or_else(|| DomainError::invalid_id(format!("{}: must be positive", $name)))
            }
        }
    };
}

impl_u64_newtype!(PresetId, "PresetId");
impl_u64_newtype!(ProductId, "ProductId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_an_id() {
        assert!(PresetId::new(0).is_none());
        assert!("0".parse::<ProductId>().is_err());
    }

    #[test]
    fn parses_trimmed_positive_values() {
        let id: PresetId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_garbage() {
        let err = "abc".parse::<PresetId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("PresetId")),
            _ => panic!("Expected InvalidId"),
        }
    }
}
