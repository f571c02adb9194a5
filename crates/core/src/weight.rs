//! Store weight units and conversion to grams.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Unit the host store records product weights in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Grams,
    Kilograms,
    Pounds,
    Ounces,
    /// Any unit the export does not know; values pass through as grams.
    Unknown,
}

impl WeightUnit {
    /// Lenient parse used for store settings (unknown strings map to `Unknown`).
    pub fn from_setting(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "g" => Self::Grams,
            "kg" => Self::Kilograms,
            "lb" | "lbs" => Self::Pounds,
            "oz" => Self::Ounces,
            _ => Self::Unknown,
        }
    }

    fn grams_per_unit(&self) -> Decimal {
        match self {
            Self::Grams | Self::Unknown => Decimal::ONE,
            Self::Kilograms => Decimal::from(1000),
            Self::Pounds => Decimal::new(45_359_237, 5),
            Self::Ounces => Decimal::new(283_495_231, 7),
        }
    }

    /// Label written to the `Variant Weight Unit` column.
    pub fn catalog_label(&self) -> &'static str {
        match self {
            Self::Grams | Self::Unknown => "g",
            Self::Kilograms => "kg",
            Self::Pounds => "lb",
            Self::Ounces => "oz",
        }
    }

    /// Convert a weight in this unit to whole grams (half away from zero).
    ///
    /// Absent and zero weights produce `None` so the grams column stays blank,
    /// as do weights too large to convert.
    pub fn to_grams(&self, weight: Option<Decimal>) -> Option<i64> {
        let weight = weight?;
        if weight.is_zero() {
            return None;
        }
        weight
            .checked_mul(self.grams_per_unit())?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }
}

impl Default for WeightUnit {
    fn default() -> Self {
        Self::Kilograms
    }
}

impl FromStr for WeightUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_setting(s) {
            Self::Unknown => Err(DomainError::validation(format!("unknown weight unit '{s}'"))),
            unit => Ok(unit),
        }
    }
}
