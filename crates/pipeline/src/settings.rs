use serde::{Deserialize, Serialize};

use preset_export_core::{PriceFormat, WeightUnit};

/// Store-level settings that shape every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub price_format: PriceFormat,
    /// Unit product weights are recorded in.
    pub weight_unit: WeightUnit,
    /// When set, a variant costs its option extras only (no base price).
    pub extra_price_overrides_product_price: bool,
    /// Vendor fallback when no vendor attribute is set.
    pub store_name: String,
    /// Product attributes checked, in order, for a vendor name.
    pub vendor_attributes: Vec<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            price_format: PriceFormat::default(),
            weight_unit: WeightUnit::default(),
            extra_price_overrides_product_price: false,
            store_name: String::new(),
            vendor_attributes: vec![
                "pa_brand".to_string(),
                "pa_vendor".to_string(),
                "pa_manufacturer".to_string(),
            ],
        }
    }
}
