//! Runtime configuration read from the environment.

use std::path::PathBuf;

use thiserror::Error;

use preset_export_core::{MAX_PRICE_DECIMALS, PriceFormat, WeightUnit};
use preset_export_pipeline::ExportSettings;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// JSON catalog snapshot; unset leaves exports unavailable.
    pub catalog_path: Option<PathBuf>,
    pub settings: ExportSettings,
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}

impl ApiConfig {
    /// Read the process environment (call `dotenvy::dotenv()` first to pick
    /// up a `.env` file).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let mut settings = ExportSettings::default();
        if let Some(raw) = var("PRICE_DECIMALS") {
            let decimals = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|decimals| *decimals <= MAX_PRICE_DECIMALS)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "PRICE_DECIMALS",
                    value: raw.clone(),
                })?;
            settings.price_format = PriceFormat::new(decimals);
        }
        if let Some(raw) = var("WEIGHT_UNIT") {
            settings.weight_unit = WeightUnit::from_setting(&raw);
        }
        if let Some(raw) = var("EXTRA_PRICE_OVERRIDES_PRODUCT_PRICE") {
            settings.extra_price_overrides_product_price =
                parse_bool("EXTRA_PRICE_OVERRIDES_PRODUCT_PRICE", &raw)?;
        }
        if let Some(name) = var("STORE_NAME") {
            settings.store_name = name.trim().to_string();
        }

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            jwt_secret,
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            settings,
        })
    }
}
