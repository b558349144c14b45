//! Configuration loading from the process environment.
//!
//! `RENTPRICE_LOG` feeds [`PriceUpdateConfig::init_tracing`].
//!
//! | variable | default |
//! |---|---|
//! | `RENTPRICE_DEFAULT_CURRENCY` | `USD` |
//! | `RENTPRICE_DEFAULT_ROUNDING` | `1` |
//! | `RENTPRICE_LOG` | `info` |

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use rentprice_core::Currency;
use rentprice_rental::SessionDefaults;

pub const CURRENCY_VAR: &str = "RENTPRICE_DEFAULT_CURRENCY";
pub const ROUNDING_VAR: &str = "RENTPRICE_DEFAULT_ROUNDING";
pub const LOG_VAR: &str = "RENTPRICE_LOG";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for price update sessions created by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdateConfig {
    pub default_currency: Currency,
    pub default_rounding: Decimal,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl PriceUpdateConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map instead of the env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let currency_raw = lookup(CURRENCY_VAR).unwrap_or_else(|| "USD".to_string());
        let default_currency = Currency::new(&currency_raw).map_err(|_| ConfigError::Invalid {
            key: CURRENCY_VAR,
            value: currency_raw.clone(),
        })?;

        let rounding_raw = lookup(ROUNDING_VAR).unwrap_or_else(|| "1".to_string());
        let mut default_rounding =
            Decimal::from_str(rounding_raw.trim()).map_err(|_| ConfigError::Invalid {
                key: ROUNDING_VAR,
                value: rounding_raw.clone(),
            })?;
        if default_rounding < Decimal::ZERO {
            warn!(rounding = %default_rounding, "negative default rounding clamped to zero");
            default_rounding = Decimal::ZERO;
        }

        let log_filter = lookup(LOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            default_currency,
            default_rounding,
            log_filter,
        })
    }

    pub fn session_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            rounding: self.default_rounding,
            ..SessionDefaults::new(self.default_currency.clone())
        }
    }

    /// Install the JSON subscriber with `log_filter`.
    ///
    /// Returns `false` when a global subscriber is already installed.
    pub fn init_tracing(&self) -> bool {
        rentprice_observability::init_with_filter(&self.log_filter)
    }
}
