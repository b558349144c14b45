//! Infrastructure layer: catalog adapters and configuration.

pub mod catalog;
pub mod config;

pub use catalog::InMemoryRentalCatalog;
pub use config::{ConfigError, PriceUpdateConfig};
