//! `rentprice-core` — shared building blocks for the rental price update tooling.
//!
//! Pure domain primitives only: identifiers, currency codes and the error model.
//! Nothing in here talks to a catalog or a database.

pub mod currency;
pub mod error;
pub mod id;

pub use currency::Currency;
pub use error::{CatalogError, CatalogResult, DomainError, DomainResult};
pub use id::{PricelistId, PricingRuleId, ProductId};
