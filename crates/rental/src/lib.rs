//! Rental price update (bulk repricing) module.
//!
//! A [`PriceUpdateSession`] loads rental products (optionally from an existing
//! price list), computes marked-up prices and writes them into a new or an
//! existing price list. All reads and writes go through the injected
//! [`RentalCatalog`]; the session itself holds no storage.

pub mod catalog;
pub mod rounding;
pub mod session;

pub use catalog::{NewPricingRule, Pricelist, PricingRule, Product, RentalCatalog, RentalUnit};
pub use rounding::{markup_factor, reprice, round_to_precision};
pub use session::{
    CommitSummary, ComputeOutcome, ExistingRule, Line, PriceUpdateSession, PricelistTarget,
    SessionDefaults, UpdateMode, Warning,
};
