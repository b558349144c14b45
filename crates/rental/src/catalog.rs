//! Catalog records and the catalog/pricing service seam.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rentprice_core::{CatalogResult, Currency, PricelistId, PricingRuleId, ProductId};

/// Billing period unit of a rental pricing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalUnit {
    Hour,
    Day,
    Week,
    Month,
}

impl RentalUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalUnit::Hour => "hour",
            RentalUnit::Day => "day",
            RentalUnit::Week => "week",
            RentalUnit::Month => "month",
        }
    }
}

impl core::fmt::Display for RentalUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product template as seen by the price update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Available for rental.
    pub rent_ok: bool,
}

/// Named collection of rental pricing rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricelist {
    pub id: PricelistId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A (product, duration, unit, currency, price) tuple under one price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: PricingRuleId,
    pub product_id: ProductId,
    pub pricelist_id: PricelistId,
    pub duration: u32,
    pub unit: RentalUnit,
    pub currency: Currency,
    pub price: Decimal,
}

/// Values for a pricing rule that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPricingRule {
    pub product_id: ProductId,
    pub pricelist_id: PricelistId,
    pub duration: u32,
    pub unit: RentalUnit,
    pub currency: Currency,
    pub price: Decimal,
}

/// Catalog/pricing service the session reads from and writes into.
///
/// Writes take `&self`: implementations own their synchronization (or
/// transaction) the same way a host persistence layer does. Errors are handed
/// back to the caller as-is; the session never retries.
pub trait RentalCatalog {
    /// All products flagged as rentable, in a stable order.
    fn rentable_products(&self) -> CatalogResult<Vec<Product>>;

    /// Products with the given ids. Unknown ids are left out.
    fn products(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>>;

    /// Rules under `pricelist_id` whose product is one of `products`.
    fn pricing_rules(
        &self,
        pricelist_id: PricelistId,
        products: &[ProductId],
    ) -> CatalogResult<Vec<PricingRule>>;

    /// First price list whose name equals `name` exactly.
    fn find_pricelist_by_name(&self, name: &str) -> CatalogResult<Option<Pricelist>>;

    fn create_pricelist(&self, name: &str) -> CatalogResult<Pricelist>;

    fn create_pricing_rule(&self, rule: NewPricingRule) -> CatalogResult<PricingRule>;

    fn update_pricing_rule_price(&self, rule_id: PricingRuleId, price: Decimal)
    -> CatalogResult<()>;
}

impl<C> RentalCatalog for Arc<C>
where
    C: RentalCatalog + ?Sized,
{
    fn rentable_products(&self) -> CatalogResult<Vec<Product>> {
        (**self).rentable_products()
    }

    fn products(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        (**self).products(ids)
    }

    fn pricing_rules(
        &self,
        pricelist_id: PricelistId,
        products: &[ProductId],
    ) -> CatalogResult<Vec<PricingRule>> {
        (**self).pricing_rules(pricelist_id, products)
    }

    fn find_pricelist_by_name(&self, name: &str) -> CatalogResult<Option<Pricelist>> {
        (**self).find_pricelist_by_name(name)
    }

    fn create_pricelist(&self, name: &str) -> CatalogResult<Pricelist> {
        (**self).create_pricelist(name)
    }

    fn create_pricing_rule(&self, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        (**self).create_pricing_rule(rule)
    }

    fn update_pricing_rule_price(
        &self,
        rule_id: PricingRuleId,
        price: Decimal,
    ) -> CatalogResult<()> {
        (**self).update_pricing_rule_price(rule_id, price)
    }
}

impl<C> RentalCatalog for &C
where
    C: RentalCatalog + ?Sized,
{
    fn rentable_products(&self) -> CatalogResult<Vec<Product>> {
        (**self).rentable_products()
    }

    fn products(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        (**self).products(ids)
    }

    fn pricing_rules(
        &self,
        pricelist_id: PricelistId,
        products: &[ProductId],
    ) -> CatalogResult<Vec<PricingRule>> {
        (**self).pricing_rules(pricelist_id, products)
    }

    fn find_pricelist_by_name(&self, name: &str) -> CatalogResult<Option<Pricelist>> {
        (**self).find_pricelist_by_name(name)
    }

    fn create_pricelist(&self, name: &str) -> CatalogResult<Pricelist> {
        (**self).create_pricelist(name)
    }

    fn create_pricing_rule(&self, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        (**self).create_pricing_rule(rule)
    }

    fn update_pricing_rule_price(
        &self,
        rule_id: PricingRuleId,
        price: Decimal,
    ) -> CatalogResult<()> {
        (**self).update_pricing_rule_price(rule_id, price)
    }
}
