use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use rentprice_core::{
    CatalogError, CatalogResult, Currency, PricelistId, PricingRuleId, ProductId,
};
use rentprice_rental::{NewPricingRule, Pricelist, PricingRule, Product, RentalCatalog, RentalUnit};

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Product>,
    pricelists: Vec<Pricelist>,
    rules: Vec<PricingRule>,
}

/// In-memory rental catalog.
///
/// Intended for tests/dev. Records are kept in insertion order so loads are
/// stable; lookups are linear scans.
#[derive(Debug, Default)]
pub struct InMemoryRentalCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryRentalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CatalogResult<RwLockReadGuard<'_, CatalogState>> {
        self.state
            .read()
            .map_err(|_| CatalogError::unavailable("lock poisoned"))
    }

    fn write(&self) -> CatalogResult<RwLockWriteGuard<'_, CatalogState>> {
        self.state
            .write()
            .map_err(|_| CatalogError::unavailable("lock poisoned"))
    }

    /// Seed a product template.
    pub fn add_product(&self, name: &str, rent_ok: bool) -> CatalogResult<ProductId> {
        let id = ProductId::new();
        self.write()?.products.push(Product {
            id,
            name: name.to_string(),
            rent_ok,
        });
        Ok(id)
    }

    /// Seed a price list.
    pub fn add_pricelist(&self, name: &str) -> CatalogResult<PricelistId> {
        Ok(self.create_pricelist(name)?.id)
    }

    /// Seed a pricing rule.
    pub fn add_rule(
        &self,
        product_id: ProductId,
        pricelist_id: PricelistId,
        duration: u32,
        unit: RentalUnit,
        currency: Currency,
        price: Decimal,
    ) -> CatalogResult<PricingRuleId> {
        let rule = self.create_pricing_rule(NewPricingRule {
            product_id,
            pricelist_id,
            duration,
            unit,
            currency,
            price,
        })?;
        Ok(rule.id)
    }

    pub fn rule(&self, rule_id: PricingRuleId) -> CatalogResult<Option<PricingRule>> {
        Ok(self.read()?.rules.iter().find(|r| r.id == rule_id).cloned())
    }

    /// Every rule under `pricelist_id`, in creation order.
    pub fn rules_in(&self, pricelist_id: PricelistId) -> CatalogResult<Vec<PricingRule>> {
        Ok(self
            .read()?
            .rules
            .iter()
            .filter(|r| r.pricelist_id == pricelist_id)
            .cloned()
            .collect())
    }

    pub fn pricelists(&self) -> CatalogResult<Vec<Pricelist>> {
        Ok(self.read()?.pricelists.clone())
    }
}

impl RentalCatalog for InMemoryRentalCatalog {
    fn rentable_products(&self) -> CatalogResult<Vec<Product>> {
        Ok(self
            .read()?
            .products
            .iter()
            .filter(|p| p.rent_ok)
            .cloned()
            .collect())
    }

    fn products(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        Ok(self
            .read()?
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn pricing_rules(
        &self,
        pricelist_id: PricelistId,
        products: &[ProductId],
    ) -> CatalogResult<Vec<PricingRule>> {
        Ok(self
            .read()?
            .rules
            .iter()
            .filter(|r| r.pricelist_id == pricelist_id && products.contains(&r.product_id))
            .cloned()
            .collect())
    }

    fn find_pricelist_by_name(&self, name: &str) -> CatalogResult<Option<Pricelist>> {
        Ok(self
            .read()?
            .pricelists
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    fn create_pricelist(&self, name: &str) -> CatalogResult<Pricelist> {
        let pricelist = Pricelist {
            id: PricelistId::new(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.write()?.pricelists.push(pricelist.clone());
        debug!(pricelist = %pricelist.id, name, "price list stored");
        Ok(pricelist)
    }

    fn create_pricing_rule(&self, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        let mut state = self.write()?;

        if !state.pricelists.iter().any(|p| p.id == rule.pricelist_id) {
            return Err(CatalogError::not_found("price list", rule.pricelist_id));
        }
        if !state.products.iter().any(|p| p.id == rule.product_id) {
            return Err(CatalogError::not_found("product", rule.product_id));
        }

        let stored = PricingRule {
            id: PricingRuleId::new(),
            product_id: rule.product_id,
            pricelist_id: rule.pricelist_id,
            duration: rule.duration,
            unit: rule.unit,
            currency: rule.currency,
            price: rule.price,
        };
        state.rules.push(stored.clone());
        Ok(stored)
    }

    fn update_pricing_rule_price(
        &self,
        rule_id: PricingRuleId,
        price: Decimal,
    ) -> CatalogResult<()> {
        let mut state = self.write()?;
        let rule = state
            .rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| CatalogError::not_found("pricing rule", rule_id))?;
        rule.price = price;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd() -> Currency {
        Currency::new("USD").unwrap()
    }

    #[test]
    fn rentable_products_filters_and_keeps_order() {
        let catalog = InMemoryRentalCatalog::new();
        catalog.add_product("Scaffold", true).unwrap();
        catalog.add_product("Consulting", false).unwrap();
        catalog.add_product("Generator", true).unwrap();

        let names: Vec<String> = catalog
            .rentable_products()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Scaffold", "Generator"]);
    }

    #[test]
    fn pricing_rules_are_scoped_to_list_and_products() {
        let catalog = InMemoryRentalCatalog::new();
        let a = catalog.add_product("A", true).unwrap();
        let b = catalog.add_product("B", true).unwrap();
        let public = catalog.add_pricelist("Public").unwrap();
        let vip = catalog.add_pricelist("VIP").unwrap();
        catalog.add_rule(a, public, 1, RentalUnit::Day, usd(), dec!(10)).unwrap();
        catalog.add_rule(b, public, 1, RentalUnit::Week, usd(), dec!(50)).unwrap();
        catalog.add_rule(a, vip, 1, RentalUnit::Day, usd(), dec!(8)).unwrap();

        let rules = catalog.pricing_rules(public, &[a]).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].price, dec!(10));

        assert!(catalog.pricing_rules(vip, &[b]).unwrap().is_empty());
        assert_eq!(catalog.rules_in(public).unwrap().len(), 2);
    }

    #[test]
    fn update_changes_price_only() {
        let catalog = InMemoryRentalCatalog::new();
        let a = catalog.add_product("A", true).unwrap();
        let list = catalog.add_pricelist("Public").unwrap();
        let rule_id = catalog
            .add_rule(a, list, 4, RentalUnit::Hour, usd(), dec!(12))
            .unwrap();

        catalog.update_pricing_rule_price(rule_id, dec!(15)).unwrap();

        let rule = catalog.rule(rule_id).unwrap().unwrap();
        assert_eq!(rule.price, dec!(15));
        assert_eq!(rule.duration, 4);
        assert_eq!(rule.unit, RentalUnit::Hour);
    }

    #[test]
    fn writes_against_unknown_records_fail() {
        let catalog = InMemoryRentalCatalog::new();
        let a = catalog.add_product("A", true).unwrap();

        let err = catalog
            .add_rule(a, PricelistId::new(), 1, RentalUnit::Day, usd(), dec!(1))
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: "price list", .. }));

        let err = catalog
            .update_pricing_rule_price(PricingRuleId::new(), dec!(1))
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: "pricing rule", .. }));
    }

    #[test]
    fn find_pricelist_by_name_is_exact() {
        let catalog = InMemoryRentalCatalog::new();
        catalog.add_pricelist("Summer").unwrap();

        assert!(catalog.find_pricelist_by_name("Summer").unwrap().is_some());
        assert!(catalog.find_pricelist_by_name("summer").unwrap().is_none());
        assert_eq!(catalog.pricelists().unwrap().len(), 1);
    }
}
