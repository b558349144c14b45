//! Price update session: load → compute → commit.
//!
//! The session is transient. It lives for as long as the host keeps the form
//! open and only touches persistent data in [`PriceUpdateSession::commit`].

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rentprice_core::{Currency, DomainError, DomainResult, PricelistId, PricingRuleId, ProductId};

use crate::catalog::{NewPricingRule, PricingRule, Product, RentalCatalog, RentalUnit};
use crate::rounding::reprice;

const WARNING_TITLE: &str = "Warning";
const DUPLICATE_NAME_MESSAGE: &str = "There is already a price list with that name!";
const NEGATIVE_ROUNDING_MESSAGE: &str = "The rounding factor cannot be negative!";
const ZERO_ROUNDING_MESSAGE: &str = "With a rounding factor of zero every new price is zero!";

/// Values applied when the session has to make up line data itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDefaults {
    /// Currency of lines built from bare products.
    pub currency: Currency,
    /// Initial rounding precision.
    pub rounding: Decimal,
    pub duration: u32,
    pub unit: RentalUnit,
}

impl SessionDefaults {
    /// One day, rounded to whole units, in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            rounding: Decimal::ONE,
            duration: 1,
            unit: RentalUnit::Day,
        }
    }
}

/// Which kind of price list the session writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    New,
    Existing,
}

/// Commit destination. Only the field of the active mode exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PricelistTarget {
    New { name: Option<String> },
    Existing { pricelist_id: Option<PricelistId> },
}

impl PricelistTarget {
    pub fn empty(mode: UpdateMode) -> Self {
        match mode {
            UpdateMode::New => PricelistTarget::New { name: None },
            UpdateMode::Existing => PricelistTarget::Existing { pricelist_id: None },
        }
    }

    pub fn mode(&self) -> UpdateMode {
        match self {
            PricelistTarget::New { .. } => UpdateMode::New,
            PricelistTarget::Existing { .. } => UpdateMode::Existing,
        }
    }
}

impl Default for PricelistTarget {
    fn default() -> Self {
        Self::empty(UpdateMode::New)
    }
}

/// Non-blocking notice for the host form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub title: String,
    pub message: String,
}

impl Warning {
    fn new(message: &str) -> Self {
        Self {
            title: WARNING_TITLE.to_string(),
            message: message.to_string(),
        }
    }
}

/// Pricing rule a line was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRule {
    pub id: PricingRuleId,
    pub pricelist_id: PricelistId,
}

/// One product × duration × unit row of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub product_id: ProductId,
    pub product_name: String,
    pub existing_rule: Option<ExistingRule>,
    pub duration: u32,
    pub unit: RentalUnit,
    pub currency: Currency,
    pub actual_price: Decimal,
    pub new_price: Decimal,
}

impl Line {
    fn from_rule(rule: PricingRule, product_name: String) -> Self {
        Self {
            product_id: rule.product_id,
            product_name,
            existing_rule: Some(ExistingRule {
                id: rule.id,
                pricelist_id: rule.pricelist_id,
            }),
            duration: rule.duration,
            unit: rule.unit,
            currency: rule.currency,
            actual_price: rule.price,
            new_price: Decimal::ZERO,
        }
    }

    fn fresh(product: Product, defaults: &SessionDefaults) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name,
            existing_rule: None,
            duration: defaults.duration,
            unit: defaults.unit,
            currency: defaults.currency.clone(),
            actual_price: Decimal::ZERO,
            new_price: Decimal::ZERO,
        }
    }

    /// Whether commit will write this line.
    pub fn is_priced(&self) -> bool {
        self.new_price > Decimal::ZERO
    }
}

/// Result of [`PriceUpdateSession::compute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeOutcome {
    pub repriced: usize,
    pub skipped: usize,
    pub warning: Option<Warning>,
}

/// Result of [`PriceUpdateSession::commit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Price list written into; `None` when there was nothing to commit.
    pub pricelist_id: Option<PricelistId>,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Bulk rental price update over an injected catalog.
#[derive(Debug)]
pub struct PriceUpdateSession<C> {
    catalog: C,
    defaults: SessionDefaults,
    target: PricelistTarget,
    source_pricelist: Option<PricelistId>,
    percentage: Decimal,
    rounding: Decimal,
    confirmable: bool,
    lines: Vec<Line>,
}

impl<C: RentalCatalog> PriceUpdateSession<C> {
    pub fn new(catalog: C, currency: Currency) -> Self {
        Self::with_defaults(catalog, SessionDefaults::new(currency))
    }

    pub fn with_defaults(catalog: C, defaults: SessionDefaults) -> Self {
        let rounding = defaults.rounding.max(Decimal::ZERO);
        Self {
            catalog,
            defaults,
            target: PricelistTarget::default(),
            source_pricelist: None,
            percentage: Decimal::ZERO,
            rounding,
            confirmable: false,
            lines: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn target(&self) -> &PricelistTarget {
        &self.target
    }

    pub fn source_pricelist(&self) -> Option<PricelistId> {
        self.source_pricelist
    }

    pub fn percentage(&self) -> Decimal {
        self.percentage
    }

    pub fn rounding(&self) -> Decimal {
        self.rounding
    }

    /// True once prices have been computed and not invalidated since.
    pub fn is_confirmable(&self) -> bool {
        self.confirmable
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Switch between writing into a new or an existing price list.
    ///
    /// Moving to the other mode drops whatever was entered for the previous one.
    pub fn set_update_mode(&mut self, mode: UpdateMode) {
        if self.target.mode() != mode {
            debug!(?mode, "update mode switched");
            self.target = PricelistTarget::empty(mode);
        }
    }

    /// Name the price list to create. Warns when the name is already taken.
    pub fn set_new_pricelist_name(&mut self, name: &str) -> DomainResult<Option<Warning>> {
        if self.target.mode() != UpdateMode::New {
            return Err(DomainError::validation(
                "a new price list name only applies when creating a new price list",
            ));
        }

        let name = name.trim();
        if name.is_empty() {
            self.target = PricelistTarget::New { name: None };
            return Ok(None);
        }

        let taken = self.catalog.find_pricelist_by_name(name)?.is_some();
        self.target = PricelistTarget::New {
            name: Some(name.to_string()),
        };

        if taken {
            warn!(name, "price list name already in use");
            return Ok(Some(Warning::new(DUPLICATE_NAME_MESSAGE)));
        }
        Ok(None)
    }

    pub fn select_existing_pricelist(&mut self, pricelist_id: PricelistId) -> DomainResult<()> {
        if self.target.mode() != UpdateMode::Existing {
            return Err(DomainError::validation(
                "select existing price list mode before choosing a price list",
            ));
        }
        self.target = PricelistTarget::Existing {
            pricelist_id: Some(pricelist_id),
        };
        Ok(())
    }

    pub fn set_source_pricelist(&mut self, source: Option<PricelistId>) {
        self.source_pricelist = source;
    }

    pub fn set_percentage(&mut self, percentage: Decimal) {
        self.percentage = percentage;
    }

    /// Set the rounding precision. Negative input is clamped to zero.
    pub fn set_rounding(&mut self, rounding: Decimal) -> Option<Warning> {
        if rounding < Decimal::ZERO {
            warn!(%rounding, "negative rounding clamped to zero");
            self.rounding = Decimal::ZERO;
            return Some(Warning::new(NEGATIVE_ROUNDING_MESSAGE));
        }
        self.rounding = rounding;
        None
    }

    /// Replace the lines with the candidates for this update.
    ///
    /// With a source price list, one line per rule of that list whose product is
    /// in `candidates`; no such rule is [`DomainError::NoCandidates`]. Without a
    /// source, one unpriced line per rentable product. On error the previously
    /// loaded lines are kept.
    pub fn load(
        &mut self,
        source: Option<PricelistId>,
        candidates: &[ProductId],
    ) -> DomainResult<&[Line]> {
        let lines = match source {
            Some(pricelist_id) => self.lines_from_pricelist(pricelist_id, candidates)?,
            None => self
                .catalog
                .rentable_products()?
                .into_iter()
                .map(|product| Line::fresh(product, &self.defaults))
                .collect(),
        };

        info!(
            source = ?source,
            candidates = candidates.len(),
            lines = lines.len(),
            "rental products loaded"
        );

        self.source_pricelist = source;
        self.lines = lines;
        self.confirmable = false;
        Ok(&self.lines)
    }

    fn lines_from_pricelist(
        &self,
        pricelist_id: PricelistId,
        candidates: &[ProductId],
    ) -> DomainResult<Vec<Line>> {
        let rules = self.catalog.pricing_rules(pricelist_id, candidates)?;
        if rules.is_empty() {
            return Err(DomainError::NoCandidates);
        }

        let mut product_ids: Vec<ProductId> = rules.iter().map(|r| r.product_id).collect();
        product_ids.sort();
        product_ids.dedup();

        let names: HashMap<ProductId, String> = self
            .catalog
            .products(&product_ids)?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(rules
            .into_iter()
            .map(|rule| {
                let name = names
                    .get(&rule.product_id)
                    .cloned()
                    .unwrap_or_else(|| rule.product_id.to_string());
                Line::from_rule(rule, name)
            })
            .collect())
    }

    /// Overwrite the current price of one line (e.g. to price a fresh product).
    ///
    /// Clears that line's computed price; prices must be computed again before
    /// committing.
    pub fn set_actual_price(&mut self, index: usize, price: Decimal) -> DomainResult<()> {
        if price < Decimal::ZERO {
            return Err(DomainError::validation("actual price cannot be negative"));
        }
        let line = self
            .lines
            .get_mut(index)
            .ok_or_else(|| DomainError::validation(format!("no line at index {index}")))?;

        line.actual_price = price;
        line.new_price = Decimal::ZERO;
        self.confirmable = false;
        Ok(())
    }

    /// Apply `percentage` and `rounding` to every line with a positive current price.
    ///
    /// Lines without a current price keep a zero new price. A zero rounding
    /// precision prices every line at zero, with a warning. Afterwards the
    /// session is confirmable. A price that does not fit in a `Decimal` is a
    /// validation error and leaves the lines untouched.
    pub fn compute(
        &mut self,
        percentage: Decimal,
        rounding: Decimal,
    ) -> DomainResult<ComputeOutcome> {
        let warning = self.set_rounding(rounding).or_else(|| {
            if self.rounding.is_zero() {
                warn!("zero rounding precision, no prices will be set");
                Some(Warning::new(ZERO_ROUNDING_MESSAGE))
            } else {
                None
            }
        });

        let mut new_prices = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            if line.actual_price > Decimal::ZERO {
                let price = reprice(line.actual_price, percentage, self.rounding)
                    .ok_or_else(|| {
                        DomainError::validation(format!(
                            "new price for {} is out of range",
                            line.product_name
                        ))
                    })?;
                new_prices.push(Some(price));
            } else {
                new_prices.push(None);
            }
        }

        self.percentage = percentage;
        let mut repriced = 0;
        let mut skipped = 0;
        for (line, price) in self.lines.iter_mut().zip(new_prices) {
            match price {
                Some(price) => {
                    line.new_price = price;
                    repriced += 1;
                }
                None => skipped += 1,
            }
        }
        self.confirmable = true;

        info!(
            percentage = %self.percentage,
            rounding = %self.rounding,
            repriced,
            skipped,
            "rental prices computed"
        );

        Ok(ComputeOutcome {
            repriced,
            skipped,
            warning,
        })
    }

    /// Write the computed prices into the target price list.
    ///
    /// Lines whose loaded rule already belongs to the target list are updated in
    /// place; every other priced line gets a new rule. Unpriced lines are
    /// skipped. A new-list target creates the list first, even when no line
    /// ends up priced. Catalog errors are returned as-is, possibly after some
    /// writes went through; rolling those back is up to the catalog.
    pub fn commit(&mut self) -> DomainResult<CommitSummary> {
        if !self.confirmable {
            return Err(DomainError::validation(
                "compute new prices before confirming",
            ));
        }

        if self.lines.is_empty() {
            info!("nothing to commit");
            return Ok(CommitSummary {
                pricelist_id: None,
                created: 0,
                updated: 0,
                skipped: 0,
            });
        }

        let pricelist_id = self.resolve_target()?;

        let mut created = 0;
        let mut updated = 0;
        let mut skipped = 0;
        for line in &self.lines {
            if !line.is_priced() {
                skipped += 1;
                continue;
            }

            match line.existing_rule {
                Some(rule) if rule.pricelist_id == pricelist_id => {
                    self.catalog
                        .update_pricing_rule_price(rule.id, line.new_price)?;
                    updated += 1;
                }
                _ => {
                    self.catalog.create_pricing_rule(NewPricingRule {
                        product_id: line.product_id,
                        pricelist_id,
                        duration: line.duration,
                        unit: line.unit,
                        currency: line.currency.clone(),
                        price: line.new_price,
                    })?;
                    created += 1;
                }
            }
        }

        self.confirmable = false;

        info!(
            pricelist = %pricelist_id,
            created,
            updated,
            skipped,
            "rental prices committed"
        );

        Ok(CommitSummary {
            pricelist_id: Some(pricelist_id),
            created,
            updated,
            skipped,
        })
    }

    fn resolve_target(&self) -> DomainResult<PricelistId> {
        match &self.target {
            PricelistTarget::New { name: Some(name) } => {
                let pricelist = self.catalog.create_pricelist(name)?;
                info!(pricelist = %pricelist.id, name = %pricelist.name, "price list created");
                Ok(pricelist.id)
            }
            PricelistTarget::New { name: None } => Err(DomainError::validation(
                "enter a name for the new price list",
            )),
            PricelistTarget::Existing {
                pricelist_id: Some(id),
            } => Ok(*id),
            PricelistTarget::Existing { pricelist_id: None } => Err(DomainError::validation(
                "select the price list to update",
            )),
        }
    }
}
