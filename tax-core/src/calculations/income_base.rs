//! Taxable base and profit-based taxes.
//!
//! | Item                    | Formula |
//! |-------------------------|---------|
//! | Corporate Income Tax    | base × 15% (× 0.96 with the incentive) |
//! | Corporate Income Surtax | max(0, base − 20000) × 10%, only if positive |
//! | Social Contribution Tax | base × 9% (12% for non-service presumed margins) |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalculationError;
use super::common::{format_percent, non_negative, round_half_up};
use crate::{TaxLineItem, TaxRates};

pub const CORPORATE_INCOME_TAX: &str = "Corporate Income Tax";
pub const CORPORATE_INCOME_SURTAX: &str = "Corporate Income Surtax";
pub const SOCIAL_CONTRIBUTION_TAX: &str = "Social Contribution Tax";

/// The taxable base together with the social contribution rate that
/// applies to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBase {
    pub amount: Decimal,
    pub social_contribution_rate: Decimal,
}

impl IncomeBase {
    /// Revenue minus costs minus the gross (pre-credit) revenue taxes.
    pub fn actual_profit(
        revenue: Decimal,
        cost: Decimal,
        revenue_tax_debits: Decimal,
        rates: &TaxRates,
    ) -> Self {
        Self {
            amount: round_half_up(non_negative(revenue - cost.abs() - revenue_tax_debits)),
            social_contribution_rate: rates.social_contribution,
        }
    }

    /// Revenue times the presumed margin percentage.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::Overflow`] when the base cannot be
    /// represented.
    pub fn presumed_margin(
        revenue: Decimal,
        margin_percent: Decimal,
        rates: &TaxRates,
    ) -> Result<Self, CalculationError> {
        let social_contribution_rate = if margin_percent == rates.services_presumed_margin_percent
        {
            rates.social_contribution
        } else {
            rates.social_contribution_presumed_other
        };

        let amount = (margin_percent / Decimal::ONE_HUNDRED)
            .checked_mul(revenue)
            .ok_or(CalculationError::Overflow("presumed margin base"))?;

        Ok(Self {
            amount: round_half_up(non_negative(amount)),
            social_contribution_rate,
        })
    }
}

/// Produces the profit-based line items for an [`IncomeBase`].
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxCalculator<'a> {
    rates: &'a TaxRates,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(rates: &'a TaxRates) -> Self {
        Self { rates }
    }

    /// Corporate income tax, optional surtax and social contribution.
    ///
    /// `incentive` must already account for regime and epoch eligibility.
    pub fn items(
        &self,
        base: &IncomeBase,
        incentive: bool,
    ) -> Vec<TaxLineItem> {
        let mut corporate_rate = self.rates.corporate_income;
        if incentive {
            corporate_rate *= self.rates.incentive_factor;
        }

        let mut items = vec![
            TaxLineItem::on_result(CORPORATE_INCOME_TAX, base.amount * corporate_rate)
                .with_rate(format_percent(corporate_rate)),
        ];

        let surtax = self.surtax(base.amount);
        if surtax > Decimal::ZERO {
            items.push(
                TaxLineItem::on_result(CORPORATE_INCOME_SURTAX, surtax)
                    .with_rate(format_percent(self.rates.surtax)),
            );
        }

        items.push(
            TaxLineItem::on_result(
                SOCIAL_CONTRIBUTION_TAX,
                base.amount * base.social_contribution_rate,
            )
            .with_rate(format_percent(base.social_contribution_rate)),
        );

        items
    }

    fn surtax(
        &self,
        base: Decimal,
    ) -> Decimal {
        round_half_up(non_negative(base - self.rates.surtax_threshold) * self.rates.surtax)
    }
}
