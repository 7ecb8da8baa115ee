//! Debit/credit netting for consumption-style taxes.
//!
//! The debit is the rate applied to revenue; the credit is the same rate
//! applied to credit-generating costs. Only the positive difference is
//! payable. Any excess credit is reported as an informational balance.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::CreditNetting;
//!
//! let netted = CreditNetting::new(dec!(0.076))
//!     .with_credits(true)
//!     .net(dec!(100000), dec!(30000));
//!
//! assert_eq!(netted.debit, dec!(7600.00));
//! assert_eq!(netted.credit, dec!(2280.00));
//! assert_eq!(netted.payable, dec!(5320.00));
//! assert_eq!(netted.leftover, dec!(0));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{clamp_unit, non_negative, round_half_up};
use crate::TaxLineItem;

/// The netted amounts of one consumption tax.
///
/// At most one of `payable` and `leftover` is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NettedTax {
    /// Gross amount due on revenue, before credits.
    pub debit: Decimal,
    /// Credit earned on eligible costs (zero when credits are not allowed).
    pub credit: Decimal,
    pub payable: Decimal,
    /// Excess credit carried forward.
    pub leftover: Decimal,
}

impl NettedTax {
    /// Converts the pair into line items: the payable item always, plus a
    /// `"<name> Credit Balance"` item when credit is left over.
    pub fn into_items(
        self,
        name: &str,
        rate: Option<String>,
    ) -> Vec<TaxLineItem> {
        let mut payable = TaxLineItem::on_revenue(name, self.payable);
        payable.rate = rate;

        let mut items = vec![payable];
        if self.leftover > Decimal::ZERO {
            items.push(TaxLineItem::informational(
                format!("{name} Credit Balance"),
                self.leftover,
            ));
        }
        items
    }
}

/// Netting rule for one tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditNetting {
    rate: Decimal,
    credits_allowed: bool,
    scale: Decimal,
}

impl CreditNetting {
    /// A rule with credits disabled and full scale.
    pub fn new(rate: Decimal) -> Self {
        Self {
            rate,
            credits_allowed: false,
            scale: Decimal::ONE,
        }
    }

    pub fn with_credits(
        mut self,
        allowed: bool,
    ) -> Self {
        self.credits_allowed = allowed;
        self
    }

    /// Scales both debit and credit by a blending proportion in `[0, 1]`.
    pub fn scaled(
        mut self,
        proportion: Decimal,
    ) -> Self {
        self.scale = clamp_unit(proportion);
        self
    }

    /// Nets the debit on `revenue_base` against the credit on `credit_base`.
    pub fn net(
        &self,
        revenue_base: Decimal,
        credit_base: Decimal,
    ) -> NettedTax {
        let effective_rate = self.rate * self.scale;
        let debit = round_half_up(non_negative(revenue_base) * effective_rate);

        if !self.credits_allowed {
            return NettedTax {
                debit,
                credit: Decimal::ZERO,
                payable: debit,
                leftover: Decimal::ZERO,
            };
        }

        let credit = round_half_up(credit_base.abs() * effective_rate);
        NettedTax {
            debit,
            credit,
            payable: non_negative(debit - credit),
            leftover: non_negative(credit - debit),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::LineCategory;

    #[test]
    fn credits_reduce_payable() {
        let netted = CreditNetting::new(dec!(0.0165))
            .with_credits(true)
            .net(dec!(100000), dec!(30000));

        assert_eq!(netted.debit, dec!(1650.00));
        assert_eq!(netted.credit, dec!(495.00));
        assert_eq!(netted.payable, dec!(1155.00));
        assert_eq!(netted.leftover, dec!(0));
    }

    #[test]
    fn excess_credit_becomes_leftover() {
        let netted = CreditNetting::new(dec!(0.10))
            .with_credits(true)
            .net(dec!(1000), dec!(3000));

        assert_eq!(netted.payable, dec!(0));
        assert_eq!(netted.leftover, dec!(200.00));
    }

    #[test]
    fn credits_disabled_pays_full_debit() {
        let netted = CreditNetting::new(dec!(0.03)).net(dec!(100000), dec!(90000));

        assert_eq!(netted.payable, dec!(3000.00));
        assert_eq!(netted.credit, dec!(0));
        assert_eq!(netted.leftover, dec!(0));
    }

    #[test]
    fn scale_applies_to_debit_and_credit() {
        let netted = CreditNetting::new(dec!(0.177))
            .with_credits(true)
            .scaled(dec!(0.25))
            .net(dec!(100000), dec!(40000));

        assert_eq!(netted.debit, dec!(4425.00));
        assert_eq!(netted.credit, dec!(1770.00));
        assert_eq!(netted.payable, dec!(2655.00));
    }

    #[test]
    fn negative_credit_base_is_normalized() {
        let netted = CreditNetting::new(dec!(0.10))
            .with_credits(true)
            .net(dec!(1000), dec!(-400));

        assert_eq!(netted.credit, dec!(40.00));
        assert_eq!(netted.payable, dec!(60.00));
    }

    #[test]
    fn into_items_emits_balance_only_when_leftover() {
        let with_balance = CreditNetting::new(dec!(0.10))
            .with_credits(true)
            .net(dec!(1000), dec!(3000))
            .into_items("Unified Federal Tax", None);
        let without_balance = CreditNetting::new(dec!(0.10))
            .with_credits(true)
            .net(dec!(3000), dec!(1000))
            .into_items("Unified Federal Tax", Some("10%".to_string()));

        assert_eq!(with_balance.len(), 2);
        assert_eq!(with_balance[1].name, "Unified Federal Tax Credit Balance");
        assert_eq!(with_balance[1].category, LineCategory::Informational);
        assert_eq!(without_balance.len(), 1);
        assert_eq!(without_balance[0].rate.as_deref(), Some("10%"));
    }
}
