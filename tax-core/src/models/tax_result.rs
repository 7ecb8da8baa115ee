use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{max, round_half_up};

/// How a line item participates in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineCategory {
    /// Deducted from gross revenue to reach net revenue.
    OnRevenue,
    /// Deducted from the operating result to reach net income.
    OnResult,
    /// Carried-forward credit balance; never part of the total.
    Informational,
}

/// One named contribution to a [`TaxResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLineItem {
    pub name: String,
    /// Non-negative magnitude rounded to cents.
    pub value: Decimal,
    pub rate: Option<String>,
    pub category: LineCategory,
}

impl TaxLineItem {
    /// Creates an item; negative values are clamped to zero.
    pub fn new(
        name: impl Into<String>,
        value: Decimal,
        category: LineCategory,
    ) -> Self {
        Self {
            name: name.into(),
            value: round_half_up(max(value, Decimal::ZERO)),
            rate: None,
            category,
        }
    }

    pub fn on_revenue(
        name: impl Into<String>,
        value: Decimal,
    ) -> Self {
        Self::new(name, value, LineCategory::OnRevenue)
    }

    pub fn on_result(
        name: impl Into<String>,
        value: Decimal,
    ) -> Self {
        Self::new(name, value, LineCategory::OnResult)
    }

    pub fn informational(
        name: impl Into<String>,
        value: Decimal,
    ) -> Self {
        Self::new(name, value, LineCategory::Informational)
    }

    /// Attaches a rate descriptor such as `"9.25%"`.
    pub fn with_rate(
        mut self,
        rate: impl Into<String>,
    ) -> Self {
        self.rate = Some(rate.into());
        self
    }

    /// Whether this item counts towards the payable total.
    pub fn is_payable(&self) -> bool {
        self.category != LineCategory::Informational
    }
}

/// Itemized outcome of one computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub total: Decimal,
    pub items: Vec<TaxLineItem>,
    /// `total / revenue`, zero when revenue is zero.
    pub effective_rate: Decimal,
}

impl TaxResult {
    /// The empty result every degraded computation returns.
    pub fn zero() -> Self {
        Self {
            total: Decimal::ZERO,
            items: Vec::new(),
            effective_rate: Decimal::ZERO,
        }
    }

    /// Builds a result whose total and effective rate are derived from
    /// `items`.
    pub fn from_items(
        items: Vec<TaxLineItem>,
        revenue: Decimal,
    ) -> Self {
        let total: Decimal = items
            .iter()
            .filter(|item| item.is_payable())
            .map(|item| item.value)
            .sum();

        let effective_rate = if revenue > Decimal::ZERO {
            total / revenue
        } else {
            Decimal::ZERO
        };

        Self {
            total,
            items,
            effective_rate,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total.is_zero() && self.items.is_empty()
    }

    pub fn find(
        &self,
        name: &str,
    ) -> Option<&TaxLineItem> {
        self.items.iter().find(|item| item.name == name)
    }

    fn category_total(
        &self,
        category: LineCategory,
    ) -> Decimal {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .map(|item| item.value)
            .sum()
    }

    pub fn on_revenue_total(&self) -> Decimal {
        self.category_total(LineCategory::OnRevenue)
    }

    pub fn on_result_total(&self) -> Decimal {
        self.category_total(LineCategory::OnResult)
    }

    /// Sum of carried-forward credit balances.
    pub fn credit_balance_total(&self) -> Decimal {
        self.category_total(LineCategory::Informational)
    }
}

/// Combined results for several entities (e.g. one per partner).
///
/// Items with the same name and category are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub entities: usize,
    pub revenue: Decimal,
    pub total: Decimal,
    pub effective_rate: Decimal,
    pub items: Vec<TaxLineItem>,
}

impl TaxSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = (Decimal, &'a TaxResult)>) -> Self {
        let mut summary = Self::default();
        for (revenue, result) in results {
            summary.add(revenue, result);
        }
        summary
    }

    /// Folds one entity's result into the summary.
    pub fn add(
        &mut self,
        revenue: Decimal,
        result: &TaxResult,
    ) {
        self.entities += 1;
        self.revenue += max(revenue, Decimal::ZERO);
        self.total += result.total;

        for item in &result.items {
            match self
                .items
                .iter_mut()
                .find(|existing| existing.name == item.name && existing.category == item.category)
            {
                Some(existing) => existing.value += item.value,
                None => self.items.push(TaxLineItem {
                    rate: None,
                    ..item.clone()
                }),
            }
        }

        self.effective_rate = if self.revenue > Decimal::ZERO {
            self.total / self.revenue
        } else {
            Decimal::ZERO
        };
    }
}
