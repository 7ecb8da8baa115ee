use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Taxation regime chosen by the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// Simplified regime taxed through progressive revenue brackets.
    Bracket,
    /// Profit presumed as a fixed percentage of revenue.
    PresumedMargin,
    /// Profit computed from actual revenue and costs, with input credits.
    ActualProfit,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bracket => "bracket",
            Self::PresumedMargin => "presumed-margin",
            Self::ActualProfit => "actual-profit",
        }
    }

    /// Parses the kebab-case name, ignoring ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bracket" => Some(Self::Bracket),
            "presumed-margin" => Some(Self::PresumedMargin),
            "actual-profit" => Some(Self::ActualProfit),
            _ => None,
        }
    }
}

/// Inputs for a single tax computation.
///
/// Amounts are monthly except the trailing-12-month fields used by the
/// bracket regime. Costs are stored as magnitudes regardless of the sign
/// they were entered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationRequest {
    pub simulation_year: i32,
    pub regime: Regime,
    pub revenue: Decimal,
    pub activity_code: String,

    #[serde(default)]
    pub cost: Decimal,

    /// Presumed margin as a percentage (`32` means 32%).
    #[serde(default)]
    pub presumed_margin_percent: Decimal,

    #[serde(default)]
    pub trailing_revenue: Decimal,

    #[serde(default)]
    pub trailing_payroll: Decimal,

    #[serde(default)]
    pub incentive_opt_in: bool,

    #[serde(default)]
    pub credit_generating_costs: Decimal,
}

impl TaxCalculationRequest {
    /// Creates a request with the required fields; everything else is zero.
    pub fn new(
        simulation_year: i32,
        regime: Regime,
        revenue: Decimal,
        activity_code: impl Into<String>,
    ) -> Self {
        Self {
            simulation_year,
            regime,
            revenue,
            activity_code: activity_code.into(),
            cost: Decimal::ZERO,
            presumed_margin_percent: Decimal::ZERO,
            trailing_revenue: Decimal::ZERO,
            trailing_payroll: Decimal::ZERO,
            incentive_opt_in: false,
            credit_generating_costs: Decimal::ZERO,
        }
    }

    pub fn with_cost(
        mut self,
        cost: Decimal,
    ) -> Self {
        self.cost = cost.abs();
        self
    }

    pub fn with_presumed_margin_percent(
        mut self,
        percent: Decimal,
    ) -> Self {
        self.presumed_margin_percent = percent;
        self
    }

    pub fn with_trailing(
        mut self,
        revenue: Decimal,
        payroll: Decimal,
    ) -> Self {
        self.trailing_revenue = revenue;
        self.trailing_payroll = payroll;
        self
    }

    pub fn with_incentive(
        mut self,
        opt_in: bool,
    ) -> Self {
        self.incentive_opt_in = opt_in;
        self
    }

    pub fn with_credit_generating_costs(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.credit_generating_costs = amount.abs();
        self
    }

    /// Same request, different year.
    pub fn for_year(
        &self,
        simulation_year: i32,
    ) -> Self {
        Self {
            simulation_year,
            ..self.clone()
        }
    }

    /// Cost as a non-negative magnitude, even when deserialized negative.
    pub fn normalized_cost(&self) -> Decimal {
        self.cost.abs()
    }

    /// Credit-generating costs as a non-negative magnitude.
    pub fn normalized_credit_costs(&self) -> Decimal {
        self.credit_generating_costs.abs()
    }
}
