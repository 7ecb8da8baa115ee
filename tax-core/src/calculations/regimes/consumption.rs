//! Revenue-based (consumption-style) taxes for the margin and profit
//! regimes, per epoch.

use rust_decimal::Decimal;

use super::RegimeContext;
use crate::calculations::common::{format_percent, round_half_up};
use crate::calculations::{CreditNetting, Epoch, NettedTax};
use crate::{Regime, TaxLineItem};

pub const SERVICE_TAX: &str = "Service Tax";
pub const CONSUMPTION_TAX_A: &str = "Consumption Tax A";
pub const CONSUMPTION_TAX_B: &str = "Consumption Tax B";
pub const UNIFIED_FEDERAL_TAX: &str = "Unified Federal Tax";
pub const UNIFIED_SUBNATIONAL_TAX: &str = "Unified Subnational Tax";
pub const TEST_FEDERAL_TAX: &str = "Unified Federal Tax (Test)";
pub const TEST_SUBNATIONAL_TAX: &str = "Unified Subnational Tax (Test)";

/// Revenue tax items plus the sum of their gross debits.
///
/// The debits, not the netted payables, are what the actual-profit income
/// base deducts.
#[derive(Debug, Default)]
pub(super) struct RevenueTaxes {
    pub items: Vec<TaxLineItem>,
    pub debits: Decimal,
}

impl RevenueTaxes {
    fn push_netted(
        &mut self,
        name: &str,
        rate: Decimal,
        netted: NettedTax,
    ) {
        self.debits += netted.debit;
        self.items
            .extend(netted.into_items(name, Some(format_percent(rate))));
    }

    fn push_plain(
        &mut self,
        name: &str,
        rate: Decimal,
        value: Decimal,
    ) {
        let item = TaxLineItem::on_revenue(name, value).with_rate(format_percent(rate));
        self.debits += item.value;
        self.items.push(item);
    }

    /// City-level service tax. `share` is the old tax's weight during the
    /// transition; `None` means the full, unsuffixed tax.
    fn service_tax(
        &mut self,
        ctx: &RegimeContext<'_>,
        share: Option<Decimal>,
    ) {
        let rate = ctx.config.rates.service_tax_for(&ctx.request.activity_code);
        let value = round_half_up(ctx.request.revenue * rate);
        match share {
            None => self.push_plain(SERVICE_TAX, rate, value),
            Some(share) if share > Decimal::ZERO => self.push_plain(
                &blended_name(SERVICE_TAX, share),
                rate,
                round_half_up(value * share),
            ),
            Some(_) => {}
        }
    }

    /// The legacy federal pair: credit-bearing for actual profit,
    /// cumulative (no credits) for presumed margin.
    fn legacy_federal_pair(
        &mut self,
        ctx: &RegimeContext<'_>,
    ) {
        let rates = &ctx.config.rates;
        let (rate_a, rate_b, credits) = match ctx.request.regime {
            Regime::ActualProfit => (rates.consumption_a_actual, rates.consumption_b_actual, true),
            _ => (
                rates.consumption_a_presumed,
                rates.consumption_b_presumed,
                false,
            ),
        };

        for (name, rate) in [(CONSUMPTION_TAX_A, rate_a), (CONSUMPTION_TAX_B, rate_b)] {
            let netted = CreditNetting::new(rate)
                .with_credits(credits)
                .net(ctx.request.revenue, ctx.request.normalized_credit_costs());
            self.push_netted(name, rate, netted);
        }
    }

    fn unified_federal(
        &mut self,
        ctx: &RegimeContext<'_>,
    ) {
        let rate = ctx.config.rates.unified_federal;
        let netted = CreditNetting::new(rate)
            .with_credits(ctx.unified_credits_allowed())
            .net(ctx.request.revenue, ctx.request.normalized_credit_costs());
        self.push_netted(UNIFIED_FEDERAL_TAX, rate, netted);
    }

    /// Unified subnational tax; during the transition only `share` of it is
    /// due, and credits are scaled by the same share.
    fn unified_subnational(
        &mut self,
        ctx: &RegimeContext<'_>,
        share: Option<Decimal>,
    ) {
        let rate = ctx.config.rates.unified_subnational;
        let proportion = share.unwrap_or(Decimal::ONE);
        if proportion <= Decimal::ZERO {
            return;
        }

        let netted = CreditNetting::new(rate)
            .with_credits(ctx.unified_credits_allowed())
            .scaled(proportion)
            .net(ctx.request.revenue, ctx.request.normalized_credit_costs());
        let name = match share {
            Some(share) => blended_name(UNIFIED_SUBNATIONAL_TAX, share),
            None => UNIFIED_SUBNATIONAL_TAX.to_string(),
        };
        self.push_netted(&name, rate, netted);
    }
}

fn blended_name(
    name: &str,
    share: Decimal,
) -> String {
    format!("{name} ({})", format_percent(share))
}

/// Builds the revenue taxes for the context's regime and epoch.
pub(super) fn revenue_taxes(ctx: &RegimeContext<'_>) -> RevenueTaxes {
    let mut taxes = RevenueTaxes::default();

    match ctx.epoch {
        Epoch::Legacy | Epoch::TestYear => match ctx.request.regime {
            Regime::PresumedMargin => {
                taxes.service_tax(ctx, None);
                taxes.legacy_federal_pair(ctx);
            }
            _ => {
                taxes.legacy_federal_pair(ctx);
                taxes.service_tax(ctx, None);
            }
        },
        Epoch::Hybrid => {
            taxes.unified_federal(ctx);
            taxes.service_tax(ctx, None);
        }
        Epoch::Transition { proportion } => {
            taxes.unified_federal(ctx);
            taxes.service_tax(ctx, Some(Decimal::ONE - proportion));
            taxes.unified_subnational(ctx, Some(proportion));
        }
        Epoch::FullReform => {
            taxes.unified_federal(ctx);
            taxes.unified_subnational(ctx, None);
        }
    }

    taxes
}
