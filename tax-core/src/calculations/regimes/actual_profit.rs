use super::RegimeContext;
use super::consumption::revenue_taxes;
use crate::TaxLineItem;
use crate::calculations::{IncomeBase, IncomeTaxCalculator};

/// Revenue taxes for the epoch (credits netted), then income taxes on
/// revenue minus costs minus the gross revenue-tax debits.
pub(super) fn line_items(ctx: &RegimeContext<'_>) -> Vec<TaxLineItem> {
    let rates = &ctx.config.rates;
    let revenue_taxes = revenue_taxes(ctx);

    let base = IncomeBase::actual_profit(
        ctx.request.revenue,
        ctx.request.normalized_cost(),
        revenue_taxes.debits,
        rates,
    );

    let mut items = revenue_taxes.items;
    items.extend(IncomeTaxCalculator::new(rates).items(&base, ctx.incentive_applies()));
    items
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::Epoch;
    use crate::{
        ActivityClassification, BracketTable, EngineConfig, LineCategory, RatioRouting,
        ReferenceData, Regime, TaxCalculationRequest,
    };

    fn reference() -> ReferenceData {
        ReferenceData::new(
            Vec::<ActivityClassification>::new(),
            Vec::<BracketTable>::new(),
            RatioRouting {
                high_ratio_table_id: "III".to_string(),
                low_ratio_table_id: "V".to_string(),
            },
        )
    }

    fn request(year: i32) -> TaxCalculationRequest {
        TaxCalculationRequest::new(year, Regime::ActualProfit, dec!(100000), "6201-5/01")
            .with_cost(dec!(50000))
            .with_credit_generating_costs(dec!(30000))
    }

    fn values(items: &[TaxLineItem]) -> Vec<(&str, Decimal)> {
        items.iter().map(|i| (i.name.as_str(), i.value)).collect()
    }

    #[test]
    fn legacy_actual_profit_nets_credits_and_deducts_debits() {
        let config = EngineConfig::default();
        let data = reference();
        let request = request(2025);
        let ctx = RegimeContext {
            request: &request,
            epoch: Epoch::Legacy,
            config: &config,
            reference: &data,
        };

        let items = line_items(&ctx);

        // Base: 100000 − 50000 − (1650 + 7600 + 2000) = 38750
        assert_eq!(
            values(&items),
            vec![
                ("Consumption Tax A", dec!(1155.00)),
                ("Consumption Tax B", dec!(5320.00)),
                ("Service Tax", dec!(2000.00)),
                ("Corporate Income Tax", dec!(5812.50)),
                ("Corporate Income Surtax", dec!(1875.00)),
                ("Social Contribution Tax", dec!(3487.50)),
            ]
        );
    }

    #[test]
    fn incentive_applies_only_before_reform() {
        let config = EngineConfig::default();
        let data = reference();
        let legacy = request(2025).with_incentive(true);
        let hybrid = request(2027).with_incentive(true);

        let legacy_items = line_items(&RegimeContext {
            request: &legacy,
            epoch: Epoch::Legacy,
            config: &config,
            reference: &data,
        });
        let hybrid_items = line_items(&RegimeContext {
            request: &hybrid,
            epoch: Epoch::Hybrid,
            config: &config,
            reference: &data,
        });

        let corporate = |items: &[TaxLineItem]| {
            items
                .iter()
                .find(|i| i.name == "Corporate Income Tax")
                .map(|i| i.rate.clone())
                .unwrap()
        };
        assert_eq!(corporate(&legacy_items).as_deref(), Some("14.4%"));
        assert_eq!(corporate(&hybrid_items).as_deref(), Some("15%"));
    }

    #[test]
    fn hybrid_replaces_federal_pair_with_unified_tax() {
        let config = EngineConfig::default();
        let data = reference();
        let request = request(2027);
        let ctx = RegimeContext {
            request: &request,
            epoch: Epoch::Hybrid,
            config: &config,
            reference: &data,
        };

        let items = line_items(&ctx);

        // Unified: 8800 − 2640 = 6160; base: 100000 − 50000 − (8800 + 2000) = 39200
        assert_eq!(
            values(&items)[..2].to_vec(),
            vec![("Unified Federal Tax", dec!(6160.00)), ("Service Tax", dec!(2000.00))]
        );
        assert_eq!(items[2].value, dec!(5880.00));
        assert!(items.iter().all(|i| i.name != "Consumption Tax A"));
    }

    #[test]
    fn transition_blends_service_and_subnational_taxes() {
        let config = EngineConfig::default();
        let data = reference();
        let request = request(2029);
        let ctx = RegimeContext {
            request: &request,
            epoch: Epoch::Transition {
                proportion: dec!(0.25),
            },
            config: &config,
            reference: &data,
        };

        let items = line_items(&ctx);

        assert_eq!(
            values(&items)[..3].to_vec(),
            vec![
                ("Unified Federal Tax", dec!(6160.00)),
                ("Service Tax (75%)", dec!(1500.00)),
                // (17700 − 5310) × 25%
                ("Unified Subnational Tax (25%)", dec!(3097.50)),
            ]
        );
    }

    #[test]
    fn full_reform_reports_leftover_credit_as_informational() {
        let config = EngineConfig::default();
        let data = reference();
        let request = TaxCalculationRequest::new(2033, Regime::ActualProfit, dec!(10000), "6201-5/01")
            .with_cost(dec!(2000))
            .with_credit_generating_costs(dec!(15000));
        let ctx = RegimeContext {
            request: &request,
            epoch: Epoch::FullReform,
            config: &config,
            reference: &data,
        };

        let items = line_items(&ctx);

        assert_eq!(
            values(&items)[..4].to_vec(),
            vec![
                ("Unified Federal Tax", dec!(0)),
                ("Unified Federal Tax Credit Balance", dec!(440.00)),
                ("Unified Subnational Tax", dec!(0)),
                ("Unified Subnational Tax Credit Balance", dec!(885.00)),
            ]
        );
        assert_eq!(items[1].category, LineCategory::Informational);
        assert!(items.iter().all(|i| !i.name.starts_with("Service Tax")));
    }
}
