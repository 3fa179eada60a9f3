// src/simulation/financials.rs

use crate::error::{ensure_non_negative, DecisionError, Result};
use crate::model::decision::Decision;
use crate::simulation::config::PlantConfig;
use crate::strategy::costs::{disposal_transport_cost, storage_cost};
use serde::Serialize;
use std::collections::BTreeMap;

/// Prices actually realised for a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealizedPrices {
    /// Raw material price today (also the raw material cost of processing).
    pub fresh_today: f64,
    /// Finished-product sale price.
    pub finished_sale: f64,
    /// Days the processed material sat in storage first (0 = processed fresh).
    pub storage_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum CostItem {
    Processing,
    DisposalTransport,
    StorageDay1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RevenueItem {
    FinishedSales,
    FreshSales,
}

/// Cost, revenue and net for one path of material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PathSummary {
    pub cost: f64,
    pub revenue: f64,
    pub net: f64,
}

impl PathSummary {
    fn new(cost: f64, revenue: f64) -> Self {
        Self {
            cost,
            revenue,
            net: revenue - cost,
        }
    }
}

/// Itemised money view of a decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub costs: BTreeMap<CostItem, f64>,
    pub revenue: BTreeMap<RevenueItem, f64>,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub profit: f64,
    pub processing: PathSummary,
    pub disposal: PathSummary,
    pub storage: PathSummary,
    pub processed_amount: f64,
}

impl FinancialSummary {
    /// Net of the processing path per processed unit.
    pub fn profit_per_processed_unit(&self) -> Result<f64> {
        if self.processed_amount == 0.0 {
            return Err(DecisionError::DivisionHazard {
                what: "profit per processed unit",
            });
        }
        Ok(self.processing.net / self.processed_amount)
    }
}

/// Aggregates costs and revenue for a decision.
///
/// A line item appears only when its amount is positive.
pub fn evaluate_financials(
    config: &PlantConfig,
    decision: &Decision,
    prices: &RealizedPrices,
) -> Result<FinancialSummary> {
    config.validate()?;
    ensure_non_negative("fresh_today", prices.fresh_today)?;
    ensure_non_negative("finished_sale", prices.finished_sale)?;

    let mut costs = BTreeMap::new();
    let mut revenue = BTreeMap::new();
    let mut processing = PathSummary::default();
    let mut disposal = PathSummary::default();
    let mut storage = PathSummary::default();

    if decision.process_amount > 0.0 {
        let unit_cost = prices.fresh_today
            + storage_cost(config, prices.storage_days)
            + config.processing_cost_per_unit;
        let cost = decision.process_amount * unit_cost;
        let sales = decision.process_amount * prices.finished_sale;
        costs.insert(CostItem::Processing, cost);
        revenue.insert(RevenueItem::FinishedSales, sales);
        processing = PathSummary::new(cost, sales);
    }

    if decision.disposed_amount > 0.0 {
        let transport = disposal_transport_cost(config, decision.disposed_amount)?;
        let sales = decision.disposed_amount * prices.fresh_today;
        costs.insert(CostItem::DisposalTransport, transport);
        revenue.insert(RevenueItem::FreshSales, sales);
        disposal = PathSummary::new(transport, sales);
    }

    if decision.stock_carried_amount > 0.0 {
        let cost = decision.stock_carried_amount * config.storage_cost_day1_per_unit;
        costs.insert(CostItem::StorageDay1, cost);
        storage = PathSummary::new(cost, 0.0);
    }

    let total_cost: f64 = costs.values().sum();
    let total_revenue: f64 = revenue.values().sum();

    Ok(FinancialSummary {
        costs,
        revenue,
        total_cost,
        total_revenue,
        profit: total_revenue - total_cost,
        processing,
        disposal,
        storage,
        processed_amount: decision.process_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decision::{Rationale, Regime};

    fn decision(process: f64, carried: f64, disposed: f64) -> Decision {
        Decision {
            regime: Regime::Saturated,
            process_amount: process,
            processed_from_stock: 0.0,
            processed_from_incoming: process,
            stock_remaining: 0.0,
            stock_carried_amount: carried,
            disposed_amount: disposed,
            breakeven_price: None,
            rationale: Rationale::Saturated {
                capacity: process,
                held: carried,
                disposed,
            },
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn itemises_every_path() {
        let config = PlantConfig::default();
        let prices = RealizedPrices {
            fresh_today: 45.0,
            finished_sale: 53.0,
            storage_days: 0,
        };
        let summary =
            evaluate_financials(&config, &decision(60_000.0, 20_000.0, 10_000.0), &prices).unwrap();

        assert!(close(summary.costs[&CostItem::Processing], 60_000.0 * 50.0));
        assert!(close(summary.costs[&CostItem::DisposalTransport], 8_500.0));
        assert!(close(summary.costs[&CostItem::StorageDay1], 5_600.0));
        assert!(close(summary.revenue[&RevenueItem::FinishedSales], 60_000.0 * 53.0));
        assert!(close(summary.revenue[&RevenueItem::FreshSales], 450_000.0));

        let expected_cost = 3_000_000.0 + 8_500.0 + 5_600.0;
        let expected_revenue = 3_180_000.0 + 450_000.0;
        assert!(close(summary.total_cost, expected_cost));
        assert!(close(summary.total_revenue, expected_revenue));
        assert!(close(summary.profit, expected_revenue - expected_cost));
        assert!(close(summary.disposal.net, 441_500.0));
        assert!(close(summary.storage.net, -5_600.0));
    }

    #[test]
    fn omits_zero_amount_items() {
        let config = PlantConfig::default();
        let prices = RealizedPrices {
            fresh_today: 45.0,
            finished_sale: 52.0,
            storage_days: 0,
        };
        let summary = evaluate_financials(&config, &decision(50_000.0, 0.0, 0.0), &prices).unwrap();

        assert_eq!(summary.costs.len(), 1);
        assert_eq!(summary.revenue.len(), 1);
        assert!(!summary.costs.contains_key(&CostItem::DisposalTransport));
        assert!(close(summary.profit_per_processed_unit().unwrap(), 2.0));
    }

    #[test]
    fn storage_days_raise_processing_cost() {
        let config = PlantConfig::default();
        let prices = RealizedPrices {
            fresh_today: 45.0,
            finished_sale: 53.0,
            storage_days: 1,
        };
        let summary = evaluate_financials(&config, &decision(1_000.0, 0.0, 0.0), &prices).unwrap();
        assert!(close(summary.processing.cost, 1_000.0 * 50.28));
    }

    #[test]
    fn per_unit_profit_without_processing_is_a_hazard() {
        let config = PlantConfig::default();
        let prices = RealizedPrices {
            fresh_today: 45.0,
            finished_sale: 53.0,
            storage_days: 0,
        };
        let summary = evaluate_financials(&config, &decision(0.0, 0.0, 5_000.0), &prices).unwrap();
        assert!(summary.costs.get(&CostItem::Processing).is_none());
        assert!(matches!(
            summary.profit_per_processed_unit(),
            Err(DecisionError::DivisionHazard { .. })
        ));
    }

    #[test]
    fn rejects_negative_prices() {
        let prices = RealizedPrices {
            fresh_today: -1.0,
            finished_sale: 53.0,
            storage_days: 0,
        };
        let result = evaluate_financials(&PlantConfig::default(), &decision(1.0, 0.0, 0.0), &prices);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_config_with_unusable_batch_size() {
        let prices = RealizedPrices {
            fresh_today: 45.0,
            finished_sale: 53.0,
            storage_days: 0,
        };
        for batch_size in [-20_000.0, f64::NAN] {
            let config = PlantConfig {
                batch_size,
                ..Default::default()
            };
            let result = evaluate_financials(&config, &decision(60_000.0, 0.0, 10_000.0), &prices);
            assert!(matches!(
                result,
                Err(DecisionError::InvalidConfig {
                    field: "batch_size",
                    ..
                })
            ));
        }
    }
}
