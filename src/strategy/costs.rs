// src/strategy/costs.rs

//! Per-unit cost and breakeven calculations.
//!
//! All functions are pure and read only the plant config they are given.

use crate::error::{ensure_non_negative, Result};
use crate::simulation::config::PlantConfig;

/// Storage cost per unit for holding material `days` days.
///
/// Day 1 carries its own rate (it includes handling); each further day
/// adds the flat day-2+ rate.
///
/// Formula: 0 for `days < 1`, else `day1 + (days - 1) * day2plus`
pub fn storage_cost(config: &PlantConfig, days: u32) -> f64 {
    match days {
        0 => 0.0,
        1 => config.storage_cost_day1_per_unit,
        _ => {
            config.storage_cost_day1_per_unit
                + f64::from(days - 1) * config.storage_cost_day2plus_per_unit_per_day
        }
    }
}

/// Transport cost of disposing `amount` through the fresh-sale channel.
///
/// Fractional batches are billed proportionally, not rounded up.
pub fn disposal_transport_cost(config: &PlantConfig, amount: f64) -> Result<f64> {
    config.validate()?;
    let amount = ensure_non_negative("amount", amount)?;
    Ok((amount / config.batch_size) * config.transport_cost_per_batch)
}

/// Minimum finished-product price at which holding `storage_days` and then
/// processing is at least as good as selling the raw material today.
///
/// Formula: (fresh price - transport per unit) + storage cost + processing cost
///
/// The first term is the opportunity cost of not selling fresh today; the
/// rest is what processing adds on top of the raw material.
pub fn breakeven_price(
    config: &PlantConfig,
    price_fresh_today: f64,
    storage_days: u32,
) -> Result<f64> {
    config.validate()?;
    let price_fresh_today = ensure_non_negative("price_fresh_today", price_fresh_today)?;
    let fresh_sale_net = price_fresh_today - config.transport_cost_per_unit()?;
    let additional_cost = storage_cost(config, storage_days) + config.processing_cost_per_unit;
    Ok(fresh_sale_net + additional_cost)
}
