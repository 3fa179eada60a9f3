// src/model/input.rs

use crate::error::{ensure_non_negative, DecisionError, Result};
use crate::simulation::config::PlantConfig;
use serde::{Deserialize, Serialize};

/// One day's snapshot of material and prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyInput {
    /// Fresh material received today.
    pub incoming_material: f64,
    /// Material already in storage from earlier days.
    pub current_stock: f64,
    /// Price per unit when selling raw material today.
    pub price_fresh_today: f64,
    /// Finished-product price if processed today (realised after the lead time).
    #[serde(default)]
    pub price_finished_plus_n: Option<f64>,
    /// Finished-product price one day later than `price_finished_plus_n`.
    #[serde(default)]
    pub price_finished_plus_n_plus_1: Option<f64>,
}

impl DailyInput {
    pub fn new(incoming_material: f64, current_stock: f64, price_fresh_today: f64) -> Self {
        Self {
            incoming_material,
            current_stock,
            price_fresh_today,
            price_finished_plus_n: None,
            price_finished_plus_n_plus_1: None,
        }
    }

    pub fn with_future_prices(mut self, plus_n: f64, plus_n_plus_1: f64) -> Self {
        self.price_finished_plus_n = Some(plus_n);
        self.price_finished_plus_n_plus_1 = Some(plus_n_plus_1);
        self
    }

    pub fn total_available(&self) -> f64 {
        self.incoming_material + self.current_stock
    }

    /// Both future prices, or `None` when either is unknown.
    pub fn future_prices(&self) -> Option<(f64, f64)> {
        match (self.price_finished_plus_n, self.price_finished_plus_n_plus_1) {
            (Some(n), Some(n1)) => Some((n, n1)),
            _ => None,
        }
    }

    /// Rejects negative values and stock above the configured maximum.
    pub fn validate(&self, config: &PlantConfig) -> Result<()> {
        ensure_non_negative("incoming_material", self.incoming_material)?;
        ensure_non_negative("current_stock", self.current_stock)?;
        ensure_non_negative("price_fresh_today", self.price_fresh_today)?;
        if let Some(price) = self.price_finished_plus_n {
            ensure_non_negative("price_finished_plus_n", price)?;
        }
        if let Some(price) = self.price_finished_plus_n_plus_1 {
            ensure_non_negative("price_finished_plus_n_plus_1", price)?;
        }
        if self.current_stock > config.max_stock {
            return Err(DecisionError::StockExceedsMax {
                current_stock: self.current_stock,
                max_stock: config.max_stock,
            });
        }
        Ok(())
    }
}
