// src/model/decision.rs

use crate::error::{DecisionError, Result};
use crate::simulation::config::PlantConfig;
use serde::Serialize;
use std::fmt;

/// Which total-mass band the day fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Regime {
    /// total <= capacity
    UnderCapacity,
    /// capacity < total < capacity + max stock
    Buffered,
    /// total >= capacity + max stock
    Saturated,
}

/// Which rule fired, with the numbers it used.
///
/// `Display` gives a plain, locale-neutral explanation for audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Rationale {
    ProcessAll {
        total: f64,
        capacity: f64,
    },
    /// Capacity filled from old stock alone; nothing new left over.
    NoExcess {
        stock_remaining: f64,
    },
    /// `sale_day` counts days from today until held material, once
    /// processed, is sold: lead time plus storage days.
    HoldProfitable {
        excess: f64,
        breakeven: f64,
        future_price: f64,
        sale_day: u32,
        held: f64,
        disposed: f64,
    },
    DisposeUnprofitable {
        excess: f64,
        breakeven: f64,
        future_price: f64,
        sale_day: u32,
    },
    /// Future prices unknown: keep optionality.
    HoldByDefault {
        excess: f64,
        held: f64,
        disposed: f64,
    },
    Saturated {
        capacity: f64,
        held: f64,
        disposed: f64,
    },
}

impl fmt::Display for Rationale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Rationale::ProcessAll { total, capacity } => write!(
                f,
                "total material {total:.0} at or below capacity {capacity:.0}; process all"
            ),
            Rationale::NoExcess { stock_remaining } => write!(
                f,
                "capacity filled from existing stock; {stock_remaining:.0} of old stock stays in storage"
            ),
            Rationale::HoldProfitable {
                excess,
                breakeven,
                future_price,
                sale_day,
                held,
                disposed,
            } => {
                write!(
                    f,
                    "excess {excess:.0}: day +{sale_day} price {future_price:.2} >= breakeven {breakeven:.2}; hold {held:.0}"
                )?;
                if disposed > 0.0 {
                    write!(f, ", storage full, dispose {disposed:.0}")?;
                }
                Ok(())
            }
            Rationale::DisposeUnprofitable {
                excess,
                breakeven,
                future_price,
                sale_day,
            } => write!(
                f,
                "excess {excess:.0}: day +{sale_day} price {future_price:.2} < breakeven {breakeven:.2}; dispose all"
            ),
            Rationale::HoldByDefault {
                excess,
                held,
                disposed,
            } => {
                write!(f, "excess {excess:.0}: future price unknown; hold {held:.0}")?;
                if disposed > 0.0 {
                    write!(f, ", dispose overflow {disposed:.0}")?;
                }
                Ok(())
            }
            Rationale::Saturated {
                capacity,
                held,
                disposed,
            } => write!(
                f,
                "capacity and storage saturated; process {capacity:.0}, hold {held:.0}, dispose {disposed:.0}"
            ),
        }
    }
}

/// The outcome of one evaluation. Never mutated after creation.
///
/// Old stock and incoming material are separate pools:
/// `process_amount + stock_remaining + stock_carried_amount + disposed_amount`
/// equals `incoming_material + current_stock`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    pub regime: Regime,
    pub process_amount: f64,
    pub processed_from_stock: f64,
    pub processed_from_incoming: f64,
    /// Pre-existing stock that processing did not consume.
    pub stock_remaining: f64,
    /// Incoming material newly placed into storage.
    pub stock_carried_amount: f64,
    pub disposed_amount: f64,
    pub breakeven_price: Option<f64>,
    pub rationale: Rationale,
}

impl Decision {
    /// Stock on hand at the end of the day.
    pub fn total_stock_after(&self) -> f64 {
        self.stock_remaining + self.stock_carried_amount
    }

    /// Everything the decision accounts for, across both pools.
    pub fn accounted_mass(&self) -> f64 {
        self.process_amount
            + self.stock_remaining
            + self.stock_carried_amount
            + self.disposed_amount
    }

    /// Fraction of daily capacity used.
    pub fn capacity_utilization(&self, config: &PlantConfig) -> Result<f64> {
        if config.processing_capacity == 0.0 {
            return Err(DecisionError::DivisionHazard {
                what: "capacity utilization",
            });
        }
        Ok(self.process_amount / config.processing_capacity)
    }

    /// Fraction of storage occupied at the end of the day.
    pub fn storage_utilization(&self, config: &PlantConfig) -> Result<f64> {
        if config.max_stock == 0.0 {
            return Err(DecisionError::DivisionHazard {
                what: "storage utilization",
            });
        }
        Ok(self.total_stock_after() / config.max_stock)
    }
}
