//! Daily allocation of perishable raw material between immediate
//! processing, storage for later processing and disposal through a
//! fresh-sale channel.
//!
//! The entry point is [`decide`] (or a [`DecisionEngine`] holding a config
//! snapshot). Both are pure: no state survives between calls, so a
//! multi-day driver threads `stock_carried_amount` into the next day's
//! `current_stock` itself.

pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::{DecisionError, Result};
pub use model::decision::{Decision, Rationale, Regime};
pub use model::input::DailyInput;
pub use simulation::config::{ConfigOverrides, PlantConfig};
pub use simulation::engine::{decide, DecisionEngine};
pub use simulation::financials::{evaluate_financials, FinancialSummary, RealizedPrices};
