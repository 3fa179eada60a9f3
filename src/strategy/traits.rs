// src/strategy/traits.rs

use crate::error::Result;
use crate::model::decision::Rationale;
use crate::simulation::config::PlantConfig;
use std::fmt::Debug;

/// What an excess policy sees once capacity has been filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcessContext {
    /// Incoming material left after processing took its share.
    pub excess: f64,
    /// Free storage after old stock that stays in storage.
    pub storage_headroom: f64,
    pub price_fresh_today: f64,
    /// `(+n, +n+1)` finished-product prices, when both are known.
    pub future_prices: Option<(f64, f64)>,
}

/// How an excess policy split the excess.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcessRouting {
    pub held: f64,
    pub disposed: f64,
    pub breakeven_price: Option<f64>,
    pub rationale: Rationale,
}

/// Decides how excess incoming material splits between storage and disposal.
///
/// Implementations must be pure: the same config and context always give
/// the same routing, and `held + disposed == excess` with
/// `held <= storage_headroom`.
///
/// `Send + Sync` lets one engine serve parallel evaluations.
pub trait ExcessPolicy: Debug + Send + Sync {
    fn route(&self, config: &PlantConfig, context: &ExcessContext) -> Result<ExcessRouting>;
}
