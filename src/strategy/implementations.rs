// src/strategy/implementations.rs

use crate::error::Result;
use crate::model::decision::Rationale;
use crate::simulation::config::PlantConfig;
use crate::strategy::costs::breakeven_price;
use crate::strategy::traits::{ExcessContext, ExcessPolicy, ExcessRouting};

// =========================================================================
// 1. Prefer-Hold Policy
// =========================================================================

/// Keeps as much excess as storage allows and disposes only the overflow.
///
/// Ignores prices entirely, so it is the default when the future is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferHoldPolicy;

impl PreferHoldPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl ExcessPolicy for PreferHoldPolicy {
    fn route(&self, _config: &PlantConfig, context: &ExcessContext) -> Result<ExcessRouting> {
        let held = context.excess.min(context.storage_headroom).max(0.0);
        let disposed = context.excess - held;

        Ok(ExcessRouting {
            held,
            disposed,
            breakeven_price: None,
            rationale: Rationale::HoldByDefault {
                excess: context.excess,
                held,
                disposed,
            },
        })
    }
}

// =========================================================================
// 2. Breakeven Policy
// =========================================================================

/// Holds the excess only when the later finished-product price covers the
/// breakeven for `storage_days` of storage.
///
/// Rule: hold if price(+n+1) >= breakeven, else dispose everything.
/// Equality holds, keeping the option open.
/// Without both future prices it falls back to [`PreferHoldPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct BreakevenPolicy {
    storage_days: u32,
    fallback: PreferHoldPolicy,
}

impl BreakevenPolicy {
    pub fn new() -> Self {
        Self::with_storage_days(1)
    }

    pub fn with_storage_days(storage_days: u32) -> Self {
        Self {
            storage_days,
            fallback: PreferHoldPolicy::new(),
        }
    }
}

impl Default for BreakevenPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcessPolicy for BreakevenPolicy {
    fn route(&self, config: &PlantConfig, context: &ExcessContext) -> Result<ExcessRouting> {
        let Some((_, future_price)) = context.future_prices else {
            return self.fallback.route(config, context);
        };

        let breakeven = breakeven_price(config, context.price_fresh_today, self.storage_days)?;
        let sale_day = config.processing_lead_days.saturating_add(self.storage_days);

        if future_price >= breakeven {
            let held = context.excess.min(context.storage_headroom).max(0.0);
            let disposed = context.excess - held;
            Ok(ExcessRouting {
                held,
                disposed,
                breakeven_price: Some(breakeven),
                rationale: Rationale::HoldProfitable {
                    excess: context.excess,
                    breakeven,
                    future_price,
                    sale_day,
                    held,
                    disposed,
                },
            })
        } else {
            Ok(ExcessRouting {
                held: 0.0,
                disposed: context.excess,
                breakeven_price: Some(breakeven),
                rationale: Rationale::DisposeUnprofitable {
                    excess: context.excess,
                    breakeven,
                    future_price,
                    sale_day,
                },
            })
        }
    }
}
