// src/simulation/engine.rs

use crate::error::Result;
use crate::model::decision::{Decision, Rationale, Regime};
use crate::model::input::DailyInput;
use crate::simulation::config::PlantConfig;
use crate::simulation::financials::{evaluate_financials, FinancialSummary, RealizedPrices};
use crate::strategy::implementations::BreakevenPolicy;
use crate::strategy::traits::{ExcessContext, ExcessPolicy};
use std::thread;

/// Splits one day's material between processing, storage and disposal
/// using the breakeven rule for the excess.
///
/// Stateless: identical arguments give identical decisions.
pub fn decide(config: &PlantConfig, input: &DailyInput) -> Result<Decision> {
    allocate(config, input, &BreakevenPolicy::new())
}

/// Holds an immutable config snapshot and the excess policy.
///
/// Shared by reference across threads for batch evaluation; nothing in
/// here changes after construction.
#[derive(Debug)]
pub struct DecisionEngine {
    config: PlantConfig,
    policy: Box<dyn ExcessPolicy>,
}

impl DecisionEngine {
    /// Engine with the breakeven policy.
    pub fn new(config: PlantConfig) -> Result<Self> {
        Self::with_policy(config, Box::new(BreakevenPolicy::new()))
    }

    pub fn with_policy(config: PlantConfig, policy: Box<dyn ExcessPolicy>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    pub fn decide(&self, input: &DailyInput) -> Result<Decision> {
        allocate(&self.config, input, self.policy.as_ref())
    }

    pub fn evaluate_financials(
        &self,
        decision: &Decision,
        prices: &RealizedPrices,
    ) -> Result<FinancialSummary> {
        evaluate_financials(&self.config, decision, prices)
    }

    /// Evaluates independent snapshots in parallel. Results keep input order.
    pub fn decide_batch(&self, inputs: &[DailyInput]) -> Vec<Result<Decision>> {
        if inputs.is_empty() {
            return Vec::new();
        }

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(inputs.len());
        let chunk_size = inputs.len().div_ceil(workers);

        tracing::debug!(scenarios = inputs.len(), workers, "evaluating scenario batch");

        thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|input| self.decide(input))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(results) => results,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

fn allocate(
    config: &PlantConfig,
    input: &DailyInput,
    policy: &dyn ExcessPolicy,
) -> Result<Decision> {
    if let Err(e) = config.validate().and_then(|_| input.validate(config)) {
        tracing::warn!(error = %e, "rejected daily input");
        return Err(e);
    }

    let capacity = config.processing_capacity;
    let total = input.total_available();

    // Regime A: everything fits through processing today.
    if total <= capacity {
        let decision = Decision {
            regime: Regime::UnderCapacity,
            process_amount: total,
            processed_from_stock: input.current_stock,
            processed_from_incoming: input.incoming_material,
            stock_remaining: 0.0,
            stock_carried_amount: 0.0,
            disposed_amount: 0.0,
            breakeven_price: None,
            rationale: Rationale::ProcessAll { total, capacity },
        };
        log_decision(&decision);
        return Ok(decision);
    }

    // Oldest first: old stock fills capacity before any incoming material.
    let processed_from_stock = input.current_stock.min(capacity);
    let processed_from_incoming = capacity - processed_from_stock;
    let stock_remaining = input.current_stock - processed_from_stock;
    let excess = (input.incoming_material - processed_from_incoming).max(0.0);
    let storage_headroom = (config.max_stock - stock_remaining).max(0.0);

    let (regime, held, disposed, breakeven_price, rationale) =
        if total >= capacity + config.max_stock {
            let held = excess.min(storage_headroom);
            let disposed = excess - held;
            (
                Regime::Saturated,
                held,
                disposed,
                None,
                Rationale::Saturated {
                    capacity,
                    held,
                    disposed,
                },
            )
        } else if excess == 0.0 {
            (
                Regime::Buffered,
                0.0,
                0.0,
                None,
                Rationale::NoExcess { stock_remaining },
            )
        } else {
            let context = ExcessContext {
                excess,
                storage_headroom,
                price_fresh_today: input.price_fresh_today,
                future_prices: input.future_prices(),
            };
            let routing = policy.route(config, &context)?;
            (
                Regime::Buffered,
                routing.held,
                routing.disposed,
                routing.breakeven_price,
                routing.rationale,
            )
        };

    let decision = Decision {
        regime,
        process_amount: capacity,
        processed_from_stock,
        processed_from_incoming,
        stock_remaining,
        stock_carried_amount: held,
        disposed_amount: disposed,
        breakeven_price,
        rationale,
    };
    log_decision(&decision);
    Ok(decision)
}

fn log_decision(decision: &Decision) {
    tracing::debug!(
        regime = ?decision.regime,
        process = decision.process_amount,
        carried = decision.stock_carried_amount,
        disposed = decision.disposed_amount,
        stock_remaining = decision.stock_remaining,
        rationale = %decision.rationale,
        "allocation decided"
    );
}
