// src/io/reporting.rs

use crate::error::Result;
use crate::model::decision::Decision;
use crate::model::input::DailyInput;
use serde::Serialize;
use std::path::Path;

/// One CSV row: the input snapshot next to what was decided for it.
///
/// A rejected input leaves the decision columns empty and fills `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub scenario: usize,
    pub incoming_material: f64,
    pub current_stock: f64,
    pub price_fresh_today: f64,
    pub price_finished_plus_n: Option<f64>,
    pub price_finished_plus_n_plus_1: Option<f64>,
    pub regime: Option<String>,
    pub process_amount: Option<f64>,
    pub stock_remaining: Option<f64>,
    pub stock_carried_amount: Option<f64>,
    pub disposed_amount: Option<f64>,
    pub breakeven_price: Option<f64>,
    pub rationale: Option<String>,
    pub error: Option<String>,
}

impl DecisionRecord {
    pub fn new(scenario: usize, input: &DailyInput, outcome: &Result<Decision>) -> Self {
        let mut record = Self {
            scenario,
            incoming_material: input.incoming_material,
            current_stock: input.current_stock,
            price_fresh_today: input.price_fresh_today,
            price_finished_plus_n: input.price_finished_plus_n,
            price_finished_plus_n_plus_1: input.price_finished_plus_n_plus_1,
            regime: None,
            process_amount: None,
            stock_remaining: None,
            stock_carried_amount: None,
            disposed_amount: None,
            breakeven_price: None,
            rationale: None,
            error: None,
        };

        match outcome {
            Ok(decision) => {
                record.regime = Some(format!("{:?}", decision.regime));
                record.process_amount = Some(decision.process_amount);
                record.stock_remaining = Some(decision.stock_remaining);
                record.stock_carried_amount = Some(decision.stock_carried_amount);
                record.disposed_amount = Some(decision.disposed_amount);
                record.breakeven_price = decision.breakeven_price;
                record.rationale = Some(decision.rationale.to_string());
            }
            Err(e) => record.error = Some(e.to_string()),
        }
        record
    }
}

/// Pairs inputs with their outcomes, numbering scenarios from 1.
pub fn build_records(inputs: &[DailyInput], outcomes: &[Result<Decision>]) -> Vec<DecisionRecord> {
    inputs
        .iter()
        .zip(outcomes)
        .enumerate()
        .map(|(i, (input, outcome))| DecisionRecord::new(i + 1, input, outcome))
        .collect()
}

/// Writes decision records to a CSV file.
///
/// # Arguments
/// * `file_path` - Where to save the file (e.g. "results/decisions.csv").
/// * `data` - One record per evaluated scenario.
pub fn write_decision_log(file_path: impl AsRef<Path>, data: &[DecisionRecord]) -> Result<()> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for record in data {
        wtr.serialize(record)?;
    }

    wtr.flush()?;

    tracing::info!(rows = data.len(), path = %path.display(), "exported decision log");
    Ok(())
}
