// src/io/scenarios.rs

use crate::error::{DecisionError, Result};
use crate::model::input::DailyInput;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::path::Path;

/// Stock and prices shared by every scenario in a sweep; only the incoming
/// volume varies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioTemplate {
    pub current_stock: f64,
    pub price_fresh_today: f64,
    pub future_prices: Option<(f64, f64)>,
}

impl ScenarioTemplate {
    pub fn input_for(&self, incoming_material: f64) -> DailyInput {
        let input = DailyInput::new(incoming_material, self.current_stock, self.price_fresh_today);
        match self.future_prices {
            Some((plus_n, plus_n_plus_1)) => input.with_future_prices(plus_n, plus_n_plus_1),
            None => input,
        }
    }
}

/// Every scenario receives the same incoming volume.
pub fn generate_constant_supply(count: usize, value: f64) -> Vec<f64> {
    vec![value; count]
}

/// `low` for the first `step_at` scenarios, `high` for the rest.
/// Useful for walking across the regime boundaries.
pub fn generate_step_supply(count: usize, low: f64, high: f64, step_at: usize) -> Vec<f64> {
    (0..count)
        .map(|i| if i < step_at { low } else { high })
        .collect()
}

/// Incoming volumes drawn from a Normal distribution.
///
/// Samples are rounded to whole units and negative draws clamped to 0.
/// `mean` must be finite and `std_dev` finite and non-negative.
pub fn generate_normal_supply<R: Rng + ?Sized>(
    count: usize,
    mean: f64,
    std_dev: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    // rand_distr accepts a negative std dev and samples the mirrored curve.
    if !mean.is_finite() || !(std_dev.is_finite() && std_dev >= 0.0) {
        return Err(DecisionError::Distribution(format!(
            "mean {mean}, std dev {std_dev}: need a finite mean and a non-negative std dev"
        )));
    }
    let normal = Normal::new(mean, std_dev)
        .map_err(|e| DecisionError::Distribution(format!("mean {mean}, std dev {std_dev}: {e}")))?;

    Ok((0..count)
        .map(|_| normal.sample(rng).round().max(0.0))
        .collect())
}

/// How a sweep draws its incoming volumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupplyModel {
    Constant(f64),
    Normal { mean: f64, std_dev: f64 },
}

impl SupplyModel {
    pub fn generate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<f64>> {
        match *self {
            SupplyModel::Constant(value) => {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(DecisionError::Distribution(format!(
                        "constant supply {value}: need a finite, non-negative volume"
                    )));
                }
                Ok(generate_constant_supply(count, value))
            }
            SupplyModel::Normal { mean, std_dev } => {
                generate_normal_supply(count, mean, std_dev, rng)
            }
        }
    }
}

pub fn build_inputs(volumes: &[f64], template: &ScenarioTemplate) -> Vec<DailyInput> {
    volumes.iter().map(|&v| template.input_for(v)).collect()
}

/// Reads daily inputs from a CSV file with a header row matching the
/// `DailyInput` field names. Empty future-price cells mean "unknown".
pub fn load_inputs_csv(file_path: impl AsRef<Path>) -> Result<Vec<DailyInput>> {
    let mut rdr = csv::Reader::from_path(file_path.as_ref())?;
    let inputs = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<DailyInput>, csv::Error>>()?;

    tracing::info!(
        rows = inputs.len(),
        path = %file_path.as_ref().display(),
        "loaded scenarios"
    );
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    #[test]
    fn step_supply_switches_at_index() {
        let volumes = generate_step_supply(5, 50_000.0, 90_000.0, 2);
        assert_eq!(volumes, vec![50_000.0, 50_000.0, 90_000.0, 90_000.0, 90_000.0]);
        assert_eq!(generate_constant_supply(3, 1.0), vec![1.0; 3]);
    }

    #[test]
    fn normal_supply_is_seeded_and_non_negative() {
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = generate_normal_supply(200, 1_000.0, 2_000.0, &mut rng_a).unwrap();
        let b = generate_normal_supply(200, 1_000.0, 2_000.0, &mut rng_b).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 200);
        assert!(a.iter().all(|&v| v >= 0.0 && v.fract() == 0.0));
    }

    #[test]
    fn normal_supply_rejects_bad_std_dev() {
        let mut rng = StdRng::seed_from_u64(1);
        for std_dev in [-1.0, f64::NAN, f64::INFINITY] {
            let result = generate_normal_supply(1, 0.0, std_dev, &mut rng);
            assert!(matches!(result, Err(DecisionError::Distribution(_))));
        }
        let result = generate_normal_supply(1, f64::NAN, 1.0, &mut rng);
        assert!(matches!(result, Err(DecisionError::Distribution(_))));
    }

    #[test]
    fn normal_supply_with_zero_std_dev_is_constant() {
        let mut rng = StdRng::seed_from_u64(3);
        let volumes = generate_normal_supply(4, 70_000.0, 0.0, &mut rng).unwrap();
        assert_eq!(volumes, generate_constant_supply(4, 70_000.0));
    }

    #[test]
    fn supply_model_dispatches() {
        let mut rng = StdRng::seed_from_u64(11);
        let constant = SupplyModel::Constant(65_000.0).generate(3, &mut rng).unwrap();
        assert_eq!(constant, vec![65_000.0; 3]);

        let normal = SupplyModel::Normal {
            mean: 70_000.0,
            std_dev: 5_000.0,
        };
        assert_eq!(normal.generate(25, &mut rng).unwrap().len(), 25);

        assert!(matches!(
            SupplyModel::Constant(-1.0).generate(3, &mut rng),
            Err(DecisionError::Distribution(_))
        ));
        assert!(SupplyModel::Normal {
            mean: 70_000.0,
            std_dev: -5_000.0,
        }
        .generate(3, &mut rng)
        .is_err());
    }

    #[test]
    fn template_applies_prices() {
        let template = ScenarioTemplate {
            current_stock: 5_000.0,
            price_fresh_today: 45.0,
            future_prices: Some((52.0, 53.0)),
        };
        let inputs = build_inputs(&[1.0, 2.0], &template);
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1].incoming_material, 2.0);
        assert_eq!(inputs[1].current_stock, 5_000.0);
        assert_eq!(inputs[1].future_prices(), Some((52.0, 53.0)));
    }

    #[test]
    fn loads_csv_with_blank_prices() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "incoming_material,current_stock,price_fresh_today,price_finished_plus_n,price_finished_plus_n_plus_1"
        )
        .unwrap();
        writeln!(file, "75000,0,45,52,53").unwrap();
        writeln!(file, "50000,1000,44,,").unwrap();

        let inputs = load_inputs_csv(file.path()).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].future_prices(), Some((52.0, 53.0)));
        assert_eq!(inputs[1].current_stock, 1_000.0);
        assert_eq!(inputs[1].future_prices(), None);
    }
}
