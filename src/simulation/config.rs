// src/simulation/config.rs

use crate::error::{DecisionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Plant constants. Masses are in kilograms, money in currency units.
///
/// Read-only during an evaluation. To change a value between runs, build a
/// new config with [`PlantConfig::with_overrides`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub processing_capacity: f64,
    pub max_stock: f64,
    /// Documents the domain of the storage cost schedule; not enforced.
    pub max_storage_days: u32,
    /// Days between processing and sale of the finished product.
    pub processing_lead_days: u32,
    pub processing_cost_per_unit: f64,
    pub storage_cost_day1_per_unit: f64,
    pub storage_cost_day2plus_per_unit_per_day: f64,
    pub transport_cost_per_batch: f64,
    pub batch_size: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            processing_capacity: 60_000.0,
            max_stock: 20_000.0,
            max_storage_days: 10,
            processing_lead_days: 4,
            processing_cost_per_unit: 5.0,
            storage_cost_day1_per_unit: 0.28,
            storage_cost_day2plus_per_unit_per_day: 0.14,
            transport_cost_per_batch: 17_000.0,
            batch_size: 20_000.0,
        }
    }
}

/// Optional per-run replacements for individual config fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ConfigOverrides {
    pub processing_capacity: Option<f64>,
    pub max_stock: Option<f64>,
    pub max_storage_days: Option<u32>,
    pub processing_lead_days: Option<u32>,
    pub processing_cost_per_unit: Option<f64>,
    pub storage_cost_day1_per_unit: Option<f64>,
    pub storage_cost_day2plus_per_unit_per_day: Option<f64>,
    pub transport_cost_per_batch: Option<f64>,
    pub batch_size: Option<f64>,
}

impl PlantConfig {
    /// Loads a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| DecisionError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded plant config");
        Ok(config)
    }

    /// Returns a copy with every `Some` override applied.
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Self {
        Self {
            processing_capacity: overrides
                .processing_capacity
                .unwrap_or(self.processing_capacity),
            max_stock: overrides.max_stock.unwrap_or(self.max_stock),
            max_storage_days: overrides.max_storage_days.unwrap_or(self.max_storage_days),
            processing_lead_days: overrides
                .processing_lead_days
                .unwrap_or(self.processing_lead_days),
            processing_cost_per_unit: overrides
                .processing_cost_per_unit
                .unwrap_or(self.processing_cost_per_unit),
            storage_cost_day1_per_unit: overrides
                .storage_cost_day1_per_unit
                .unwrap_or(self.storage_cost_day1_per_unit),
            storage_cost_day2plus_per_unit_per_day: overrides
                .storage_cost_day2plus_per_unit_per_day
                .unwrap_or(self.storage_cost_day2plus_per_unit_per_day),
            transport_cost_per_batch: overrides
                .transport_cost_per_batch
                .unwrap_or(self.transport_cost_per_batch),
            batch_size: overrides.batch_size.unwrap_or(self.batch_size),
        }
    }

    /// Checks the preconditions every calculator relies on.
    pub fn validate(&self) -> Result<()> {
        positive("processing_capacity", self.processing_capacity)?;
        positive("batch_size", self.batch_size)?;
        non_negative("max_stock", self.max_stock)?;
        non_negative("processing_cost_per_unit", self.processing_cost_per_unit)?;
        non_negative("storage_cost_day1_per_unit", self.storage_cost_day1_per_unit)?;
        non_negative(
            "storage_cost_day2plus_per_unit_per_day",
            self.storage_cost_day2plus_per_unit_per_day,
        )?;
        non_negative("transport_cost_per_batch", self.transport_cost_per_batch)?;
        Ok(())
    }

    /// Transport cost spread over one unit of disposed material.
    ///
    /// A batch size that is not a positive number (zero, negative or NaN)
    /// is a division hazard.
    pub fn transport_cost_per_unit(&self) -> Result<f64> {
        if self.batch_size.is_nan() || self.batch_size <= 0.0 {
            return Err(DecisionError::DivisionHazard {
                what: "transport cost per unit",
            });
        }
        Ok(self.transport_cost_per_batch / self.batch_size)
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DecisionError::InvalidConfig {
            field,
            value,
            reason: "must be greater than zero",
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DecisionError::InvalidConfig {
            field,
            value,
            reason: "must not be negative",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = PlantConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.transport_cost_per_unit().unwrap(), 0.85);
    }

    #[test]
    fn overrides_leave_original_untouched() {
        let base = PlantConfig::default();
        let overrides = ConfigOverrides {
            processing_capacity: Some(50_000.0),
            max_stock: Some(0.0),
            ..Default::default()
        };
        let changed = base.with_overrides(&overrides);

        assert_eq!(changed.processing_capacity, 50_000.0);
        assert_eq!(changed.max_stock, 0.0);
        assert_eq!(changed.batch_size, base.batch_size);
        assert_eq!(base.processing_capacity, 60_000.0);
    }

    #[test]
    fn rejects_zero_capacity_and_batch() {
        let zero_capacity = PlantConfig {
            processing_capacity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_capacity.validate(),
            Err(DecisionError::InvalidConfig {
                field: "processing_capacity",
                ..
            })
        ));

        let zero_batch = PlantConfig {
            batch_size: 0.0,
            ..Default::default()
        };
        assert!(zero_batch.validate().is_err());
        assert!(matches!(
            zero_batch.transport_cost_per_unit(),
            Err(DecisionError::DivisionHazard { .. })
        ));
    }

    #[test]
    fn rejects_negative_and_nan_batch() {
        for batch_size in [-20_000.0, f64::NAN] {
            let config = PlantConfig {
                batch_size,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(DecisionError::InvalidConfig {
                    field: "batch_size",
                    ..
                })
            ));
            assert!(matches!(
                config.transport_cost_per_unit(),
                Err(DecisionError::DivisionHazard { .. })
            ));
        }
    }

    #[test]
    fn rejects_negative_max_stock() {
        let config = PlantConfig {
            max_stock: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "processing_capacity": 45000, "max_stock": 15000 }}"#).unwrap();

        let config = PlantConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.processing_capacity, 45_000.0);
        assert_eq!(config.max_stock, 15_000.0);
        assert_eq!(config.processing_cost_per_unit, 5.0);
        assert_eq!(config.max_storage_days, 10);
    }

    #[test]
    fn invalid_json_is_a_load_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            PlantConfig::from_json_file(file.path()),
            Err(DecisionError::ConfigLoad(_))
        ));
    }
}
