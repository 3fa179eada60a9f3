// src/error.rs

use thiserror::Error;

/// Everything that can go wrong while validating, deciding or reporting.
///
/// Every error is local to the call that produced it. No partial decision
/// exists when one of these is returned.
#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("invalid input `{field}`: {value} (must be finite and non-negative)")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("current stock {current_stock} exceeds max stock {max_stock}")]
    StockExceedsMax { current_stock: f64, max_stock: f64 },

    #[error("invalid configuration `{field}`: {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("division by zero while computing {what}")]
    DivisionHazard { what: &'static str },

    #[error("failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("invalid distribution parameters: {0}")]
    Distribution(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DecisionError>;

/// Rejects negative, NaN and infinite values for a named field.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DecisionError::InvalidInput { field, value })
    }
}
