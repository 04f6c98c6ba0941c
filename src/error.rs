//! Input errors raised by the metrics engine.
//!
//! Empty windows and short samples are not errors: they surface as `None`
//! aggregates and skipped alert rules.

use chrono::NaiveDate;
use std::fmt;

/// Rejected inputs. Each one is fatal to the request that carried it only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Comparison mode is not one of the supported modes
    InvalidMode(String),
    /// Analysis period is not one of the supported periods
    InvalidPeriod(String),
    /// Unknown category name
    InvalidCategory(String),
    /// Unknown metric field name
    InvalidField(String),
    /// Unknown aggregation operation
    InvalidOp(String),
    /// Window whose start lies after its end
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    /// Window arithmetic around this date leaves the representable calendar
    DateOutOfRange(NaiveDate),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidMode(mode) => write!(f, "Unknown comparison mode: {}", mode),
            EngineError::InvalidPeriod(period) => write!(f, "Unknown analysis period: {}", period),
            EngineError::InvalidCategory(category) => write!(f, "Unknown category: {}", category),
            EngineError::InvalidField(field) => write!(f, "Unknown metric field: {}", field),
            EngineError::InvalidOp(op) => write!(f, "Unknown aggregation: {}", op),
            EngineError::InvalidWindow { start, end } => {
                write!(f, "Window start {} is after end {}", start, end)
            }
            EngineError::DateOutOfRange(date) => {
                write!(f, "Date {} is outside the supported calendar range", date)
            }
        }
    }
}

impl std::error::Error for EngineError {}
