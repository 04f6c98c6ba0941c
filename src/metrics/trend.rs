//! Least-squares trend line for a metric over a window.

use crate::metrics::primitives::linear_fit;
use crate::record::{DailyRecord, MetricField};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single observed value with its fitted trend value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub trend: f64,
}

/// Straight line fitted over record positions (0, 1, 2, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub field: MetricField,
    /// Change per record
    pub slope: f64,
    pub intercept: f64,
    pub points: Vec<TrendPoint>,
}

impl TrendLine {
    /// Fitted value at record position `index`.
    pub fn value_at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

/// Fits a trend line to `field` over `records`.
///
/// Positions are record indices, not calendar days, so gaps in the series do
/// not stretch the line. Returns `None` for an empty window.
pub fn fit_trend(records: &[DailyRecord], field: MetricField) -> Option<TrendLine> {
    let values: Vec<f64> = records.iter().map(|record| record.value(field)).collect();
    let (slope, intercept) = linear_fit(&values)?;

    let points = records
        .iter()
        .enumerate()
        .map(|(index, record)| TrendPoint {
            date: record.date,
            value: record.value(field),
            trend: intercept + slope * index as f64,
        })
        .collect();

    Some(TrendLine {
        field,
        slope,
        intercept,
        points,
    })
}
