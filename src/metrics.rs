//! Metrics Engine
//!
//! Aggregates daily records over a window and compares two windows. Every
//! function here is pure: the same inputs always produce the same outputs,
//! and empty inputs produce `None` instead of a division error.

pub mod funnel;
pub mod primitives;
pub mod trend;

use crate::error::EngineError;
use crate::record::{DailyRecord, MetricField};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation applied to a metric field across a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    Sum,
    Mean,
}

impl AggregateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Mean => "mean",
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AggregateOp {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "sum" => Ok(AggregateOp::Sum),
            "mean" | "avg" | "average" => Ok(AggregateOp::Mean),
            _ => Err(EngineError::InvalidOp(value.to_string())),
        }
    }
}

/// Current value, baseline value and percentage change of one KPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiResult {
    /// Aggregate over the analysis window
    pub current_value: Option<f64>,
    /// Aggregate over the comparison window
    pub baseline_value: Option<f64>,
    /// Percentage change; `None` means "not available", never 0%
    pub delta_percent: Option<f64>,
}

impl KpiResult {
    /// Formats the delta the way a metric tile shows it.
    pub fn delta_label(&self) -> String {
        match self.delta_percent {
            Some(delta) => format!("{:.2}%", delta),
            None => "N/A".to_string(),
        }
    }
}

/// Aggregates one field across `records`.
///
/// # Returns
/// `None` when `records` is empty, so an empty window is never mistaken for
/// a genuine zero total.
///
/// # Examples
/// ```
/// use kpi_dashboard::metrics::{aggregate, AggregateOp};
/// use kpi_dashboard::record::MetricField;
///
/// assert_eq!(aggregate(&[], MetricField::DailyRevenue, AggregateOp::Sum), None);
/// ```
pub fn aggregate(records: &[DailyRecord], field: MetricField, op: AggregateOp) -> Option<f64> {
    if records.is_empty() {
        return None;
    }

    let values: Vec<f64> = records.iter().map(|record| record.value(field)).collect();
    match op {
        AggregateOp::Sum => primitives::sum(&values),
        AggregateOp::Mean => primitives::mean(&values),
    }
}

/// Percentage change from `baseline` to `current`.
///
/// Undefined (None) when either side is missing or the baseline is zero.
pub fn delta_percent(current: Option<f64>, baseline: Option<f64>) -> Option<f64> {
    let (current, baseline) = (current?, baseline?);
    if baseline == 0.0 || !baseline.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - baseline) / baseline * 100.0)
}

/// Computes a KPI for `field`/`op` over the analysis and comparison windows.
pub fn compute_kpi(
    current_records: &[DailyRecord],
    baseline_records: &[DailyRecord],
    field: MetricField,
    op: AggregateOp,
) -> KpiResult {
    let current_value = aggregate(current_records, field, op);
    let baseline_value = aggregate(baseline_records, field, op);

    KpiResult {
        current_value,
        baseline_value,
        delta_percent: delta_percent(current_value, baseline_value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn records(revenue: &[f64]) -> Vec<DailyRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        revenue
            .iter()
            .enumerate()
            .map(|(i, value)| {
                DailyRecord::new(start + Duration::days(i as i64))
                    .with_value(MetricField::DailyRevenue, *value)
            })
            .collect()
    }

    #[test]
    fn test_aggregate_empty_is_none_for_every_field() {
        for field in MetricField::ALL {
            assert_eq!(aggregate(&[], field, AggregateOp::Sum), None);
            assert_eq!(aggregate(&[], field, AggregateOp::Mean), None);
        }
    }

    #[test]
    fn test_aggregate_sum_and_mean() {
        let data = records(&[100.0, 200.0, 300.0]);
        assert_eq!(aggregate(&data, MetricField::DailyRevenue, AggregateOp::Sum), Some(600.0));
        assert_eq!(aggregate(&data, MetricField::DailyRevenue, AggregateOp::Mean), Some(200.0));
    }

    #[test]
    fn test_compute_kpi_delta() {
        let current = records(&[110.0, 110.0]);
        let baseline = records(&[100.0, 100.0]);
        let kpi = compute_kpi(&current, &baseline, MetricField::DailyRevenue, AggregateOp::Sum);

        assert_eq!(kpi.current_value, Some(220.0));
        assert_eq!(kpi.baseline_value, Some(200.0));
        assert!((kpi.delta_percent.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(kpi.delta_label(), "10.00%");
    }

    #[test]
    fn test_compute_kpi_zero_baseline_has_no_delta() {
        let current = records(&[50.0]);
        let baseline = records(&[0.0, 0.0]);
        let kpi = compute_kpi(&current, &baseline, MetricField::DailyRevenue, AggregateOp::Sum);

        assert_eq!(kpi.baseline_value, Some(0.0));
        assert_eq!(kpi.delta_percent, None);
        assert_eq!(kpi.delta_label(), "N/A");
    }

    #[test]
    fn test_compute_kpi_empty_windows_have_no_delta() {
        let data = records(&[50.0]);
        let no_baseline = compute_kpi(&data, &[], MetricField::DailyRevenue, AggregateOp::Mean);
        assert_eq!(no_baseline.baseline_value, None);
        assert_eq!(no_baseline.delta_percent, None);

        let no_current = compute_kpi(&[], &data, MetricField::DailyRevenue, AggregateOp::Mean);
        assert_eq!(no_current.current_value, None);
        assert_eq!(no_current.delta_percent, None);
    }

    #[test]
    fn test_negative_baseline_keeps_sign_of_formula() {
        assert_eq!(delta_percent(Some(-50.0), Some(-100.0)), Some(-50.0));
    }

    #[test]
    fn test_aggregate_op_parsing() {
        assert_eq!("SUM".parse::<AggregateOp>().unwrap(), AggregateOp::Sum);
        assert_eq!("average".parse::<AggregateOp>().unwrap(), AggregateOp::Mean);
        assert_eq!(
            "median".parse::<AggregateOp>().unwrap_err(),
            EngineError::InvalidOp("median".to_string())
        );
    }
}
