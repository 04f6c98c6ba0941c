//! Threshold alerts over the analysis window.
//!
//! Three fixed rules, evaluated independently and in order. A rule that lacks
//! enough data is skipped, never reported as passing or failing.

use crate::metrics::primitives::{mean, quantile};
use crate::record::{DailyRecord, MetricField};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
            Severity::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
}

impl Alert {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Alert {
            severity,
            message: message.into(),
        }
    }
}

pub const REVENUE_BELOW_TRAILING_AVERAGE: &str = "revenue below trailing average";
pub const CONVERSION_BELOW_THRESHOLD: &str = "conversion rate below threshold";
pub const ACTIVE_USERS_AT_PEAK: &str = "active users at peak";

/// Parameters of the alert rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Number of most recent records compared against the rest
    pub trailing_days: usize,
    /// Conversion rate (percent) under which the latest day is critical
    pub conversion_floor: f64,
    /// Quantile the latest active-user count must exceed
    pub peak_quantile: f64,
    /// Smallest window the peak quantile is computed over
    pub min_peak_sample: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        AlertThresholds {
            trailing_days: 7,
            conversion_floor: 2.0,
            peak_quantile: 0.95,
            min_peak_sample: 2,
        }
    }
}

fn field_values(records: &[DailyRecord], field: MetricField) -> Vec<f64> {
    records.iter().map(|record| record.value(field)).collect()
}

fn revenue_below_trailing_average(
    records: &[DailyRecord],
    thresholds: &AlertThresholds,
) -> Option<Alert> {
    let trailing = thresholds.trailing_days.max(1);
    if records.len() <= trailing {
        debug!(records = records.len(), trailing, "skipping trailing revenue rule");
        return None;
    }

    let revenue = field_values(records, MetricField::DailyRevenue);
    let (earlier, recent) = revenue.split_at(revenue.len() - trailing);
    let recent_mean = mean(recent)?;
    let earlier_mean = mean(earlier)?;

    (recent_mean < earlier_mean)
        .then(|| Alert::new(Severity::Warning, REVENUE_BELOW_TRAILING_AVERAGE))
}

fn conversion_below_floor(records: &[DailyRecord], thresholds: &AlertThresholds) -> Option<Alert> {
    let latest = records.last()?;
    (latest.conversion_rate < thresholds.conversion_floor)
        .then(|| Alert::new(Severity::Critical, CONVERSION_BELOW_THRESHOLD))
}

fn active_users_at_peak(records: &[DailyRecord], thresholds: &AlertThresholds) -> Option<Alert> {
    if records.len() < thresholds.min_peak_sample.max(2) {
        debug!(records = records.len(), "skipping peak users rule");
        return None;
    }

    let latest = records.last()?.active_users;
    let peak = quantile(
        &field_values(records, MetricField::ActiveUsers),
        thresholds.peak_quantile,
    )?;

    (latest > peak).then(|| Alert::new(Severity::Success, ACTIVE_USERS_AT_PEAK))
}

/// Evaluates the alert rules with the default thresholds.
///
/// Records are expected in chronological order; the last one is "latest".
pub fn evaluate_alerts(records: &[DailyRecord]) -> Vec<Alert> {
    evaluate_alerts_with(records, &AlertThresholds::default())
}

/// Evaluates the alert rules in order: trailing revenue, conversion floor,
/// active-user peak. Each rule yields at most one alert.
pub fn evaluate_alerts_with(records: &[DailyRecord], thresholds: &AlertThresholds) -> Vec<Alert> {
    let alerts: Vec<Alert> = [
        revenue_below_trailing_average(records, thresholds),
        conversion_below_floor(records, thresholds),
        active_users_at_peak(records, thresholds),
    ]
    .into_iter()
    .flatten()
    .collect();

    debug!(records = records.len(), alerts = alerts.len(), "evaluated alert rules");
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(revenue: &[f64], conversion: f64, users: &[f64]) -> Vec<DailyRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        revenue
            .iter()
            .zip(users.iter())
            .enumerate()
            .map(|(i, (rev, users))| {
                DailyRecord::new(start + Duration::days(i as i64))
                    .with_value(MetricField::DailyRevenue, *rev)
                    .with_value(MetricField::ConversionRate, conversion)
                    .with_value(MetricField::ActiveUsers, *users)
            })
            .collect()
    }

    #[test]
    fn test_trailing_revenue_drop_emits_only_warning() {
        let mut revenue = vec![100.0; 7];
        revenue.extend(vec![50.0; 7]);
        let records = series(&revenue, 3.0, &[500.0; 14]);

        let alerts = evaluate_alerts(&records);
        assert_eq!(
            alerts,
            vec![Alert::new(Severity::Warning, REVENUE_BELOW_TRAILING_AVERAGE)]
        );
    }

    #[test]
    fn test_trailing_rule_skipped_below_eight_records() {
        let records = series(&[100.0, 100.0, 10.0, 10.0, 10.0, 10.0, 10.0], 3.0, &[1.0; 7]);
        assert!(evaluate_alerts(&records).is_empty());
    }

    #[test]
    fn test_trailing_rule_with_eight_records() {
        let mut revenue = vec![100.0];
        revenue.extend(vec![99.0; 7]);
        let records = series(&revenue, 3.0, &[1.0; 8]);

        let alerts = evaluate_alerts(&records);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
    }

    #[test]
    fn test_low_latest_conversion_is_critical() {
        let mut records = series(&[100.0; 3], 3.0, &[1.0; 3]);
        records[2].conversion_rate = 1.5;

        let alerts = evaluate_alerts(&records);
        assert!(alerts.contains(&Alert::new(Severity::Critical, CONVERSION_BELOW_THRESHOLD)));
    }

    #[test]
    fn test_conversion_exactly_at_floor_is_not_critical() {
        let records = series(&[100.0], 2.0, &[1.0]);
        assert!(evaluate_alerts(&records).is_empty());
    }

    #[test]
    fn test_latest_users_above_p95_is_success() {
        let users: Vec<f64> = (1..=20).map(|i| i as f64 * 10.0).collect();
        let records = series(&[100.0; 20], 3.0, &users);

        let alerts = evaluate_alerts(&records);
        assert_eq!(
            alerts,
            vec![Alert::new(Severity::Success, ACTIVE_USERS_AT_PEAK)]
        );
    }

    #[test]
    fn test_peak_rule_skipped_for_single_record() {
        let records = series(&[100.0], 3.0, &[1_000_000.0]);
        assert!(evaluate_alerts(&records).is_empty());
    }

    #[test]
    fn test_peak_rule_with_two_records() {
        // p95 of [10, 30] interpolates to 29
        let rising = series(&[100.0, 100.0], 3.0, &[10.0, 30.0]);
        assert_eq!(
            evaluate_alerts(&rising),
            vec![Alert::new(Severity::Success, ACTIVE_USERS_AT_PEAK)]
        );

        let falling = series(&[100.0, 100.0], 3.0, &[30.0, 10.0]);
        assert!(evaluate_alerts(&falling).is_empty());
    }

    #[test]
    fn test_alerts_keep_rule_order() {
        let mut revenue = vec![100.0; 7];
        revenue.extend(vec![50.0; 7]);
        let mut users = vec![10.0; 13];
        users.push(1000.0);
        let records = series(&revenue, 1.0, &users);

        let severities: Vec<Severity> = evaluate_alerts(&records)
            .into_iter()
            .map(|alert| alert.severity)
            .collect();
        assert_eq!(
            severities,
            vec![Severity::Warning, Severity::Critical, Severity::Success]
        );
    }

    #[test]
    fn test_empty_window_has_no_alerts() {
        assert!(evaluate_alerts(&[]).is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let records = series(&[100.0, 100.0, 100.0], 2.5, &[1.0; 3]);
        let thresholds = AlertThresholds {
            conversion_floor: 3.0,
            ..AlertThresholds::default()
        };
        let alerts = evaluate_alerts_with(&records, &thresholds);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }
}
