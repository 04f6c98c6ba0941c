//! Dashboard assembly
//!
//! Turns one user selection (period, category, comparison baseline and
//! reference date) into every value the dashboard displays. Nothing is cached:
//! each call recomputes from the record slice it is given.

use crate::alerts::{evaluate_alerts_with, Alert, AlertThresholds};
use crate::comparison::{derive_comparison_window, AnalysisPeriod, ComparisonMode};
use crate::error::EngineError;
use crate::metrics::funnel::{sales_funnel, FunnelStage};
use crate::metrics::trend::{fit_trend, TrendLine};
use crate::metrics::{aggregate, compute_kpi, AggregateOp, KpiResult};
use crate::record::{Category, DailyRecord, MetricField};
use crate::time_series::{select_window, DateWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One dashboard request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub period: AnalysisPeriod,
    pub category: Category,
    pub comparison: ComparisonMode,
    /// The day treated as "today"
    pub reference_date: NaiveDate,
    #[serde(default)]
    pub thresholds: AlertThresholds,
}

impl DashboardQuery {
    pub fn new(reference_date: NaiveDate) -> Self {
        DashboardQuery {
            period: AnalysisPeriod::default(),
            category: Category::default(),
            comparison: ComparisonMode::default(),
            reference_date,
            thresholds: AlertThresholds::default(),
        }
    }

    pub fn with_period(mut self, period: AnalysisPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_comparison(mut self, comparison: ComparisonMode) -> Self {
        self.comparison = comparison;
        self
    }
}

/// A metric tile: a labelled KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiTile {
    pub label: String,
    pub field: MetricField,
    pub op: AggregateOp,
    #[serde(flatten)]
    pub kpi: KpiResult,
}

/// Tiles shown on the dashboard, in display order.
pub const TILES: [(&str, MetricField, AggregateOp); 4] = [
    ("Total revenue", MetricField::DailyRevenue, AggregateOp::Sum),
    ("Total costs", MetricField::DailyCost, AggregateOp::Sum),
    ("Active users", MetricField::ActiveUsers, AggregateOp::Sum),
    ("Conversion rate", MetricField::ConversionRate, AggregateOp::Mean),
];

/// Everything the dashboard displays for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub query: DashboardQuery,
    pub analysis_window: DateWindow,
    pub comparison_window: DateWindow,
    pub tiles: Vec<KpiTile>,
    /// Mean daily active users over the analysis window
    pub average_daily_users: Option<f64>,
    pub revenue_trend: Option<TrendLine>,
    pub funnel: Vec<FunnelStage>,
    pub alerts: Vec<Alert>,
    /// Filtered analysis-window records, oldest first
    pub records: Vec<DailyRecord>,
}

/// Records in `window` that belong to `category`.
pub fn filter_records(
    records: &[DailyRecord],
    window: &DateWindow,
    category: Category,
) -> Vec<DailyRecord> {
    select_window(records, window)
        .into_iter()
        .filter(|record| record.matches_category(category))
        .collect()
}

/// Earliest record date, regardless of slice order.
pub fn first_record_date(records: &[DailyRecord]) -> Option<NaiveDate> {
    records.iter().map(|record| record.date).min()
}

/// Builds the dashboard for `query` over `records`.
///
/// `records` must be ordered by date for the alert rules, which read the
/// latest record from the end. The category filter is applied to the
/// analysis and comparison windows alike.
///
/// # Errors
/// Returns [`EngineError::DateOutOfRange`] when either window cannot be
/// represented around `query.reference_date`.
pub fn build_dashboard(
    records: &[DailyRecord],
    query: &DashboardQuery,
) -> Result<DashboardReport, EngineError> {
    let analysis_window = query
        .period
        .window(query.reference_date, first_record_date(records))?;
    let comparison_window =
        derive_comparison_window(&analysis_window, query.comparison, query.reference_date)?;

    let current = filter_records(records, &analysis_window, query.category);
    let baseline = filter_records(records, &comparison_window, query.category);

    debug!(
        period = %query.period,
        comparison = %query.comparison,
        category = %query.category,
        current = current.len(),
        baseline = baseline.len(),
        "resolved dashboard windows"
    );

    let tiles = TILES
        .iter()
        .map(|(label, field, op)| KpiTile {
            label: label.to_string(),
            field: *field,
            op: *op,
            kpi: compute_kpi(&current, &baseline, *field, *op),
        })
        .collect();

    let total_users = aggregate(&current, MetricField::ActiveUsers, AggregateOp::Sum);

    Ok(DashboardReport {
        query: query.clone(),
        analysis_window,
        comparison_window,
        tiles,
        average_daily_users: aggregate(&current, MetricField::ActiveUsers, AggregateOp::Mean),
        revenue_trend: fit_trend(&current, MetricField::DailyRevenue),
        funnel: sales_funnel(total_users.unwrap_or(0.0)),
        alerts: evaluate_alerts_with(&current, &query.thresholds),
        records: current,
    })
}
