//! HTTP request handlers for API endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;
use crate::alerts::{evaluate_alerts_with, Alert};
use crate::comparison::{derive_comparison_window, AnalysisPeriod, ComparisonMode};
use crate::dashboard::{build_dashboard, filter_records, first_record_date, DashboardQuery};
use crate::metrics::{compute_kpi, AggregateOp, KpiResult};
use crate::record::{Category, MetricField};
use crate::render::{CsvRenderer, JsonRenderer, Renderer};
use crate::time_series::{select_window, DateWindow};

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

fn parse_date(value: &str, label: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ApiError::InvalidDateRange(format!("Invalid {} date: {}", label, e)))
}

fn parse_or_default<T>(value: Option<&str>) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = crate::error::EngineError> + Default,
{
    match value {
        Some(raw) => Ok(raw.parse::<T>()?),
        None => Ok(T::default()),
    }
}

fn reference_date(state: &AppState, value: Option<&str>) -> Result<NaiveDate, ApiError> {
    value.map_or(Ok(state.reference_date), |raw| parse_date(raw, "reference"))
}

fn parse_window(start: &str, end: &str) -> Result<DateWindow, ApiError> {
    let start = parse_date(start, "start")?;
    let end = parse_date(end, "end")?;
    Ok(DateWindow::new(start, end)?)
}

/// Query parameters shared by the dashboard views
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub period: Option<String>,
    pub category: Option<String>,
    pub comparison: Option<String>,
    pub reference_date: Option<String>,
    /// `json` (default) or `csv`
    pub format: Option<String>,
}

impl DashboardParams {
    fn to_query(&self, state: &AppState) -> Result<DashboardQuery, ApiError> {
        Ok(DashboardQuery {
            period: parse_or_default::<AnalysisPeriod>(self.period.as_deref())?,
            category: parse_or_default::<Category>(self.category.as_deref())?,
            comparison: parse_or_default::<ComparisonMode>(self.comparison.as_deref())?,
            reference_date: reference_date(state, self.reference_date.as_deref())?,
            thresholds: state.thresholds,
        })
    }
}

fn renderer_for(format: Option<&str>) -> Result<Box<dyn Renderer + Send>, ApiError> {
    match format.unwrap_or("json") {
        "json" => Ok(Box::new(JsonRenderer::default())),
        "csv" => Ok(Box::new(CsvRenderer)),
        other => Err(ApiError::InvalidParameter(format!(
            "Unknown format: {}",
            other
        ))),
    }
}

/// GET /dashboard - Tiles, trend, funnel, alerts and records for one selection
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<Response, ApiError> {
    let query = params.to_query(&state)?;
    let renderer = renderer_for(params.format.as_deref())?;

    let report = build_dashboard(&state.records, &query)?;
    let body = renderer.render(&report)?;

    Ok(([(header::CONTENT_TYPE, renderer.content_type())], body).into_response())
}

/// Query parameters for a single KPI
#[derive(Debug, Deserialize)]
pub struct KpiParams {
    pub start: String,
    pub end: String,
    pub op: Option<String>,
    pub comparison: Option<String>,
    pub category: Option<String>,
    pub reference_date: Option<String>,
}

/// Response for a single KPI
#[derive(Debug, Serialize)]
pub struct KpiResponse {
    pub field: MetricField,
    pub op: AggregateOp,
    pub comparison: ComparisonMode,
    pub analysis_window: DateWindow,
    pub comparison_window: DateWindow,
    #[serde(flatten)]
    pub kpi: KpiResult,
}

/// GET /kpi/{field} - One KPI over an explicit `[start, end)` window
pub async fn get_kpi(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
    Query(params): Query<KpiParams>,
) -> Result<Json<KpiResponse>, ApiError> {
    let field = field.parse::<MetricField>()?;
    let op = match params.op.as_deref() {
        Some(raw) => raw.parse::<AggregateOp>()?,
        None => AggregateOp::Sum,
    };
    let comparison = parse_or_default::<ComparisonMode>(params.comparison.as_deref())?;
    let category = parse_or_default::<Category>(params.category.as_deref())?;
    let reference = reference_date(&state, params.reference_date.as_deref())?;

    let analysis_window = parse_window(&params.start, &params.end)?;
    let comparison_window = derive_comparison_window(&analysis_window, comparison, reference)?;

    let current = filter_records(&state.records, &analysis_window, category);
    let baseline = filter_records(&state.records, &comparison_window, category);

    Ok(Json(KpiResponse {
        field,
        op,
        comparison,
        analysis_window,
        comparison_window,
        kpi: compute_kpi(&current, &baseline, field, op),
    }))
}

/// Response for alert evaluation
#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub analysis_window: DateWindow,
    pub alerts: Vec<Alert>,
}

/// GET /alerts - Alerts for the selected analysis period
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<AlertsResponse>, ApiError> {
    let query = params.to_query(&state)?;
    let analysis_window = query
        .period
        .window(query.reference_date, first_record_date(&state.records))?;
    let records = filter_records(&state.records, &analysis_window, query.category);

    Ok(Json(AlertsResponse {
        analysis_window,
        alerts: evaluate_alerts_with(&records, &query.thresholds),
    }))
}

/// Query parameters for the record table
#[derive(Debug, Deserialize)]
pub struct RecordsParams {
    pub start: String,
    pub end: String,
    /// `json` (default) or `csv`
    pub format: Option<String>,
}

/// GET /records - Raw daily records in `[start, end)`
pub async fn get_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsParams>,
) -> Result<Response, ApiError> {
    let window = parse_window(&params.start, &params.end)?;
    let records = select_window(&state.records, &window);

    match params.format.as_deref().unwrap_or("json") {
        "json" => Ok(Json(json!({
            "start": window.start,
            "end": window.end,
            "records": records,
        }))
        .into_response()),
        "csv" => {
            let body = CsvRenderer.render_records(&records)?;
            Ok(([(header::CONTENT_TYPE, "text/csv")], body).into_response())
        }
        other => Err(ApiError::InvalidParameter(format!(
            "Unknown format: {}",
            other
        ))),
    }
}
