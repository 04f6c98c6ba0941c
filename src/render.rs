//! Renderers turn a [`DashboardReport`] into text for a presentation layer.

use crate::dashboard::DashboardReport;
use crate::record::DailyRecord;
use std::fmt;

/// Errors that can occur while rendering.
#[derive(Debug)]
pub enum RenderError {
    Json(serde_json::Error),
    Csv(csv::Error),
    /// Rendered bytes were not valid UTF-8
    Encoding(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Json(err) => write!(f, "JSON rendering failed: {}", err),
            RenderError::Csv(err) => write!(f, "CSV rendering failed: {}", err),
            RenderError::Encoding(msg) => write!(f, "Invalid output encoding: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Json(err)
    }
}

impl From<csv::Error> for RenderError {
    fn from(err: csv::Error) -> Self {
        RenderError::Csv(err)
    }
}

/// A presentation format for dashboard reports.
pub trait Renderer {
    /// MIME type of the rendered output.
    fn content_type(&self) -> &'static str;

    fn render(&self, report: &DashboardReport) -> Result<String, RenderError>;
}

/// Renders the whole report as JSON. Missing values become `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, report: &DashboardReport) -> Result<String, RenderError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(rendered)
    }
}

/// Renders the analysis-window record table as CSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl CsvRenderer {
    pub fn render_records(&self, records: &[DailyRecord]) -> Result<String, RenderError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "date",
            "daily_revenue",
            "daily_cost",
            "active_users",
            "conversion_rate",
            "customer_ltv",
            "customer_acquisition_cost",
            "category",
        ])?;

        for record in records {
            writer.write_record([
                record.date.format("%Y-%m-%d").to_string(),
                record.daily_revenue.to_string(),
                record.daily_cost.to_string(),
                record.active_users.to_string(),
                record.conversion_rate.to_string(),
                record.customer_ltv.to_string(),
                record.customer_acquisition_cost.to_string(),
                record
                    .category
                    .map(|category| category.to_string())
                    .unwrap_or_default(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| RenderError::Encoding(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| RenderError::Encoding(e.to_string()))
    }
}

impl Renderer for CsvRenderer {
    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn render(&self, report: &DashboardReport) -> Result<String, RenderError> {
        self.render_records(&report.records)
    }
}
