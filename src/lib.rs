pub mod alerts;
pub mod comparison;
pub mod dashboard;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod record;
pub mod render;
pub mod server;
pub mod time_series;

#[cfg(test)]
mod integration_tests;

pub use alerts::{evaluate_alerts, evaluate_alerts_with, Alert, AlertThresholds, Severity};
pub use comparison::{derive_comparison_window, AnalysisPeriod, ComparisonMode};
pub use dashboard::{build_dashboard, DashboardQuery, DashboardReport, KpiTile};
pub use error::EngineError;
pub use generator::{generate_series, GeneratorProfile, SyntheticDataSource};
pub use metrics::{aggregate, compute_kpi, AggregateOp, KpiResult};
pub use record::{Category, DailyRecord, MetricField};
pub use render::{CsvRenderer, JsonRenderer, RenderError, Renderer};
pub use server::{run_server, ApiError, AppState, ServerConfig};
pub use time_series::{select_window, DataSource, DataSourceError, DateWindow, InMemoryDataSource};
