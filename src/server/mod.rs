//! REST API exposing the dashboard

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

use crate::alerts::AlertThresholds;
use crate::generator::SyntheticDataSource;
use crate::time_series::DataSource;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: "127.0.0.1")
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// Seed for the synthetic series
    pub seed: u64,
    /// First generated day
    pub history_start: NaiveDate,
    /// Last generated day and default "today" for requests
    pub reference_date: NaiveDate,
    pub thresholds: AlertThresholds,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            seed: 2025,
            history_start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            reference_date: Utc::now().date_naive(),
            thresholds: AlertThresholds::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse::<T>().ok())
}

fn env_date(name: &str) -> Option<NaiveDate> {
    std::env::var(name)
        .ok()
        .and_then(|value| NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok())
}

impl ServerConfig {
    /// Creates a new server configuration with default generator settings
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ServerConfig {
            host: host.into(),
            port,
            ..ServerConfig::default()
        }
    }

    /// Reads `KPI_HOST`, `KPI_PORT`, `KPI_SEED`, `KPI_HISTORY_START` and
    /// `KPI_REFERENCE_DATE`, falling back to the defaults for anything unset
    /// or unparseable.
    pub fn from_env() -> Self {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: std::env::var("KPI_HOST").unwrap_or(defaults.host),
            port: env_parse("KPI_PORT").unwrap_or(defaults.port),
            seed: env_parse("KPI_SEED").unwrap_or(defaults.seed),
            history_start: env_date("KPI_HISTORY_START").unwrap_or(defaults.history_start),
            reference_date: env_date("KPI_REFERENCE_DATE").unwrap_or(defaults.reference_date),
            thresholds: defaults.thresholds,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builds application state from a synthetic series described by `config`.
pub fn synthetic_state(config: &ServerConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let source = SyntheticDataSource::new(config.seed, config.history_start, config.reference_date);
    let records = source.all_records()?;
    Ok(AppState::new(records, config.reference_date, config.thresholds))
}

/// Runs the API server
///
/// # Example
/// ```rust,no_run
/// use kpi_dashboard::server::{run_server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_server(ServerConfig::from_env()).await?;
///     Ok(())
/// }
/// ```
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG controls verbosity, e.g. RUST_LOG=kpi_dashboard=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let state = Arc::new(synthetic_state(&config)?);
    tracing::info!(
        records = state.records.len(),
        seed = config.seed,
        reference_date = %config.reference_date,
        "generated synthetic series"
    );

    let app = create_router(state);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
