//! KPI Dashboard API Server Binary
//!
//! Run with: `cargo run --bin kpi-server`

use kpi_dashboard::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing is initialized in run_server(); RUST_LOG controls the level:
    //   RUST_LOG=kpi_dashboard=debug cargo run --bin kpi-server
    let config = ServerConfig::from_env();

    println!("Starting KPI Dashboard API Server...");
    println!("   Host: {}", config.host);
    println!("   Port: {}", config.port);
    println!("   Seed: {}", config.seed);
    println!(
        "   Series: {} to {}",
        config.history_start, config.reference_date
    );
    println!();
    println!("Available endpoints:");
    println!("  GET /health                       - Health check");
    println!("  GET /dashboard                    - Tiles, trend, funnel, alerts");
    println!("  GET /kpi/:field?start=&end=       - Single KPI with comparison");
    println!("  GET /alerts                       - Alerts for a period");
    println!("  GET /records?start=&end=          - Record table (json or csv)");
    println!();

    run_server(config).await?;

    Ok(())
}
