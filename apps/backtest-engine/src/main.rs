//! Backtest Engine Binary
//!
//! Starts the covered-call backtest HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin backtest-engine
//! ```
//!
//! # Environment Variables
//!
//! - `HTTP_PORT`: HTTP server port (default: 8001)
//! - `RISK_FREE_RATE`: Annual risk-free rate for Sharpe (default: 0.02)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use backtest_engine::server::{create_router, AppState};
use backtest_engine::storage::{InMemoryBacktestResultRepository, InMemoryStrategyRepository};
use backtest_engine::CoveredCallBacktester;
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::signal;

/// Default HTTP server port.
const DEFAULT_HTTP_PORT: u16 = 8001;

/// Default annual risk-free rate.
const DEFAULT_RISK_FREE_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Parsed configuration from environment variables.
struct EngineConfig {
    http_port: u16,
    risk_free_rate: Decimal,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting backtest engine");

    let config = parse_config();
    tracing::info!(
        http_port = config.http_port,
        risk_free_rate = %config.risk_free_rate,
        "Configuration loaded"
    );

    let engine = Arc::new(
        CoveredCallBacktester::new().with_risk_free_rate(config.risk_free_rate),
    );
    let state = AppState::new(
        engine,
        Arc::new(InMemoryStrategyRepository::new()),
        Arc::new(InMemoryBacktestResultRepository::new()),
    );
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Backtest engine stopped");
    Ok(())
}

/// Initialize the tracing subscriber with environment filter.
///
/// Uses static directive strings that are compile-time constants guaranteed to parse.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "backtest_engine=info"
                    .parse()
                    .expect("static directive 'backtest_engine=info' is valid"),
            ),
        )
        .init();
}

/// Parse configuration from environment variables, falling back to defaults
/// on missing or unparseable values.
fn parse_config() -> EngineConfig {
    let http_port = std::env::var("HTTP_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_HTTP_PORT);

    let risk_free_rate = std::env::var("RISK_FREE_RATE")
        .ok()
        .and_then(|v| Decimal::from_str(&v).ok())
        .unwrap_or(DEFAULT_RISK_FREE_RATE);

    EngineConfig {
        http_port,
        risk_free_rate,
    }
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
