//! Axum router and handlers.
//!
//! Backtest runs are CPU-bound and execute on the blocking pool so the
//! runtime stays responsive while a long simulation is in flight.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::backtest::{BacktestRequest, CoveredCallBacktester};
use crate::error::BacktestError;
use crate::storage::{
    BacktestResultRepository, SavedStrategy, StorageError, StoredBacktest, StrategyRepository,
};

/// Most recent results returned by the results endpoint.
const RECENT_RESULTS_LIMIT: usize = 50;

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<CoveredCallBacktester>,
    strategies: Arc<dyn StrategyRepository>,
    results: Arc<dyn BacktestResultRepository>,
    version: &'static str,
}

impl AppState {
    /// Wire the engine and repositories together.
    #[must_use]
    pub fn new(
        engine: Arc<CoveredCallBacktester>,
        strategies: Arc<dyn StrategyRepository>,
        results: Arc<dyn BacktestResultRepository>,
    ) -> Self {
        Self {
            engine,
            strategies,
            results,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Create the Axum router with all endpoints.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/backtest", post(run_backtest))
        .route("/api/backtest-results", get(recent_results))
        .route("/api/strategies", get(list_strategies))
        .route("/api/strategies/{id}", delete(delete_strategy))
        .with_state(state)
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: state.version,
    })
}

/// Request to run a backtest, optionally saving its parameters as a named
/// strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunBacktestRequest {
    /// The run itself.
    #[serde(flatten)]
    pub request: BacktestRequest,
    /// When present, persist the strategy parameters under this name.
    #[serde(default)]
    pub save_strategy_as: Option<String>,
}

async fn run_backtest(
    State(state): State<AppState>,
    Json(req): Json<RunBacktestRequest>,
) -> Result<Json<StoredBacktest>, ApiError> {
    info!(
        ticker = %req.request.ticker,
        start = %req.request.start_date,
        end = %req.request.end_date,
        "Backtest requested"
    );

    let engine = Arc::clone(&state.engine);
    let request = req.request;
    let report = tokio::task::spawn_blocking(move || engine.run(&request))
        .await
        .map_err(|e| ApiError::Internal(format!("backtest task failed: {e}")))??;

    if let Some(name) = req.save_strategy_as {
        let strategy = SavedStrategy::new(&name, &report.ticker, report.params.clone());
        info!(strategy_id = %strategy.id, name = %strategy.name, "Saving strategy");
        state.strategies.save(strategy).await?;
    }

    let stored = StoredBacktest::new(report);
    state.results.save(stored.clone()).await?;
    Ok(Json(stored))
}

async fn recent_results(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredBacktest>>, ApiError> {
    let results = state.results.recent(RECENT_RESULTS_LIMIT).await?;
    Ok(Json(results))
}

async fn list_strategies(
    State(state): State<AppState>,
) -> Result<Json<Vec<SavedStrategy>>, ApiError> {
    let strategies = state.strategies.list().await?;
    Ok(Json(strategies))
}

async fn delete_strategy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.strategies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// API-level error, mapped onto an HTTP status and JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request rejected before the run started.
    #[error("{0}")]
    BadRequest(String),
    /// Requested data or record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Unexpected server-side failure.
    #[error("{0}")]
    Internal(String),
}

impl From<BacktestError> for ApiError {
    fn from(err: BacktestError) -> Self {
        match err {
            BacktestError::NoData(_) => Self::NotFound(err.to_string()),
            BacktestError::InvalidParameters(_) | BacktestError::InvalidDateRange(_, _) => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => Self::NotFound(err.to_string()),
            StorageError::LockPoisoned => Self::Internal(err.to_string()),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
