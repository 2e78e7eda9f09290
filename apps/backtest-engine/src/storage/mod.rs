//! Persistence ports for saved strategies and finished backtest runs.
//!
//! The HTTP layer talks to these traits only; the in-memory implementations
//! are the ones shipped, and a database-backed store slots in behind the
//! same ports.

mod in_memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backtest::{BacktestReport, StrategyParams};

pub use in_memory::{InMemoryBacktestResultRepository, InMemoryStrategyRepository};

/// A named, reusable set of strategy parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedStrategy {
    /// Strategy id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Ticker the strategy targets.
    pub ticker: String,
    /// The parameters themselves.
    pub params: StrategyParams,
    /// When the strategy was saved.
    pub created_at: DateTime<Utc>,
}

impl SavedStrategy {
    /// Save a new strategy with a fresh id.
    #[must_use]
    pub fn new(name: &str, ticker: &str, params: StrategyParams) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            ticker: ticker.to_string(),
            params,
            created_at: Utc::now(),
        }
    }
}

/// A finished backtest run kept for later retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBacktest {
    /// Result id.
    pub id: Uuid,
    /// When the run finished.
    pub created_at: DateTime<Utc>,
    /// The full report.
    pub report: BacktestReport,
}

impl StoredBacktest {
    /// Wrap a finished report with a fresh id.
    #[must_use]
    pub fn new(report: BacktestReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            report,
        }
    }
}

/// Errors surfaced by the persistence ports.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested record does not exist.
    #[error("record not found: {0}")]
    NotFound(Uuid),

    /// A storage lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// Store for named strategies.
#[async_trait]
pub trait StrategyRepository: Send + Sync {
    /// Persist a strategy.
    async fn save(&self, strategy: SavedStrategy) -> Result<(), StorageError>;

    /// All saved strategies, newest first.
    async fn list(&self) -> Result<Vec<SavedStrategy>, StorageError>;

    /// Delete a strategy by id.
    ///
    /// Returns [`StorageError::NotFound`] when no strategy has that id.
    async fn delete(&self, id: Uuid) -> Result<(), StorageError>;
}

/// Store for finished backtest runs.
#[async_trait]
pub trait BacktestResultRepository: Send + Sync {
    /// Persist a finished run.
    async fn save(&self, result: StoredBacktest) -> Result<(), StorageError>;

    /// The most recent runs, newest first, at most `limit`.
    async fn recent(&self, limit: usize) -> Result<Vec<StoredBacktest>, StorageError>;
}
