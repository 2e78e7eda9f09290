//! Error taxonomy for the backtest engine.
//!
//! Only data-availability and parameter-validation failures surface to the
//! caller. Quote lookup misses and degenerate metrics are recovered locally
//! (skip the day, default the metric) and never become errors.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by a backtest run.
#[derive(Debug, Error)]
pub enum BacktestError {
    /// No price history available for the ticker, even after fallback.
    #[error("no price data available for {0}")]
    NoData(String),

    /// Strategy or request parameters rejected before simulation.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// End date precedes start date.
    #[error("invalid date range: start {0} is after end {1}")]
    InvalidDateRange(NaiveDate, NaiveDate),
}
