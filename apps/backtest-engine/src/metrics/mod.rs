//! Performance metrics for backtest evaluation.
//!
//! Covers the portfolio-level measures (total and annualized return, Sharpe
//! ratio, annualized volatility, maximum drawdown) plus trade statistics
//! specific to the covered-call strategy (win rate, close-reason counts,
//! premium totals). All ratio math runs on `Decimal`; annualization crosses
//! into `f64` only for the fractional exponent.

mod calculator;
mod constants;
mod math;
mod types;

pub use calculator::{covered_call_stats, PerformanceCalculator};
pub use types::{CoveredCallStats, PerformanceSummary};
