// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Backtest Engine - Rust Core Library
//!
//! Simulates a covered-call overlay on a long stock position, one trading
//! day at a time, over a historical or synthetic price path.
//!
//! # Pipeline
//!
//! - **`data`**: Daily OHLCV series via [`data::PriceHistorySource`], with a
//!   seeded random-walk fallback when no real source is wired up
//! - **`chain`**: Synthetic option chains rebuilt from each day's close
//!   (strike grid, approximate pricing, heuristic greeks)
//! - **`backtest`**: The simulation itself: entry selection, contract
//!   lifecycle (expiry, assignment, profit target, loss limit), and
//!   portfolio accounting
//! - **`metrics`**: Equity-curve performance measures and covered-call
//!   trade statistics
//! - **`storage`**: Repository ports for saved strategies and finished runs
//! - **`server`**: Axum HTTP adapter
//!
//! # Determinism
//!
//! Every source of randomness is seeded from the request. Two runs with the
//! same request and seed produce byte-identical reports.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod backtest;
pub mod chain;
pub mod data;
pub mod error;
pub mod metrics;
pub mod server;
pub mod storage;

pub use backtest::{BacktestReport, BacktestRequest, CoveredCallBacktester, StrategyParams};
pub use error::BacktestError;
