//! Covered-call simulation: strategy rules, position lifecycle, accounting.
//!
//! One [`CoveredCallBacktester::run`] call owns all of its mutable state
//! (cash, open contracts, ledger), processes each business day in full
//! (close-checks, then the open-check, then a snapshot) and never looks
//! ahead. Independent runs share nothing and can execute concurrently.

mod engine;
mod portfolio;
mod position;
mod strategy;
mod trade;

pub use engine::{BacktestReport, BacktestRequest, CoveredCallBacktester, UnderlyingSummary};
pub use portfolio::{DailySnapshot, Portfolio};
pub use position::{ContractStatus, OptionContract, StockHolding};
pub use strategy::{EntryDay, SelectionTuning, StrategyParams};
pub use trade::{CloseReason, ClosedTrade};
