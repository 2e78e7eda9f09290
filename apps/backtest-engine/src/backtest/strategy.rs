//! Strategy parameters and candidate-selection tuning.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BacktestError;

/// Weekday gate for opening new positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntryDay {
    /// Open on any business day.
    #[default]
    Any,
    /// Monday entries only.
    Monday,
    /// Tuesday entries only.
    Tuesday,
    /// Wednesday entries only.
    Wednesday,
    /// Thursday entries only.
    Thursday,
    /// Friday entries only.
    Friday,
}

impl EntryDay {
    /// Whether `weekday` satisfies this gate.
    #[must_use]
    pub const fn matches(self, weekday: Weekday) -> bool {
        matches!(
            (self, weekday),
            (Self::Any, _)
                | (Self::Monday, Weekday::Mon)
                | (Self::Tuesday, Weekday::Tue)
                | (Self::Wednesday, Weekday::Wed)
                | (Self::Thursday, Weekday::Thu)
                | (Self::Friday, Weekday::Fri)
        )
    }
}

/// Immutable strategy parameters for one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Target call delta for new contracts, in (0, 1).
    pub delta_target: f64,
    /// Target days-to-expiration for new contracts.
    pub dte_target: u32,
    /// Close when this fraction of the premium has been captured.
    pub profit_target: Decimal,
    /// Close when the loss reaches this multiple of the premium.
    pub loss_limit: Decimal,
    /// Weekday gate for new entries.
    pub entry_day: EntryDay,
    /// Shares of the underlying the investor holds for the whole run.
    pub shares_owned: u32,
    /// Underlying shares backing one contract.
    pub shares_per_contract: u32,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            delta_target: 0.30,
            dte_target: 45,
            profit_target: Decimal::new(50, 2), // 0.50
            loss_limit: Decimal::new(2, 0),     // 2.0x premium
            entry_day: EntryDay::Monday,
            shares_owned: 1000,
            shares_per_contract: 100,
        }
    }
}

impl StrategyParams {
    /// Reject out-of-range parameters before the simulation starts.
    pub fn validate(&self) -> Result<(), BacktestError> {
        if self.delta_target <= 0.0 || self.delta_target >= 1.0 {
            return Err(BacktestError::InvalidParameters(format!(
                "delta_target must be in (0, 1), got {}",
                self.delta_target
            )));
        }
        if self.dte_target == 0 {
            return Err(BacktestError::InvalidParameters(
                "dte_target must be at least 1".to_string(),
            ));
        }
        if self.profit_target <= Decimal::ZERO {
            return Err(BacktestError::InvalidParameters(format!(
                "profit_target must be positive, got {}",
                self.profit_target
            )));
        }
        if self.loss_limit <= Decimal::ZERO {
            return Err(BacktestError::InvalidParameters(format!(
                "loss_limit must be positive, got {}",
                self.loss_limit
            )));
        }
        if self.shares_per_contract == 0 {
            return Err(BacktestError::InvalidParameters(
                "shares_per_contract must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Maximum number of contracts the covered shares can back.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.shares_owned / self.shares_per_contract
    }
}

/// Tolerance bands for candidate selection.
///
/// These were tuned ad hoc in practice and belong in configuration, not in
/// the algorithm; the defaults are the documented ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionTuning {
    /// DTE targets at or below this use the weekly window.
    pub weekly_dte_cutoff: u32,
    /// Allowed |dte - target| for short-dated targets.
    pub weekly_dte_window: u32,
    /// Allowed |dte - target| for longer-dated targets.
    pub monthly_dte_window: u32,
    /// Allowed |delta - target|.
    pub delta_window: f64,
    /// Strike must exceed spot by this fraction.
    pub min_otm_pct: f64,
    /// Minimum per-share premium for a new contract.
    pub min_premium: Decimal,
}

impl Default for SelectionTuning {
    fn default() -> Self {
        Self {
            weekly_dte_cutoff: 7,
            weekly_dte_window: 3,
            monthly_dte_window: 14,
            delta_window: 0.10,
            min_otm_pct: 0.01,
            min_premium: Decimal::new(50, 2), // $0.50
        }
    }
}

impl SelectionTuning {
    /// DTE window that applies to the given target.
    #[must_use]
    pub const fn dte_window(&self, dte_target: u32) -> u32 {
        if dte_target <= self.weekly_dte_cutoff {
            self.weekly_dte_window
        } else {
            self.monthly_dte_window
        }
    }
}
