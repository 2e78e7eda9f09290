//! Performance calculator over the daily snapshot curve and trade ledger.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::constants::{HUNDRED, TRADING_DAYS};
use super::math::{sqrt_decimal, std_dev};
use super::types::{CoveredCallStats, PerformanceSummary};
use crate::backtest::{CloseReason, ClosedTrade, DailySnapshot};

/// Computes [`PerformanceSummary`] metrics from a finished snapshot curve.
#[derive(Debug)]
pub struct PerformanceCalculator<'a> {
    snapshots: &'a [DailySnapshot],
    risk_free_rate: Decimal,
}

impl<'a> PerformanceCalculator<'a> {
    /// Create a calculator over a snapshot curve with an annual risk-free
    /// rate (`0.02` for 2%).
    #[must_use]
    pub const fn new(snapshots: &'a [DailySnapshot], risk_free_rate: Decimal) -> Self {
        Self {
            snapshots,
            risk_free_rate,
        }
    }

    /// Calculate all portfolio-level metrics.
    #[must_use]
    pub fn summarize(&self) -> PerformanceSummary {
        let (Some(first), Some(last)) = (self.snapshots.first(), self.snapshots.last()) else {
            return PerformanceSummary::default();
        };

        let initial_value = first.portfolio_value;
        let final_value = last.portfolio_value;
        let total_return = if initial_value > Decimal::ZERO {
            (final_value - initial_value) / initial_value
        } else {
            Decimal::ZERO
        };

        let returns = self.daily_returns();
        let annualized_return = Self::annualize(total_return, returns.len());
        let volatility = std_dev(&returns)
            .zip(sqrt_decimal(TRADING_DAYS))
            .map_or(Decimal::ZERO, |(std, annualizer)| std * annualizer);
        let sharpe_ratio = if volatility == Decimal::ZERO {
            Decimal::ZERO
        } else {
            (annualized_return - self.risk_free_rate) / volatility
        };

        PerformanceSummary {
            initial_value,
            final_value,
            total_return_pct: total_return * HUNDRED,
            annualized_return_pct: annualized_return * HUNDRED,
            volatility_pct: volatility * HUNDRED,
            sharpe_ratio,
            max_drawdown_pct: self.max_drawdown() * HUNDRED,
        }
    }

    /// Day-over-day portfolio returns. The first day has no prior close, so
    /// its return is zero, keeping the series aligned with the snapshots.
    fn daily_returns(&self) -> Vec<Decimal> {
        let mut returns = Vec::with_capacity(self.snapshots.len());
        if self.snapshots.is_empty() {
            return returns;
        }
        returns.push(Decimal::ZERO);
        for window in self.snapshots.windows(2) {
            let prev = window[0].portfolio_value;
            let curr = window[1].portfolio_value;
            // A non-positive prior value has no meaningful return; record
            // zero so the series stays one-per-snapshot.
            if prev > Decimal::ZERO {
                returns.push((curr - prev) / prev);
            } else {
                returns.push(Decimal::ZERO);
            }
        }
        returns
    }

    /// Worst peak-to-trough decline as a fraction, zero or negative.
    fn max_drawdown(&self) -> Decimal {
        let mut peak = Decimal::ZERO;
        let mut worst = Decimal::ZERO;

        for snapshot in self.snapshots {
            peak = peak.max(snapshot.portfolio_value);
            if peak > Decimal::ZERO {
                worst = worst.min((snapshot.portfolio_value - peak) / peak);
            }
        }
        worst
    }

    /// Compound annualization over the trading days of the run:
    /// `(1 + r)^(252 / n_days) - 1`. The fractional exponent crosses into
    /// `f64` and back.
    fn annualize(total_return: Decimal, trading_days: usize) -> Decimal {
        if trading_days == 0 {
            return Decimal::ZERO;
        }
        let growth = Decimal::ONE + total_return;
        if growth <= Decimal::ZERO {
            return -Decimal::ONE;
        }
        let Some(growth_f) = growth.to_f64() else {
            return Decimal::ZERO;
        };
        #[allow(clippy::cast_precision_loss)]
        let annualized = growth_f.powf(252.0 / trading_days as f64) - 1.0;
        Decimal::from_f64_retain(annualized).unwrap_or_default()
    }
}

/// Aggregate the closed-trade ledger into strategy statistics.
#[must_use]
pub fn covered_call_stats(trades: &[ClosedTrade], total_premium_collected: Decimal) -> CoveredCallStats {
    let total_trades = trades.len() as u64;
    let mut stats = CoveredCallStats {
        total_trades,
        total_premium_collected,
        ..CoveredCallStats::default()
    };

    for trade in trades {
        stats.total_option_pnl += trade.option_pnl;
        if trade.is_winner() {
            stats.winning_trades += 1;
        }
        match trade.reason {
            CloseReason::ExpiredWorthless => stats.expired_worthless += 1,
            CloseReason::Assigned => stats.assigned += 1,
            CloseReason::ProfitTarget => stats.profit_target_closes += 1,
            CloseReason::LossLimit => stats.loss_limit_closes += 1,
        }
    }

    if total_trades > 0 {
        let count = Decimal::from(total_trades);
        stats.win_rate_pct = Decimal::from(stats.winning_trades) / count * HUNDRED;
        stats.expired_worthless_pct = Decimal::from(stats.expired_worthless) / count * HUNDRED;
        stats.assigned_pct = Decimal::from(stats.assigned) / count * HUNDRED;

        let premium_sum: Decimal = trades.iter().map(|t| t.premium_received).sum();
        stats.avg_premium_per_trade = premium_sum / count;
        stats.avg_trade_pnl = stats.total_option_pnl / count;

        #[allow(clippy::cast_precision_loss)]
        let count_f = total_trades as f64;
        stats.avg_dte_at_open =
            trades.iter().map(|t| f64::from(t.dte_at_open)).sum::<f64>() / count_f;
        stats.avg_delta_at_open = trades.iter().map(|t| t.delta_at_open).sum::<f64>() / count_f;
    }

    stats
}
