//! Result types for backtest performance evaluation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio-level performance metrics over a backtest run.
///
/// Percentage fields are expressed in percent (a 12% return is `12`, not
/// `0.12`); `max_drawdown_pct` is zero or negative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Portfolio value on the first snapshot day.
    pub initial_value: Decimal,
    /// Portfolio value on the last snapshot day.
    pub final_value: Decimal,
    /// Total return over the run, percent.
    pub total_return_pct: Decimal,
    /// Total return annualized over the calendar span of the run, percent.
    pub annualized_return_pct: Decimal,
    /// Annualized daily-return volatility, percent.
    pub volatility_pct: Decimal,
    /// Annualized Sharpe ratio; zero when volatility is zero.
    pub sharpe_ratio: Decimal,
    /// Worst peak-to-trough decline, percent; zero when the curve never
    /// falls below a prior peak.
    pub max_drawdown_pct: Decimal,
}

/// Trade-level statistics specific to the covered-call strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoveredCallStats {
    /// Closed trades over the run.
    pub total_trades: u64,
    /// Trades with positive option P&L.
    pub winning_trades: u64,
    /// Winners as a percentage of closed trades.
    pub win_rate_pct: Decimal,
    /// Cumulative premium across every contract opened.
    pub total_premium_collected: Decimal,
    /// Realized option P&L across closed trades.
    pub total_option_pnl: Decimal,
    /// Trades closed by each reason.
    pub expired_worthless: u64,
    /// Trades that expired in the money.
    pub assigned: u64,
    /// Trades bought back at the profit target.
    pub profit_target_closes: u64,
    /// Trades bought back at the loss limit.
    pub loss_limit_closes: u64,
    /// Worthless expirations as a percentage of closed trades.
    pub expired_worthless_pct: Decimal,
    /// Assignments as a percentage of closed trades.
    pub assigned_pct: Decimal,
    /// Mean premium per closed trade.
    pub avg_premium_per_trade: Decimal,
    /// Mean realized option P&L per closed trade.
    pub avg_trade_pnl: Decimal,
    /// Mean days-to-expiration at open across closed trades.
    pub avg_dte_at_open: f64,
    /// Mean delta at open across closed trades.
    pub avg_delta_at_open: f64,
}
