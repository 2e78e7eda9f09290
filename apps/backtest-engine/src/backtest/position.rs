//! Open positions: the underlying holding and written call contracts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a written call contract.
///
/// Transitions are strictly one-directional: a contract starts `Open` and
/// makes exactly one transition into a closed state, after which it is
/// immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    /// Contract is live and marked daily.
    Open,
    /// Expired with spot at or below strike.
    ExpiredWorthless,
    /// Expired in the money; shares called away at the strike.
    Assigned,
    /// Bought back after capturing the profit-target fraction of premium.
    ProfitTarget,
    /// Bought back after losses reached the loss-limit multiple of premium.
    LossLimit,
}

impl ContractStatus {
    /// Whether this is a closed state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Open)
    }
}

/// A written (short) call contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    /// Unique contract id.
    pub id: Uuid,
    /// Day the contract was written.
    pub open_date: NaiveDate,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Number of contracts written.
    pub contracts: u32,
    /// Total premium credited at open; never recomputed.
    pub premium_received: Decimal,
    /// Quote delta when the contract was written.
    pub delta_at_open: f64,
    /// Days to expiration when the contract was written.
    pub dte_at_open: u32,
    /// Lifecycle state.
    pub status: ContractStatus,
}

impl OptionContract {
    /// Write a new contract; the initial state is always `Open`.
    #[must_use]
    pub fn open(
        open_date: NaiveDate,
        strike: Decimal,
        expiration: NaiveDate,
        contracts: u32,
        premium_received: Decimal,
        delta_at_open: f64,
        dte_at_open: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            open_date,
            strike,
            expiration,
            contracts,
            premium_received,
            delta_at_open,
            dte_at_open,
            status: ContractStatus::Open,
        }
    }

    /// Underlying shares this contract controls.
    #[must_use]
    pub fn share_count(&self, shares_per_contract: u32) -> Decimal {
        Decimal::from(self.contracts * shares_per_contract)
    }
}

/// The covered stock position backing written calls.
///
/// Share count is fixed for the run; the holding is never sold short of the
/// quantity that covers open contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockHolding {
    /// Underlying ticker.
    pub ticker: String,
    /// Shares owned, fixed for the run.
    pub shares: u32,
    /// First close of the run.
    pub entry_price: Decimal,
    /// Latest close, updated daily.
    pub current_price: Decimal,
}

impl StockHolding {
    /// Create a holding priced at its entry close.
    #[must_use]
    pub fn new(ticker: &str, shares: u32, entry_price: Decimal) -> Self {
        Self {
            ticker: ticker.to_string(),
            shares,
            entry_price,
            current_price: entry_price,
        }
    }

    /// Mark the holding at a new close.
    pub fn update_price(&mut self, price: Decimal) {
        self.current_price = price;
    }

    /// Market value at the current price.
    #[must_use]
    pub fn market_value(&self) -> Decimal {
        self.current_price * Decimal::from(self.shares)
    }

    /// Unrealized gain relative to the entry close.
    #[must_use]
    pub fn unrealized_pnl(&self) -> Decimal {
        (self.current_price - self.entry_price) * Decimal::from(self.shares)
    }
}
