//! Closed-trade ledger records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::position::{ContractStatus, OptionContract};

/// Why a contract left the `Open` state. Exactly one reason per trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloseReason {
    /// Held to expiration out of the money.
    ExpiredWorthless,
    /// Held to expiration in the money; shares delivered at the strike.
    Assigned,
    /// Bought back at the profit target.
    ProfitTarget,
    /// Bought back at the loss limit.
    LossLimit,
}

impl CloseReason {
    /// The terminal contract status this reason corresponds to.
    #[must_use]
    pub const fn status(self) -> ContractStatus {
        match self {
            Self::ExpiredWorthless => ContractStatus::ExpiredWorthless,
            Self::Assigned => ContractStatus::Assigned,
            Self::ProfitTarget => ContractStatus::ProfitTarget,
            Self::LossLimit => ContractStatus::LossLimit,
        }
    }
}

/// Immutable record of a closed contract. Appended to the ledger once, at
/// close, and never mutated or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    /// Contract id.
    pub id: Uuid,
    /// Day the contract was written.
    pub open_date: NaiveDate,
    /// Day the contract closed.
    pub close_date: NaiveDate,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Number of contracts.
    pub contracts: u32,
    /// Total premium credited at open.
    pub premium_received: Decimal,
    /// Quote delta when written.
    pub delta_at_open: f64,
    /// Days to expiration when written.
    pub dte_at_open: u32,
    /// Close reason.
    pub reason: CloseReason,
    /// Realized option P&L: premium kept, less any buy-back cost.
    pub option_pnl: Decimal,
    /// Cash credited on assignment (strike x contracts x shares); zero
    /// for every other close reason.
    pub assignment_proceeds: Decimal,
}

impl ClosedTrade {
    /// Build the ledger record for a contract closing today.
    #[must_use]
    pub fn from_contract(
        contract: &OptionContract,
        close_date: NaiveDate,
        reason: CloseReason,
        option_pnl: Decimal,
        assignment_proceeds: Decimal,
    ) -> Self {
        Self {
            id: contract.id,
            open_date: contract.open_date,
            close_date,
            strike: contract.strike,
            expiration: contract.expiration,
            contracts: contract.contracts,
            premium_received: contract.premium_received,
            delta_at_open: contract.delta_at_open,
            dte_at_open: contract.dte_at_open,
            reason,
            option_pnl,
            assignment_proceeds,
        }
    }

    /// Whether the trade realized a positive option P&L.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        self.option_pnl > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reason_maps_to_terminal_status() {
        assert_eq!(
            CloseReason::Assigned.status(),
            ContractStatus::Assigned
        );
        assert!(CloseReason::ProfitTarget.status().is_terminal());
    }

    #[test]
    fn test_trade_copies_contract_identity() {
        let contract = OptionContract::open(
            date(2024, 1, 8),
            dec!(210),
            date(2024, 2, 16),
            2,
            dec!(700),
            0.29,
            39,
        );
        let trade = ClosedTrade::from_contract(
            &contract,
            date(2024, 1, 22),
            CloseReason::ProfitTarget,
            dec!(360),
            dec!(0),
        );

        assert_eq!(trade.id, contract.id);
        assert_eq!(trade.strike, contract.strike);
        assert_eq!(trade.premium_received, dec!(700));
        assert!(trade.is_winner());
    }

    #[test]
    fn test_losing_trade_is_not_winner() {
        let contract = OptionContract::open(
            date(2024, 1, 8),
            dec!(210),
            date(2024, 2, 16),
            1,
            dec!(350),
            0.31,
            39,
        );
        let trade = ClosedTrade::from_contract(
            &contract,
            date(2024, 1, 22),
            CloseReason::LossLimit,
            dec!(-700),
            dec!(0),
        );
        assert!(!trade.is_winner());
    }
}
