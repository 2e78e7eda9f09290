//! Portfolio accounting: cash, open contracts, ledger, daily snapshots.
//!
//! Cash moves exactly three ways: premium credits at open, buy-back debits,
//! and assignment proceeds. The daily snapshot reconciles as
//! `portfolio_value == cash + underlying value - open option liability`,
//! which is the principal accounting invariant of the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::position::{OptionContract, StockHolding};
use super::trade::{CloseReason, ClosedTrade};
use crate::chain::{find_quote, OptionQuote};

/// End-of-day portfolio state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySnapshot {
    /// Snapshot date.
    pub date: NaiveDate,
    /// Underlying close.
    pub stock_price: Decimal,
    /// Cash + underlying value - open option liability.
    pub portfolio_value: Decimal,
    /// Cash balance.
    pub cash: Decimal,
    /// Unrealized underlying P&L vs the entry close.
    pub underlying_pnl: Decimal,
    /// Sum over open contracts of premium received minus current mark.
    pub options_pnl: Decimal,
    /// Mark-to-market cost to close every open contract.
    pub open_option_liability: Decimal,
    /// Cumulative premium across every contract ever opened.
    pub total_premium_collected: Decimal,
    /// Open contract count.
    pub open_contracts: u32,
    /// Closed trades so far.
    pub total_trades: u64,
}

/// Mutable portfolio state for one backtest run.
#[derive(Debug)]
pub struct Portfolio {
    cash: Decimal,
    holding: StockHolding,
    shares_per_contract: u32,
    open: Vec<OptionContract>,
    ledger: Vec<ClosedTrade>,
    premium_collected: Decimal,
}

impl Portfolio {
    /// Create a portfolio holding `holding` and starting cash.
    #[must_use]
    pub const fn new(initial_cash: Decimal, holding: StockHolding, shares_per_contract: u32) -> Self {
        Self {
            cash: initial_cash,
            holding,
            shares_per_contract,
            open: Vec::new(),
            ledger: Vec::new(),
            premium_collected: Decimal::ZERO,
        }
    }

    /// Current cash balance.
    #[must_use]
    pub const fn cash(&self) -> Decimal {
        self.cash
    }

    /// The covered stock position.
    #[must_use]
    pub const fn holding(&self) -> &StockHolding {
        &self.holding
    }

    /// Mark the underlying at a new close.
    pub fn mark_underlying(&mut self, price: Decimal) {
        self.holding.update_price(price);
    }

    /// Open contracts.
    #[must_use]
    pub fn open_contracts(&self) -> &[OptionContract] {
        &self.open
    }

    /// Closed-trade ledger, in close order.
    #[must_use]
    pub fn trades(&self) -> &[ClosedTrade] {
        &self.ledger
    }

    /// Total contracts currently written.
    #[must_use]
    pub fn open_contract_count(&self) -> u32 {
        self.open.iter().map(|c| c.contracts).sum()
    }

    /// Cumulative premium across every contract ever opened.
    #[must_use]
    pub const fn total_premium_collected(&self) -> Decimal {
        self.premium_collected
    }

    /// Write a new contract against the covered shares, crediting the
    /// premium to cash immediately.
    pub fn write_contract(&mut self, quote: &OptionQuote, date: NaiveDate, contracts: u32) -> Uuid {
        let premium = quote.price * Decimal::from(contracts * self.shares_per_contract);
        let contract = OptionContract::open(
            date,
            quote.strike,
            quote.expiration,
            contracts,
            premium,
            quote.delta,
            quote.dte,
        );
        let id = contract.id;

        self.cash += premium;
        self.premium_collected += premium;

        debug!(
            contract_id = %id,
            strike = %quote.strike,
            expiration = %quote.expiration,
            premium = %premium,
            "Contract written"
        );

        self.open.push(contract);
        id
    }

    /// Settle a contract that has reached expiration.
    ///
    /// In the money, the shares are called away at the strike and the
    /// proceeds are credited to cash; otherwise the contract expires with no
    /// further cash effect (the premium was collected at open).
    pub fn settle_expiration(
        &mut self,
        id: Uuid,
        spot: Decimal,
        date: NaiveDate,
    ) -> Option<CloseReason> {
        let idx = self.open.iter().position(|c| c.id == id)?;
        let mut contract = self.open.remove(idx);

        let (reason, proceeds) = if spot > contract.strike {
            let proceeds = contract.strike * contract.share_count(self.shares_per_contract);
            self.cash += proceeds;
            (CloseReason::Assigned, proceeds)
        } else {
            (CloseReason::ExpiredWorthless, Decimal::ZERO)
        };

        contract.status = reason.status();
        let pnl = contract.premium_received;
        self.ledger.push(ClosedTrade::from_contract(
            &contract, date, reason, pnl, proceeds,
        ));

        debug!(
            contract_id = %id,
            reason = ?reason,
            proceeds = %proceeds,
            "Contract settled at expiration"
        );

        Some(reason)
    }

    /// Buy a contract back before expiration, debiting the cost from cash.
    ///
    /// Returns the realized option P&L.
    pub fn buy_back(
        &mut self,
        id: Uuid,
        price: Decimal,
        date: NaiveDate,
        reason: CloseReason,
    ) -> Option<Decimal> {
        let idx = self.open.iter().position(|c| c.id == id)?;
        let mut contract = self.open.remove(idx);

        let cost = price * contract.share_count(self.shares_per_contract);
        self.cash -= cost;
        let pnl = contract.premium_received - cost;

        contract.status = reason.status();
        self.ledger.push(ClosedTrade::from_contract(
            &contract,
            date,
            reason,
            pnl,
            Decimal::ZERO,
        ));

        debug!(
            contract_id = %id,
            reason = ?reason,
            cost = %cost,
            pnl = %pnl,
            "Contract bought back"
        );

        Some(pnl)
    }

    /// Mark-to-market value of one open contract, zero when today's chain
    /// has no matching quote.
    fn contract_mark(&self, contract: &OptionContract, chain: &[OptionQuote]) -> Decimal {
        find_quote(chain, contract.strike, contract.expiration).map_or(Decimal::ZERO, |q| {
            q.price * contract.share_count(self.shares_per_contract)
        })
    }

    /// End-of-day snapshot against today's chain.
    #[must_use]
    pub fn snapshot(&self, date: NaiveDate, chain: &[OptionQuote]) -> DailySnapshot {
        let mut liability = Decimal::ZERO;
        let mut options_pnl = Decimal::ZERO;
        for contract in &self.open {
            let mark = self.contract_mark(contract, chain);
            liability += mark;
            options_pnl += contract.premium_received - mark;
        }

        DailySnapshot {
            date,
            stock_price: self.holding.current_price,
            portfolio_value: self.cash + self.holding.market_value() - liability,
            cash: self.cash,
            underlying_pnl: self.holding.unrealized_pnl(),
            options_pnl,
            open_option_liability: liability,
            total_premium_collected: self.premium_collected,
            open_contracts: self.open_contract_count(),
            total_trades: self.ledger.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::backtest::position::ContractStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quote(strike: Decimal, expiration: NaiveDate, price: Decimal) -> OptionQuote {
        OptionQuote {
            strike,
            expiration,
            dte: 39,
            price,
            delta: 0.30,
            theta: -0.05,
            implied_vol: 0.22,
            volume: 100,
        }
    }

    fn portfolio() -> Portfolio {
        Portfolio::new(
            dec!(100000),
            StockHolding::new("TSLA", 1000, dec!(200)),
            100,
        )
    }

    #[test]
    fn test_write_credits_premium() {
        let mut p = portfolio();
        let exp = date(2024, 2, 16);
        p.write_contract(&quote(dec!(210), exp, dec!(3.50)), date(2024, 1, 8), 1);

        assert_eq!(p.cash(), dec!(100350));
        assert_eq!(p.total_premium_collected(), dec!(350));
        assert_eq!(p.open_contract_count(), 1);
    }

    #[test]
    fn test_assignment_credits_strike_proceeds() {
        let mut p = portfolio();
        let exp = date(2024, 2, 16);
        let id = p.write_contract(&quote(dec!(210), exp, dec!(5.00)), date(2024, 1, 8), 1);

        let reason = p.settle_expiration(id, dec!(215), exp).unwrap();
        assert_eq!(reason, CloseReason::Assigned);
        // 100,000 + 500 premium + 210 * 100 proceeds
        assert_eq!(p.cash(), dec!(121500));

        let trade = &p.trades()[0];
        assert_eq!(trade.assignment_proceeds, dec!(21000));
        assert_eq!(trade.option_pnl, dec!(500));
        assert_eq!(trade.reason.status(), ContractStatus::Assigned);
    }

    #[test]
    fn test_worthless_expiry_has_no_cash_effect() {
        let mut p = portfolio();
        let exp = date(2024, 2, 16);
        let id = p.write_contract(&quote(dec!(210), exp, dec!(5.00)), date(2024, 1, 8), 1);

        let reason = p.settle_expiration(id, dec!(205), exp).unwrap();
        assert_eq!(reason, CloseReason::ExpiredWorthless);
        assert_eq!(p.cash(), dec!(100500));

        let trade = &p.trades()[0];
        assert_eq!(trade.assignment_proceeds, dec!(0));
        assert_eq!(trade.option_pnl, dec!(500));
    }

    #[test]
    fn test_buy_back_debits_cost_and_realizes_pnl() {
        let mut p = portfolio();
        let exp = date(2024, 2, 16);
        let id = p.write_contract(&quote(dec!(210), exp, dec!(5.00)), date(2024, 1, 8), 1);

        let pnl = p
            .buy_back(id, dec!(2.50), date(2024, 1, 22), CloseReason::ProfitTarget)
            .unwrap();
        assert_eq!(pnl, dec!(250));
        assert_eq!(p.cash(), dec!(100250));
        assert!(p.open_contracts().is_empty());
        assert_eq!(p.trades().len(), 1);
    }

    #[test]
    fn test_close_of_unknown_contract_is_none() {
        let mut p = portfolio();
        assert!(p
            .settle_expiration(Uuid::new_v4(), dec!(200), date(2024, 2, 16))
            .is_none());
        assert!(p
            .buy_back(
                Uuid::new_v4(),
                dec!(1),
                date(2024, 2, 16),
                CloseReason::LossLimit
            )
            .is_none());
    }

    #[test]
    fn test_snapshot_reconciles_three_ways() {
        let mut p = portfolio();
        let exp = date(2024, 2, 16);
        p.write_contract(&quote(dec!(210), exp, dec!(5.00)), date(2024, 1, 8), 1);
        p.mark_underlying(dec!(204));

        let chain = vec![quote(dec!(210), exp, dec!(4.00))];
        let snap = p.snapshot(date(2024, 1, 9), &chain);

        assert_eq!(snap.open_option_liability, dec!(400));
        assert_eq!(
            snap.portfolio_value,
            snap.cash + dec!(204) * dec!(1000) - snap.open_option_liability
        );
        assert_eq!(snap.options_pnl, dec!(100)); // 500 premium - 400 mark
        assert_eq!(snap.underlying_pnl, dec!(4000));
    }

    #[test]
    fn test_snapshot_marks_missing_quote_at_zero() {
        let mut p = portfolio();
        let exp = date(2024, 2, 16);
        p.write_contract(&quote(dec!(210), exp, dec!(5.00)), date(2024, 1, 8), 1);

        let snap = p.snapshot(date(2024, 1, 9), &[]);
        assert_eq!(snap.options_pnl, dec!(500));
        assert_eq!(snap.open_option_liability, Decimal::ZERO);
        assert_eq!(snap.portfolio_value, snap.cash + p.holding().market_value());
    }
}
