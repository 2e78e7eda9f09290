//! Synthesized option quote.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single synthesized call quote.
///
/// Monetary fields are decimals; the approximated greeks and implied
/// volatility stay in `f64` since they only feed heuristic selection, never
/// cash accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price (whole dollars, always positive).
    pub strike: Decimal,
    /// Expiration date, strictly after the chain's as-of date.
    pub expiration: NaiveDate,
    /// Days to expiration (>= 1).
    pub dte: u32,
    /// Synthesized per-share option price, floored at the minimum premium.
    pub price: Decimal,
    /// Approximated call delta, clamped to (0.01, 0.99).
    pub delta: f64,
    /// Approximated daily time decay (<= 0).
    pub theta: f64,
    /// Approximated implied volatility (> 0).
    pub implied_vol: f64,
    /// Synthesized contract volume.
    pub volume: u32,
}

/// Find the quote matching an open contract's exact strike and expiration.
///
/// Chains are regenerated daily around spot, so a contract's pair may be
/// absent on a given day; callers treat that as a skip, not an error.
#[must_use]
pub fn find_quote(
    chain: &[OptionQuote],
    strike: Decimal,
    expiration: NaiveDate,
) -> Option<&OptionQuote> {
    chain
        .iter()
        .find(|q| q.strike == strike && q.expiration == expiration)
}
