//! Synthetic chain construction: strike grid, approximate pricing, greeks.
//!
//! Pricing here is a deliberate approximation, not Black-Scholes: intrinsic
//! value plus a volatility-scaled time-value term, with heuristic delta and
//! theta. It only needs to be internally consistent day over day, which it is
//! because the same formulas reprice every (strike, expiration) pair from
//! that day's spot.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::expirations::expiration_dates;
use super::types::OptionQuote;

/// Tunable constants for chain synthesis.
///
/// Defaults reproduce the documented grid: +/-10 strikes at 5% of spot, 8
/// weekly plus 12 monthly expirations, 20% base vol with a 10-point skew per
/// unit of moneyness distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainTuning {
    /// Strike steps on each side of spot.
    pub strike_steps: i32,
    /// Strike spacing as a fraction of spot.
    pub strike_step_pct: f64,
    /// At-the-money implied volatility floor.
    pub base_vol: f64,
    /// Volatility added per unit of |moneyness - 1|.
    pub vol_skew: f64,
    /// Scale applied to the `spot * iv * sqrt(t)` time-value term.
    pub time_value_coefficient: f64,
    /// Minimum per-share option price.
    pub min_price: Decimal,
    /// Daily decay rate used by the theta proxy, referenced to 30 DTE.
    pub theta_decay: f64,
    /// Number of weekly Friday expirations to generate.
    pub weekly_expirations: u32,
    /// Number of third-Friday monthly expirations to generate.
    pub monthly_expirations: u32,
}

impl Default for ChainTuning {
    fn default() -> Self {
        Self {
            strike_steps: 10,
            strike_step_pct: 0.05,
            base_vol: 0.20,
            vol_skew: 0.10,
            time_value_coefficient: 0.4,
            min_price: Decimal::new(1, 2), // $0.01
            theta_decay: 0.02,
            weekly_expirations: 8,
            monthly_expirations: 12,
        }
    }
}

/// Source of option chains for a given spot and date.
///
/// The synthetic implementation below is the only one shipped; a chain built
/// from real market data slots in behind this trait without changing the
/// engine.
pub trait OptionChainSource: Send {
    /// Build the full call chain for `spot` as of `as_of`.
    fn chain(&mut self, spot: Decimal, as_of: NaiveDate) -> Vec<OptionQuote>;

    /// Name of this source, for logging.
    fn name(&self) -> &'static str;
}

/// Chain synthesizer with seeded quote volumes.
#[derive(Debug)]
pub struct SyntheticChainSource {
    tuning: ChainTuning,
    rng: StdRng,
}

impl SyntheticChainSource {
    /// Create a synthesizer from tuning constants and a volume seed.
    #[must_use]
    pub fn new(tuning: ChainTuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Whole-dollar strike grid around spot, non-positive strikes discarded.
    fn strike_grid(&self, spot: f64) -> Vec<i64> {
        let mut strikes = BTreeSet::new();
        for step in -self.tuning.strike_steps..=self.tuning.strike_steps {
            #[allow(clippy::cast_possible_truncation)]
            let strike =
                (spot * (1.0 + f64::from(step) * self.tuning.strike_step_pct)).round() as i64;
            if strike > 0 {
                strikes.insert(strike);
            }
        }
        strikes.into_iter().collect()
    }

    fn quote(
        &mut self,
        spot: f64,
        strike: i64,
        expiration: NaiveDate,
        dte: u32,
    ) -> OptionQuote {
        #[allow(clippy::cast_precision_loss)]
        let strike_f = strike as f64;
        let intrinsic = (spot - strike_f).max(0.0);
        let iv = self.tuning.base_vol + (strike_f / spot - 1.0).abs() * self.tuning.vol_skew;
        let time_value =
            spot * iv * (f64::from(dte) / 365.0).sqrt() * self.tuning.time_value_coefficient;

        let price = Decimal::from_f64_retain(intrinsic + time_value)
            .unwrap_or_default()
            .round_dp(2)
            .max(self.tuning.min_price);

        let price_f = price.to_f64().unwrap_or(0.0);
        let theta = -price_f * self.tuning.theta_decay * (30.0 / f64::from(dte));

        OptionQuote {
            strike: Decimal::from(strike),
            expiration,
            dte,
            price,
            delta: estimate_delta(spot, strike_f, dte),
            theta,
            implied_vol: iv,
            volume: self.rng.random_range(10..1000),
        }
    }
}

impl OptionChainSource for SyntheticChainSource {
    fn chain(&mut self, spot: Decimal, as_of: NaiveDate) -> Vec<OptionQuote> {
        let spot_f = spot.to_f64().unwrap_or(0.0);
        if spot_f <= 0.0 {
            return Vec::new();
        }

        let expirations = expiration_dates(
            as_of,
            self.tuning.weekly_expirations,
            self.tuning.monthly_expirations,
        );
        let strikes = self.strike_grid(spot_f);

        let mut quotes = Vec::with_capacity(expirations.len() * strikes.len());
        for expiration in expirations {
            let dte = (expiration - as_of).num_days();
            let Ok(dte) = u32::try_from(dte) else {
                continue;
            };
            if dte < 1 {
                continue;
            }
            for &strike in &strikes {
                quotes.push(self.quote(spot_f, strike, expiration, dte));
            }
        }
        quotes
    }

    fn name(&self) -> &'static str {
        "Synthetic"
    }
}

/// Heuristic call delta from moneyness and time to expiration.
///
/// Monotonically increasing in moneyness; for in-the-money strikes it rises
/// toward 1 as expiration approaches, for out-of-the-money strikes it decays
/// toward 0. Clamped to (0.01, 0.99).
fn estimate_delta(spot: f64, strike: f64, dte: u32) -> f64 {
    let moneyness = spot / strike;
    let time_factor = (f64::from(dte) / 365.0).sqrt();

    let delta = if moneyness >= 1.0 {
        let base = 0.5 + (moneyness - 1.0) * 0.3;
        base + (1.0 - base) * (-time_factor).exp()
    } else {
        0.5 * moneyness * (1.0 - (-time_factor).exp())
    };

    delta.clamp(0.01, 0.99)
}
