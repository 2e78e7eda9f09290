//! Price path provider: daily OHLCV series for the underlying.
//!
//! Real market data arrives through the [`PriceHistorySource`] trait; when no
//! source is wired up (or the source fails), the engine falls back to a
//! seeded random-walk generator so runs stay reproducible.

mod calendar;
mod source;
mod synthetic;
mod types;

pub use calendar::{business_days, is_business_day};
pub use source::{InMemoryPriceSource, PriceHistorySource};
pub use synthetic::SyntheticWalkSource;
pub use types::PricePoint;
