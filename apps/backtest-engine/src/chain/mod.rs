//! Synthetic option chain generation.
//!
//! Chains are rebuilt from scratch for every simulation day: strikes are laid
//! out relative to that day's spot, so quotes are never carried across days.
//! The [`OptionChainSource`] trait is the seam where a market-data-backed
//! chain could replace the synthetic one without touching the engine.

mod expirations;
mod synthesizer;
mod types;

pub use expirations::{expiration_dates, next_friday, third_friday};
pub use synthesizer::{ChainTuning, OptionChainSource, SyntheticChainSource};
pub use types::{find_quote, OptionQuote};
