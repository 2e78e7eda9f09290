//! Price history source trait and in-memory implementation.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::types::PricePoint;
use crate::error::BacktestError;

/// Source of daily price history for a ticker.
///
/// Implementations back the engine with real market data; the engine itself
/// only depends on this boundary and falls back to a synthetic walk when the
/// source fails or returns nothing.
pub trait PriceHistorySource: Send + Sync {
    /// Load the ordered daily series for `ticker` within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the series cannot be loaded, for example when the
    /// ticker is unknown or the upstream data provider is unavailable.
    fn price_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, BacktestError>;

    /// Name of this source, for logging.
    fn name(&self) -> &'static str;
}

/// In-memory price source for tests and fixtures.
#[derive(Debug, Default)]
pub struct InMemoryPriceSource {
    series: HashMap<String, Vec<PricePoint>>,
}

impl InMemoryPriceSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
        }
    }

    /// Register a series for a ticker.
    pub fn add_series(&mut self, ticker: &str, points: Vec<PricePoint>) {
        self.series.insert(ticker.to_string(), points);
    }
}

impl PriceHistorySource for InMemoryPriceSource {
    fn price_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, BacktestError> {
        let points = self
            .series
            .get(ticker)
            .ok_or_else(|| BacktestError::NoData(ticker.to_string()))?;

        Ok(points
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "InMemory"
    }
}
