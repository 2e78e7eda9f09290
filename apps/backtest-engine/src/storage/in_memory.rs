//! In-memory repository implementations.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    BacktestResultRepository, SavedStrategy, StorageError, StoredBacktest, StrategyRepository,
};

/// In-memory strategy store backed by a lock-protected map.
#[derive(Debug, Default)]
pub struct InMemoryStrategyRepository {
    strategies: RwLock<HashMap<Uuid, SavedStrategy>>,
}

impl InMemoryStrategyRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StrategyRepository for InMemoryStrategyRepository {
    async fn save(&self, strategy: SavedStrategy) -> Result<(), StorageError> {
        let mut strategies = self
            .strategies
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        strategies.insert(strategy.id, strategy);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SavedStrategy>, StorageError> {
        let strategies = self
            .strategies
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        let mut all: Vec<SavedStrategy> = strategies.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        let mut strategies = self
            .strategies
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        strategies
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound(id))
    }
}

/// In-memory result store; runs append in finish order.
#[derive(Debug, Default)]
pub struct InMemoryBacktestResultRepository {
    results: RwLock<Vec<StoredBacktest>>,
}

impl InMemoryBacktestResultRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            results: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BacktestResultRepository for InMemoryBacktestResultRepository {
    async fn save(&self, result: StoredBacktest) -> Result<(), StorageError> {
        let mut results = self.results.write().map_err(|_| StorageError::LockPoisoned)?;
        results.push(result);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StoredBacktest>, StorageError> {
        let results = self.results.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(results.iter().rev().take(limit).cloned().collect())
    }
}
