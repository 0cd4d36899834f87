//! In-memory snapshot repository for tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::sync::RwLock;

use game_core::GameState;

use super::error::{RepositoryError, Result};
use super::SnapshotRepository;

/// Keeps snapshots in a map; nothing survives the process.
#[derive(Default)]
pub struct MemorySnapshotRepository {
    states: RwLock<BTreeMap<u64, GameState>>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotRepository for MemorySnapshotRepository {
    fn save(&self, nonce: u64, state: &GameState) -> Result<()> {
        self.states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .insert(nonce, state.clone());
        Ok(())
    }

    fn load(&self, nonce: u64) -> Result<Option<GameState>> {
        Ok(self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .get(&nonce)
            .cloned())
    }

    fn list_nonces(&self) -> Result<Vec<u64>> {
        Ok(self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .keys()
            .copied()
            .collect())
    }

    fn delete(&self, nonce: u64) -> Result<()> {
        self.states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .remove(&nonce);
        Ok(())
    }
}
