//! Snapshot persistence contracts and implementations.
//!
//! The full [`GameState`] is written after every committed transition batch
//! and read back at startup, so a crash never loses more than the batch in
//! flight.

mod error;
mod file;
mod memory;

pub use error::{RepositoryError, Result};
pub use file::FileSnapshotRepository;
pub use memory::MemorySnapshotRepository;

use game_core::GameState;

/// Repository for game state snapshots, indexed by the commit nonce.
pub trait SnapshotRepository: Send + Sync {
    /// Save a snapshot at the given nonce.
    fn save(&self, nonce: u64, state: &GameState) -> Result<()>;

    /// Load the snapshot at a specific nonce.
    fn load(&self, nonce: u64) -> Result<Option<GameState>>;

    /// All stored nonces, ascending.
    fn list_nonces(&self) -> Result<Vec<u64>>;

    /// Delete the snapshot at a nonce, if present.
    fn delete(&self, nonce: u64) -> Result<()>;

    /// The most recent snapshot, if any.
    fn load_latest(&self) -> Result<Option<(u64, GameState)>> {
        let Some(&latest) = self.list_nonces()?.last() else {
            return Ok(None);
        };
        Ok(self.load(latest)?.map(|state| (latest, state)))
    }

    /// Delete all snapshots in `[start, end]`. Returns how many were removed.
    fn delete_range(&self, start: u64, end: u64) -> Result<usize> {
        let mut deleted = 0;
        for nonce in self.list_nonces()? {
            if (start..=end).contains(&nonce) {
                self.delete(nonce)?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
