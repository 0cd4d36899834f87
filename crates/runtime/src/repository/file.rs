//! File-based snapshot repository.

use std::fs;
use std::path::{Path, PathBuf};

use game_core::GameState;

use super::error::{RepositoryError, Result};
use super::SnapshotRepository;

/// Stores snapshots as individual bincode files indexed by nonce.
///
/// # File format
///
/// `state_{nonce}.bin`, bincode encoded. Writes go to a temporary file
/// first and are renamed into place, so a crash mid-write never leaves a
/// truncated snapshot behind.
pub struct FileSnapshotRepository {
    base_dir: PathBuf,
}

impl FileSnapshotRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn state_path(&self, nonce: u64) -> PathBuf {
        self.base_dir.join(format!("state_{}.bin", nonce))
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn save(&self, nonce: u64, state: &GameState) -> Result<()> {
        let path = self.state_path(nonce);
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(state)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("saved state[{}] to {}", nonce, path.display());

        Ok(())
    }

    fn load(&self, nonce: u64) -> Result<Option<GameState>> {
        let path = self.state_path(nonce);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let state: GameState = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!("loaded state[{}] from {}", nonce, path.display());

        Ok(Some(state))
    }

    fn list_nonces(&self) -> Result<Vec<u64>> {
        let mut nonces = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(nonce_str) = filename
                    .strip_prefix("state_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(nonce) = nonce_str.parse::<u64>()
            {
                nonces.push(nonce);
            }
        }

        nonces.sort_unstable();
        Ok(nonces)
    }

    fn delete(&self, nonce: u64) -> Result<()> {
        let path = self.state_path(nonce);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("deleted state[{}]", nonce);
        }
        Ok(())
    }
}
