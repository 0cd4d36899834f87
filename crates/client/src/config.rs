//! Typed client configuration.
//!
//! Loaded once at startup from a JSON file. Unknown fields are rejected so
//! a typo in a threshold name fails loudly instead of silently using a
//! default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use game_core::{BoardTopology, Calibration, GameConfig};

/// Everything the binary needs to assemble a runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ClientConfig {
    /// Rules parameters, including reconciliation thresholds.
    pub game: GameConfig,
    /// Seed for the board deal and in-game randomness of a fresh session.
    pub game_seed: u64,
    /// Snapshot directory. Defaults to the platform data dir.
    pub snapshot_dir: Option<PathBuf>,
    /// Board layout file (JSON). Defaults to the standard board dealt from
    /// the game seed.
    pub board_file: Option<PathBuf>,
    /// Measured camera calibration file (JSON). Defaults to the layout
    /// projection when absent.
    pub calibration_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            game_seed: 0,
            snapshot_dir: None,
            board_file: None,
            calibration_file: None,
        }
    }
}

impl ClientConfig {
    /// Read a config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Snapshot directory, configured or platform default.
    pub fn snapshot_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.snapshot_dir {
            return Ok(dir.clone());
        }
        let dirs = directories::ProjectDirs::from("", "", "hextable")
            .context("cannot determine a data directory for snapshots")?;
        Ok(dirs.data_dir().join("snapshots"))
    }

    /// Load the configured board layout, if any.
    pub fn board(&self) -> anyhow::Result<Option<BoardTopology>> {
        let Some(path) = &self.board_file else {
            return Ok(None);
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading board layout {}", path.display()))?;
        let topology = serde_json::from_str(&raw)
            .with_context(|| format!("parsing board layout {}", path.display()))?;
        Ok(Some(topology))
    }

    /// Load the measured calibration, if one is configured.
    pub fn calibration(&self) -> anyhow::Result<Option<Calibration>> {
        let Some(path) = &self.calibration_file else {
            return Ok(None);
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading calibration {}", path.display()))?;
        let calibration = serde_json::from_str(&raw)
            .with_context(|| format!("parsing calibration {}", path.display()))?;
        Ok(Some(calibration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_json() {
        let config = ClientConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.game, config.game);
        assert_eq!(back.game_seed, 0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<ClientConfig>(r#"{"debounce_windw": 3}"#);
        assert!(result.is_err());
    }
}
