//! Observation types delivered by the camera front end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use game_core::PlayerColor;

/// What the color classifier believes sits at a sampled point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservedOccupant {
    /// Board-colored: nothing on the slot.
    Empty,
    /// A piece in one of the player colors.
    Piece(PlayerColor),
}

/// One classified detection in camera space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraObservation {
    pub x: f32,
    pub y: f32,
    pub occupant: ObservedOccupant,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
}

impl CameraObservation {
    pub fn new(x: f32, y: f32, occupant: ObservedOccupant, confidence: f32) -> Self {
        Self {
            x,
            y,
            occupant,
            confidence,
        }
    }
}

/// All detections from one processed frame.
///
/// Batches are not authoritative; they queue until the reconciler drains
/// them at a synchronization point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationBatch {
    pub frame_ts: DateTime<Utc>,
    pub observations: Vec<CameraObservation>,
}

impl ObservationBatch {
    pub fn new(frame_ts: DateTime<Utc>, observations: Vec<CameraObservation>) -> Self {
        Self {
            frame_ts,
            observations,
        }
    }
}
