//! Event types for the runtime topics.

use serde::{Deserialize, Serialize};

use game_core::{
    Action, ActionResult, DiceRoll, PlayerColor, PlayerId, ProductionSummary, SlotId,
};

/// Events about state commits and failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// An action was committed. `result` carries the action-specific data;
    /// display layers decide what of it to show (a bought development card
    /// is for the owner's eyes only).
    ActionExecuted {
        nonce: u64,
        action: Action,
        result: ActionResult,
    },

    /// An action was refused or failed; the state is unchanged.
    ActionRejected {
        action: Action,
        /// Pipeline stage that failed, when one applies.
        phase: Option<String>,
        reason: String,
    },

    /// The game ended with a winner.
    WinnerDeclared {
        nonce: u64,
        player: PlayerId,
        points: u8,
    },

    /// A snapshot write failed twice; play continues in memory only.
    SnapshotFailed { nonce: u64, error: String },
}

/// Lightweight turn-flow notifications for lights, dashboards, and panels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TurnEvent {
    TurnStarted {
        player: PlayerId,
        turn_number: u32,
    },
    DiceRolled {
        player: PlayerId,
        dice: DiceRoll,
        /// Seats that owe discards because of this roll.
        discards_owed: Vec<(PlayerId, u8)>,
    },
    ResourcesProduced {
        summary: ProductionSummary,
    },
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },
}

/// A vision proposal that could not be applied, surfaced for operator
/// resolution. Carries both sides of the disagreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationConflict {
    pub slot: SlotId,
    /// What the camera persistently sees.
    pub proposed: PlayerColor,
    /// What the canonical state holds, if anything.
    pub authoritative: Option<PlayerColor>,
    pub reason: String,
}

/// Outcomes of the vision reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReconciliationEvent {
    /// A camera-confirmed piece was written into the canonical state.
    CorrectionApplied {
        nonce: u64,
        slot: SlotId,
        owner: PlayerId,
    },
    Conflict(ReconciliationConflict),
}
