//! Merging queued observations into the authoritative state.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, info, warn};

use game_core::{
    Action, GameConfig, GameEngine, GameState, PlayerId, ReconcileAction, SlotId,
    SystemActionKind,
};

use crate::events::ReconciliationConflict;

use super::debounce::AgreementTracker;
use super::matcher::SlotMatcher;
use super::observation::{ObservationBatch, ObservedOccupant};

/// Resolution of one debounced vision proposal.
#[derive(Clone, Debug, PartialEq)]
pub enum ReconcileOutcome {
    /// The correction was committed through the engine.
    Applied {
        nonce: u64,
        slot: SlotId,
        owner: PlayerId,
    },
    /// The proposal was refused; the canonical state is untouched.
    Conflict(ReconciliationConflict),
}

/// Consumes camera observation batches and proposes corrections.
///
/// Ingest is enqueue-only; nothing touches the game state until
/// [`VisionReconciler::drain`] runs at a synchronization point chosen by the
/// simulation worker (end of turn, or an explicit reconcile command). This
/// keeps sensor input from invalidating an in-flight action's
/// preconditions.
pub struct VisionReconciler {
    matcher: SlotMatcher,
    tracker: AgreementTracker,
    queue: VecDeque<ObservationBatch>,
    min_confidence: f32,
}

impl VisionReconciler {
    pub fn new(matcher: SlotMatcher, config: &game_core::ReconcileConfig) -> Self {
        Self {
            matcher,
            tracker: AgreementTracker::new(config.debounce_window),
            queue: VecDeque::new(),
            min_confidence: config.min_confidence,
        }
    }

    /// Queue a batch. Never touches game state.
    pub fn enqueue(&mut self, batch: ObservationBatch) {
        self.queue.push_back(batch);
    }

    pub fn queued_batches(&self) -> usize {
        self.queue.len()
    }

    /// Process every queued batch in arrival order against the state.
    ///
    /// Proposals that survive matching and debounce go through the engine's
    /// normal commit path; whatever the engine refuses becomes a conflict
    /// for the operator instead of a silent overwrite.
    pub fn drain(
        &mut self,
        state: &mut GameState,
        config: &GameConfig,
    ) -> Vec<ReconcileOutcome> {
        let mut outcomes = Vec::new();

        while let Some(batch) = self.queue.pop_front() {
            let seen = self.classify_batch(&batch);
            let ready = self.tracker.ingest(&seen);

            for (slot, color) in ready {
                let owner = color.seat();
                match state.board.slot_occupant(slot) {
                    // The camera confirms what we already know.
                    Some((existing, _)) if existing == owner => {
                        debug!(target: "runtime::vision", %slot, "observation agrees with state");
                    }
                    current => {
                        let action =
                            Action::System(SystemActionKind::Reconcile(ReconcileAction {
                                slot,
                                owner,
                            }));
                        let mut engine = GameEngine::new(state);
                        match engine.execute(config, &action) {
                            Ok(outcome) => {
                                info!(
                                    target: "runtime::vision",
                                    %slot,
                                    %owner,
                                    nonce = outcome.nonce,
                                    "applied vision correction"
                                );
                                outcomes.push(ReconcileOutcome::Applied {
                                    nonce: outcome.nonce,
                                    slot,
                                    owner,
                                });
                            }
                            Err(error) => {
                                warn!(
                                    target: "runtime::vision",
                                    %slot,
                                    proposed = %color,
                                    error = %error,
                                    "vision proposal conflicts with authoritative state"
                                );
                                outcomes.push(ReconcileOutcome::Conflict(
                                    ReconciliationConflict {
                                        slot,
                                        proposed: color,
                                        authoritative: current.map(|(p, _)| p.color()),
                                        reason: error.to_string(),
                                    },
                                ));
                            }
                        }
                        self.tracker.reset(slot);
                    }
                }
            }
        }

        outcomes
    }

    /// Match one batch's detections to slots, keeping the most confident
    /// classification per slot and dropping noise.
    fn classify_batch(&self, batch: &ObservationBatch) -> HashMap<SlotId, ObservedOccupant> {
        let mut best: HashMap<SlotId, (ObservedOccupant, f32)> = HashMap::new();
        let mut noise = 0usize;

        for obs in &batch.observations {
            if obs.confidence < self.min_confidence {
                continue;
            }
            let Some(slot) = self.matcher.nearest_slot(obs.x, obs.y) else {
                noise += 1;
                continue;
            };
            let entry = best.entry(slot).or_insert((obs.occupant, obs.confidence));
            if obs.confidence > entry.1 {
                *entry = (obs.occupant, obs.confidence);
            }
        }

        if noise > 0 {
            debug!(
                target: "runtime::vision",
                noise,
                frame_ts = %batch.frame_ts,
                "dropped unmatched detections"
            );
        }

        best.into_iter()
            .map(|(slot, (occupant, _))| (slot, occupant))
            .collect()
    }
}
