//! Per-slot agreement tracking across observation batches.

use std::collections::HashMap;

use game_core::{PlayerColor, SlotId};

use super::observation::ObservedOccupant;

struct Streak {
    occupant: ObservedOccupant,
    count: u32,
}

/// Debounce filter: a slot change is only proposed after `window`
/// consecutive batches report the same non-empty occupant.
///
/// A batch that does not cover a slot (or covers it below the confidence
/// floor upstream) breaks that slot's streak, so a single outlier frame can
/// never reach the proposal stage.
pub struct AgreementTracker {
    window: u32,
    streaks: HashMap<SlotId, Streak>,
}

impl AgreementTracker {
    pub fn new(window: u32) -> Self {
        Self {
            // A window of zero would propose on first sight; clamp to one.
            window: window.max(1),
            streaks: HashMap::new(),
        }
    }

    /// Feed one batch's per-slot classifications. Returns the slots whose
    /// streak just reached the window with a piece on them.
    pub fn ingest(
        &mut self,
        seen: &HashMap<SlotId, ObservedOccupant>,
    ) -> Vec<(SlotId, PlayerColor)> {
        // Slots absent from this batch lose their streak.
        self.streaks.retain(|slot, _| seen.contains_key(slot));

        let mut ready = Vec::new();
        for (&slot, &occupant) in seen {
            let streak = self
                .streaks
                .entry(slot)
                .and_modify(|s| {
                    if s.occupant == occupant {
                        s.count += 1;
                    } else {
                        s.occupant = occupant;
                        s.count = 1;
                    }
                })
                .or_insert(Streak {
                    occupant,
                    count: 1,
                });

            if streak.count >= self.window {
                if let ObservedOccupant::Piece(color) = streak.occupant {
                    ready.push((slot, color));
                }
            }
        }
        ready
    }

    /// Drop a slot's streak after its proposal was resolved, so a conflict
    /// is re-raised only after a fresh round of agreement.
    pub fn reset(&mut self, slot: SlotId) {
        self.streaks.remove(&slot);
    }
}
