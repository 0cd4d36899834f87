//! The shared bank: resource stock and the development deck.

use serde::{Deserialize, Serialize};

use crate::config::{DECK_COMPOSITION, GameConfig};
use crate::rng::{PcgStream, compute_seed};
use crate::state::{DevCard, ResourceSet};

/// Seed context separating the deck shuffle from other draws.
const DECK_SHUFFLE_CONTEXT: u32 = 0xDECC;

/// Resource pool and development deck not owned by any player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Remaining units per resource kind.
    pub resources: ResourceSet,
    /// Development deck, shuffled once at setup. Top of the deck is the end
    /// of the vector.
    dev_deck: Vec<DevCard>,
    /// Non-VP cards already played, face up.
    pub discarded_dev_cards: Vec<DevCard>,
}

impl Bank {
    /// Build the bank for a fresh game: full resource stock and a deck
    /// shuffled deterministically from the game seed.
    pub fn new(config: &GameConfig, game_seed: u64) -> Self {
        let mut dev_deck = Vec::with_capacity(25);
        for (card, count) in DECK_COMPOSITION {
            for _ in 0..count {
                dev_deck.push(card);
            }
        }
        PcgStream::new(compute_seed(game_seed, 0, DECK_SHUFFLE_CONTEXT)).shuffle(&mut dev_deck);

        Self {
            resources: ResourceSet::uniform(config.bank_resource_count),
            dev_deck,
            discarded_dev_cards: Vec::new(),
        }
    }

    /// Draw the top card, if any remain.
    pub fn draw_dev_card(&mut self) -> Option<DevCard> {
        self.dev_deck.pop()
    }

    pub fn dev_deck_size(&self) -> usize {
        self.dev_deck.len()
    }

    /// Next card to be drawn, without drawing it. Test hook.
    #[cfg(test)]
    pub(crate) fn peek_dev_card(&self) -> Option<DevCard> {
        self.dev_deck.last().copied()
    }
}
