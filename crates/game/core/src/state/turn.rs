//! Turn bookkeeping: phase machine state, dice, discard obligations, and the
//! open bank-trade offer.

use serde::{Deserialize, Serialize};

use crate::state::{PlayerId, Resource};

/// Phase of the turn state machine.
///
/// `Setup` is entered once; the main loop cycles
/// `Roll → Production → Action` (or `Roll → Discard → Action` on a 7) until
/// a winner ends the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Initial snake placements.
    Setup,
    /// Waiting for the active player's dice.
    Roll,
    /// Dice committed, payout pending.
    Production,
    /// Builds, trades, cards, end of turn.
    Action,
    /// A 7 was rolled; players over the hand limit owe discards.
    Discard,
    /// A winner was declared.
    Ended,
}

/// Position within the setup snake.
///
/// Even rounds run seats in order, odd rounds reversed, so with two rounds
/// the order is P1 P2 P3 P3 P2 P1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupProgress {
    pub round: u8,
    /// Step within the round, 0-based.
    pub step: u8,
}

impl SetupProgress {
    pub fn start() -> Self {
        Self { round: 0, step: 0 }
    }

    /// Seat placing at this position.
    pub fn current_player(&self) -> PlayerId {
        let seats = PlayerId::COUNT as u8;
        if self.round % 2 == 0 {
            PlayerId(self.step % seats)
        } else {
            PlayerId(seats - 1 - (self.step % seats))
        }
    }

    /// Position after one placement; `None` when all rounds are done.
    pub fn advanced(&self, rounds: u8) -> Option<Self> {
        let seats = PlayerId::COUNT as u8;
        let mut next = *self;
        next.step += 1;
        if next.step >= seats {
            next.step = 0;
            next.round += 1;
        }
        (next.round < rounds).then_some(next)
    }
}

/// One roll of the two dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die_1: u8,
    pub die_2: u8,
}

impl DiceRoll {
    pub fn new(die_1: u8, die_2: u8) -> Self {
        Self { die_1, die_2 }
    }

    pub fn total(&self) -> u8 {
        self.die_1 + self.die_2
    }

    /// A total of 7 triggers discards instead of production.
    pub fn triggers_discards(&self) -> bool {
        self.total() == 7
    }
}

/// An open bank exchange offer, not yet committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub player: PlayerId,
    pub give: Resource,
    pub get: Resource,
    /// Units of `give` per unit of `get`, locked at proposal time.
    pub rate: u8,
}

/// Everything the turn machine tracks between commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub active_player: PlayerId,
    pub phase: TurnPhase,
    /// Present only during `Setup`.
    pub setup: Option<SetupProgress>,
    /// Last committed roll of the current turn.
    pub dice: Option<DiceRoll>,
    /// Cards each seat still owes after a 7. Zero means no obligation.
    pub pending_discards: [u8; PlayerId::COUNT],
    pub trade_offer: Option<TradeOffer>,
    /// A non-VP development card was already played this turn.
    pub dev_card_played: bool,
    /// Road placements granted by Road Building that bypass the cost.
    pub free_roads: u8,
    /// Main-loop turn counter, 1-based; 0 during setup.
    pub turn_number: u32,
}

impl TurnState {
    /// Turn state at the very start of a session: setup snake, first seat.
    pub fn new() -> Self {
        Self {
            active_player: PlayerId(0),
            phase: TurnPhase::Setup,
            setup: Some(SetupProgress::start()),
            dice: None,
            pending_discards: [0; PlayerId::COUNT],
            trade_offer: None,
            dev_card_played: false,
            free_roads: 0,
            turn_number: 0,
        }
    }

    pub fn owed_discards(&self, player: PlayerId) -> u8 {
        self.pending_discards[player.index()]
    }

    pub fn has_pending_discards(&self) -> bool {
        self.pending_discards.iter().any(|&n| n > 0)
    }

    /// Reset the per-turn scratch fields when a turn ends.
    pub fn clear_turn_flags(&mut self) {
        self.dice = None;
        self.trade_offer = None;
        self.dev_card_played = false;
        self.free_roads = 0;
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
