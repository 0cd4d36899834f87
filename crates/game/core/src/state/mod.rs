//! Authoritative game state representation.
//!
//! This module owns the data structures describing players, the bank, board
//! occupancy, and turn bookkeeping. Runtime layers clone or query this state
//! but mutate it exclusively through [`crate::engine::GameEngine`].

mod bank;
mod board;
mod player;
mod turn;

pub use bank::Bank;
pub use board::{Building, BuildingKind, BoardState, PlacementOrigin, RoadPiece};
pub use player::{
    DevCard, DevCardSet, PlayerColor, PlayerId, PlayerState, Resource, ResourceSet,
};
pub use turn::{DiceRoll, SetupProgress, TradeOffer, TurnPhase, TurnState};

use serde::{Deserialize, Serialize};

use crate::board::BoardTopology;
use crate::config::GameConfig;

/// Canonical snapshot of the whole game.
///
/// There is exactly one live instance per session; both player actions and
/// accepted vision corrections mutate it through the same engine pipeline.
/// The `nonce` increments on every committed transition and versions
/// snapshots against staleness.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// RNG seed fixed at game creation; never modified. Combined with the
    /// nonce to derive per-event randomness.
    pub game_seed: u64,

    /// Committed transition count.
    nonce: u64,

    /// Fixed board graph. By construction nothing mutates it after setup.
    pub topology: BoardTopology,

    /// The three seats, indexed by `PlayerId`.
    pub players: Vec<PlayerState>,

    pub bank: Bank,

    /// Mutable occupancy over the topology.
    pub board: BoardState,

    pub turn: TurnState,
}

impl GameState {
    /// Fresh session: empty hands, full bank, shuffled deck, setup phase.
    pub fn new(topology: BoardTopology, game_seed: u64, config: &GameConfig) -> Self {
        let board = BoardState::new(&topology);
        Self {
            game_seed,
            nonce: 0,
            topology,
            players: PlayerId::ALL.into_iter().map(PlayerState::new).collect(),
            bank: Bank::new(config, game_seed),
            board,
            turn: TurnState::new(),
        }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub(crate) fn bump_nonce(&mut self) {
        self.nonce += 1;
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    pub fn player_by_color(&self, color: PlayerColor) -> &PlayerState {
        self.player(color.seat())
    }

    /// Per-kind conservation: players plus bank always hold exactly the
    /// stock the bank started with.
    pub fn resources_conserved(&self, config: &GameConfig) -> bool {
        Resource::ALL.into_iter().all(|resource| {
            let in_hands: u32 = self
                .players
                .iter()
                .map(|p| p.resources.get(resource) as u32)
                .sum();
            in_hands + self.bank.resources.get(resource) as u32
                == config.bank_resource_count as u32
        })
    }

    /// Total resource cards held by every seat, for displays.
    pub fn hand_sizes(&self) -> [u32; PlayerId::COUNT] {
        let mut sizes = [0; PlayerId::COUNT];
        for player in &self.players {
            sizes[player.id.index()] = player.hand_size();
        }
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::standard_topology;

    #[test]
    fn fresh_state_starts_in_setup_and_conserves_resources() {
        let config = GameConfig::default();
        let state = GameState::new(standard_topology(1), 1, &config);

        assert_eq!(state.nonce(), 0);
        assert_eq!(state.turn.phase, TurnPhase::Setup);
        assert_eq!(state.players.len(), PlayerId::COUNT);
        assert!(state.resources_conserved(&config));
        assert_eq!(state.hand_sizes(), [0, 0, 0]);
    }

    #[test]
    fn players_sit_in_seat_order() {
        let config = GameConfig::default();
        let state = GameState::new(standard_topology(1), 1, &config);
        for (i, player) in state.players.iter().enumerate() {
            assert_eq!(player.id, PlayerId(i as u8));
            assert_eq!(player.color, PlayerId(i as u8).color());
        }
    }
}
