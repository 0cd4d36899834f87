//! Deterministic game rules and data types shared across the runtime and
//! offline tools.
//!
//! `game-core` defines the canonical model of a three-player
//! hex-and-resource table game: the board graph, the authoritative
//! [`state::GameState`], the tagged actions that mutate it, and pure scoring.
//! All state mutation flows through [`engine::GameEngine`]; the runtime
//! layers (turn orchestration, vision reconciliation, persistence) depend on
//! the types re-exported here and never touch the state directly.

pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod rng;
pub mod scoring;
pub mod state;

pub use action::{
    AcceptTradeAction, Action, ActionResult, ActionTransition, BuildCityAction, BuildError,
    BuildRoadAction, BuildSettlementAction, BuyDevCardAction, DeclareWinnerAction, DevCardError,
    DevCardPlay, DiscardAction, DiscardError, EndTurnAction, EndTurnError, PlayDevCardAction,
    PlayerActionKind, ProduceAction, ProduceError, ProductionSummary, ProposeTradeAction,
    ReconcileAction, ReconcileError, RollAction, RollError, SetupError, SetupPlaceAction,
    SystemActionKind, TradeError, WinnerError, trade_rate,
};
pub use board::{
    BoardTopology, Calibration, CameraPoint, Edge, EdgeId, Harbor, HarborKind, Hex, HexId, SlotId,
    Terrain, VertexId, default_calibration, standard_topology, standard_topology_with_harbors,
};
pub use config::{GameConfig, ReconcileConfig, TiePolicy};
pub use engine::{ExecuteError, ExecutionOutcome, GameEngine, TransitionPhase, TransitionPhaseError};
pub use scoring::Scoreboard;
pub use state::{
    Bank, BoardState, Building, BuildingKind, DevCard, DevCardSet, DiceRoll, GameState,
    PlacementOrigin, PlayerColor, PlayerId, PlayerState, Resource, ResourceSet, RoadPiece,
    SetupProgress, TradeOffer, TurnPhase, TurnState,
};
