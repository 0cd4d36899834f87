//! Player and system actions.
//!
//! Every mutation of [`crate::state::GameState`] is expressed as a tagged
//! action variant carrying a transition struct. Player actions come from the
//! input layer; system actions are driven by the runtime between player
//! actions (production payout, vision corrections, winner declaration) and
//! flow through the same commit path.

mod build;
mod dev_card;
mod discard;
mod end_turn;
mod production;
mod reconcile;
mod roll;
mod setup;
mod trade;
mod transition;
mod winner;

pub use build::{BuildCityAction, BuildError, BuildRoadAction, BuildSettlementAction};
pub use dev_card::{BuyDevCardAction, DevCardError, DevCardPlay, PlayDevCardAction};
pub use discard::{DiscardAction, DiscardError};
pub use end_turn::{EndTurnAction, EndTurnError};
pub use production::{ProduceAction, ProduceError, ProductionSummary};
pub use reconcile::{ReconcileAction, ReconcileError};
pub use roll::{RollAction, RollError};
pub use setup::{SetupError, SetupPlaceAction};
pub use trade::{AcceptTradeAction, ProposeTradeAction, TradeError, trade_rate};
pub use transition::ActionTransition;
pub use winner::{DeclareWinnerAction, WinnerError};

use serde::{Deserialize, Serialize};

use crate::board::{EdgeId, SlotId, VertexId};
use crate::state::{DevCard, DiceRoll, PlayerId, ResourceSet, TradeOffer};

/// A complete action submitted to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Initiated by a seat through the input layer.
    Player(PlayerActionKind),
    /// Driven by the runtime; no seat may submit these.
    System(SystemActionKind),
}

impl Action {
    /// The seat behind a player action; `None` for system actions.
    pub fn actor(&self) -> Option<PlayerId> {
        match self {
            Action::Player(kind) => Some(kind.actor()),
            Action::System(_) => None,
        }
    }

    /// Stable label for logs and events.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Action::Player(kind) => kind.kind_name(),
            Action::System(kind) => kind.kind_name(),
        }
    }
}

/// Actions available to players, one variant per `action_kind`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlayerActionKind {
    Roll(RollAction),
    BuildRoad(BuildRoadAction),
    BuildSettlement(BuildSettlementAction),
    BuildCity(BuildCityAction),
    BuyDevCard(BuyDevCardAction),
    PlayDevCard(PlayDevCardAction),
    ProposeTrade(ProposeTradeAction),
    AcceptTrade(AcceptTradeAction),
    Discard(DiscardAction),
    EndTurn(EndTurnAction),
    SetupPlace(SetupPlaceAction),
}

impl PlayerActionKind {
    pub fn actor(&self) -> PlayerId {
        match self {
            PlayerActionKind::Roll(a) => a.actor,
            PlayerActionKind::BuildRoad(a) => a.actor,
            PlayerActionKind::BuildSettlement(a) => a.actor,
            PlayerActionKind::BuildCity(a) => a.actor,
            PlayerActionKind::BuyDevCard(a) => a.actor,
            PlayerActionKind::PlayDevCard(a) => a.actor,
            PlayerActionKind::ProposeTrade(a) => a.actor,
            PlayerActionKind::AcceptTrade(a) => a.actor,
            PlayerActionKind::Discard(a) => a.actor,
            PlayerActionKind::EndTurn(a) => a.actor,
            PlayerActionKind::SetupPlace(a) => a.actor,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            PlayerActionKind::Roll(_) => "roll",
            PlayerActionKind::BuildRoad(_) => "build_road",
            PlayerActionKind::BuildSettlement(_) => "build_settlement",
            PlayerActionKind::BuildCity(_) => "build_city",
            PlayerActionKind::BuyDevCard(_) => "buy_dev_card",
            PlayerActionKind::PlayDevCard(_) => "play_dev_card",
            PlayerActionKind::ProposeTrade(_) => "propose_trade",
            PlayerActionKind::AcceptTrade(_) => "accept_trade",
            PlayerActionKind::Discard(_) => "discard",
            PlayerActionKind::EndTurn(_) => "end_turn",
            PlayerActionKind::SetupPlace(_) => "setup_place",
        }
    }
}

/// Runtime-driven actions sharing the player commit path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SystemActionKind {
    Produce(ProduceAction),
    Reconcile(ReconcileAction),
    DeclareWinner(DeclareWinnerAction),
}

impl SystemActionKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SystemActionKind::Produce(_) => "produce",
            SystemActionKind::Reconcile(_) => "reconcile",
            SystemActionKind::DeclareWinner(_) => "declare_winner",
        }
    }
}

/// Outcome data attached to a committed action, consumed by the runtime when
/// building notification events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionResult {
    DiceRolled {
        dice: DiceRoll,
        /// Seats owing discards because of this roll, with owed counts.
        discards_owed: Vec<(PlayerId, u8)>,
    },
    Production(ProductionSummary),
    RoadBuilt {
        edge: EdgeId,
    },
    SettlementBuilt {
        vertex: VertexId,
    },
    CityBuilt {
        vertex: VertexId,
    },
    DevCardBought {
        /// Revealed to the owner only; display layers must not broadcast it.
        card: DevCard,
        deck_remaining: usize,
    },
    DevCardPlayed {
        card: DevCard,
    },
    TradeProposed {
        offer: TradeOffer,
    },
    TradeAccepted {
        offer: TradeOffer,
    },
    Discarded {
        player: PlayerId,
        returned: ResourceSet,
    },
    TurnEnded {
        next_player: PlayerId,
    },
    SetupPlaced {
        vertex: VertexId,
        edge: EdgeId,
    },
    Reconciled {
        slot: SlotId,
        owner: PlayerId,
    },
    WinnerDeclared {
        player: PlayerId,
        points: u8,
    },
}
