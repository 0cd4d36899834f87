//! Error types for the action execution pipeline.

use crate::action::{
    BuildError, DevCardError, DiscardError, EndTurnError, ProduceError, ReconcileError, RollError,
    SetupError, TradeError, WinnerError,
};
use crate::state::PlayerId;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing an action through the game engine.
///
/// Every variant is non-fatal: the state is left exactly as it was before
/// the rejected action, and the caller decides whether to re-prompt.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExecuteError {
    #[error("roll failed: {0}")]
    Roll(TransitionPhaseError<RollError>),

    #[error("road build failed: {0}")]
    BuildRoad(TransitionPhaseError<BuildError>),

    #[error("settlement build failed: {0}")]
    BuildSettlement(TransitionPhaseError<BuildError>),

    #[error("city build failed: {0}")]
    BuildCity(TransitionPhaseError<BuildError>),

    #[error("development card purchase failed: {0}")]
    BuyDevCard(TransitionPhaseError<DevCardError>),

    #[error("development card play failed: {0}")]
    PlayDevCard(TransitionPhaseError<DevCardError>),

    #[error("trade proposal failed: {0}")]
    ProposeTrade(TransitionPhaseError<TradeError>),

    #[error("trade acceptance failed: {0}")]
    AcceptTrade(TransitionPhaseError<TradeError>),

    #[error("discard failed: {0}")]
    Discard(TransitionPhaseError<DiscardError>),

    #[error("end of turn failed: {0}")]
    EndTurn(TransitionPhaseError<EndTurnError>),

    #[error("setup placement failed: {0}")]
    SetupPlace(TransitionPhaseError<SetupError>),

    #[error("production failed: {0}")]
    Produce(TransitionPhaseError<ProduceError>),

    #[error("reconciliation failed: {0}")]
    Reconcile(TransitionPhaseError<ReconcileError>),

    #[error("winner declaration failed: {0}")]
    DeclareWinner(TransitionPhaseError<WinnerError>),

    #[error("not {actor}'s turn; {active} is active")]
    NotPlayersTurn { actor: PlayerId, active: PlayerId },

    #[error("the game has ended")]
    GameOver,
}

impl ExecuteError {
    /// Pipeline stage the failure came from, when one applies.
    pub fn phase(&self) -> Option<TransitionPhase> {
        match self {
            ExecuteError::Roll(e) => Some(e.phase),
            ExecuteError::BuildRoad(e)
            | ExecuteError::BuildSettlement(e)
            | ExecuteError::BuildCity(e) => Some(e.phase),
            ExecuteError::BuyDevCard(e) | ExecuteError::PlayDevCard(e) => Some(e.phase),
            ExecuteError::ProposeTrade(e) | ExecuteError::AcceptTrade(e) => Some(e.phase),
            ExecuteError::Discard(e) => Some(e.phase),
            ExecuteError::EndTurn(e) => Some(e.phase),
            ExecuteError::SetupPlace(e) => Some(e.phase),
            ExecuteError::Produce(e) => Some(e.phase),
            ExecuteError::Reconcile(e) => Some(e.phase),
            ExecuteError::DeclareWinner(e) => Some(e.phase),
            ExecuteError::NotPlayersTurn { .. } | ExecuteError::GameOver => None,
        }
    }

    /// True when the action was refused by validation rather than failing
    /// mid-apply.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self.phase(),
            Some(TransitionPhase::Apply) | Some(TransitionPhase::PostValidate)
        )
    }
}
