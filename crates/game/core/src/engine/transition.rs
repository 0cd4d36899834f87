//! Action transition dispatch.

use crate::action::{
    Action, ActionResult, ActionTransition, PlayerActionKind, SystemActionKind,
};
use crate::config::GameConfig;
use crate::state::GameState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - check preconditions before mutation
/// 2. `apply` - mutate the game state and return the result
/// 3. `post_validate` - verify invariants after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    config: &GameConfig,
) -> Result<ActionResult, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, config)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state, config)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, config)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes an action to its transition. Internal implementation behind
/// [`super::GameEngine::execute`].
pub(super) fn execute_transition(
    action: &Action,
    state: &mut GameState,
    config: &GameConfig,
) -> Result<ActionResult, ExecuteError> {
    match action {
        Action::Player(kind) => match kind {
            PlayerActionKind::Roll(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::Roll)
            }
            PlayerActionKind::BuildRoad(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::BuildRoad)
            }
            PlayerActionKind::BuildSettlement(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::BuildSettlement)
            }
            PlayerActionKind::BuildCity(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::BuildCity)
            }
            PlayerActionKind::BuyDevCard(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::BuyDevCard)
            }
            PlayerActionKind::PlayDevCard(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::PlayDevCard)
            }
            PlayerActionKind::ProposeTrade(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::ProposeTrade)
            }
            PlayerActionKind::AcceptTrade(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::AcceptTrade)
            }
            PlayerActionKind::Discard(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::Discard)
            }
            PlayerActionKind::EndTurn(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::EndTurn)
            }
            PlayerActionKind::SetupPlace(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::SetupPlace)
            }
        },
        Action::System(kind) => match kind {
            SystemActionKind::Produce(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::Produce)
            }
            SystemActionKind::Reconcile(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::Reconcile)
            }
            SystemActionKind::DeclareWinner(t) => {
                drive_transition(t, state, config).map_err(ExecuteError::DeclareWinner)
            }
        },
    }
}
