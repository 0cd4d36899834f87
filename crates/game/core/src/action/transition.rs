use crate::config::GameConfig;
use crate::state::GameState;

use super::ActionResult;

/// Defines how a concrete action variant validates and mutates game state.
///
/// The engine drives every transition through
/// `pre_validate → apply → post_validate`. Validation hooks receive read-only
/// state and must stay side-effect free; `apply` may assume `pre_validate`
/// succeeded. A failure in any phase leaves the state unchanged from the
/// caller's point of view because the engine never commits a partial result.
pub trait ActionTransition {
    type Error;

    /// Validates pre-conditions against the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly.
    fn apply(&self, state: &mut GameState, config: &GameConfig)
    -> Result<ActionResult, Self::Error>;

    /// Validates post-conditions against the state **after** mutation.
    fn post_validate(&self, _state: &GameState, _config: &GameConfig) -> Result<(), Self::Error> {
        Ok(())
    }
}
