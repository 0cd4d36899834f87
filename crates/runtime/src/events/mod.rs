//! Notification events published by the runtime.
//!
//! Hardware and display collaborators (lights, LCD, dashboard, player
//! panels) subscribe to topics instead of polling the state.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{GameEvent, ReconciliationConflict, ReconciliationEvent, TurnEvent};
