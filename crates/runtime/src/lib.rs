//! Table orchestration over the deterministic rules engine.
//!
//! Wires the single-writer simulation worker, the topic event bus, the
//! vision reconciler, and snapshot persistence into a runtime that clients
//! drive through [`RuntimeHandle`]. Everything long-running (frame capture,
//! color processing, displays) lives outside this crate and talks to it via
//! observation batches and event subscriptions.

mod error;
mod handle;
mod runtime;

pub mod events;
pub mod providers;
pub mod repository;
pub mod vision;
pub mod workers;

pub use error::{Result, RuntimeError};
pub use events::{
    Event, EventBus, GameEvent, ReconciliationConflict, ReconciliationEvent, Topic, TurnEvent,
};
pub use handle::RuntimeHandle;
pub use providers::{ActionProvider, ScriptedProvider};
pub use repository::{
    FileSnapshotRepository, MemorySnapshotRepository, RepositoryError, SnapshotRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use vision::{
    CameraObservation, ObservationBatch, ObservedOccupant, ReconcileOutcome, SlotMatcher,
    VisionReconciler,
};
