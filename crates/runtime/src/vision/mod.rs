//! Vision reconciliation.
//!
//! The camera front end is an external collaborator that periodically
//! reports what it sees on the table. Its observations are noisy and never
//! authoritative: they queue here, survive a nearest-slot match and a
//! consecutive-agreement debounce, and only then become proposals against
//! the canonical state, applied through the engine when legal and surfaced
//! as conflicts when not.

mod debounce;
mod matcher;
mod observation;
mod reconciler;

pub use matcher::SlotMatcher;
pub use observation::{CameraObservation, ObservationBatch, ObservedOccupant};
pub use reconciler::{ReconcileOutcome, VisionReconciler};
