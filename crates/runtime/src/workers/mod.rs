//! Background workers.

mod simulation;

pub use simulation::{Command, SimulationWorker};
