//! Run-level coordination on top of the pure engine.

pub mod simulator;

pub use simulator::{SimulationError, SimulationReport, Simulator, StepReport, StepStatus};
