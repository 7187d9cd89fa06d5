//! Orchestrator - the round engine
//!
//! Owns one run: the agent registry, the round clock and the worry
//! controller. See `engine.rs` for the round loop.

pub mod engine;
pub mod report;

// Re-export main types for convenience
pub use engine::{Orchestrator, OrchestratorConfig, RoundResult, SimulationError};
pub use report::{AgentSnapshot, RunReport};
