//! Worry Simulator Core - Rust Engine
//!
//! Round-based item redistribution among a fixed set of agents, with
//! deterministic, strictly sequential execution.
//!
//! # Architecture
//!
//! - **core**: Round counting
//! - **expression**: Safe evaluator for per-agent transform expressions
//! - **models**: Domain types (Agent, Registry, Event)
//! - **worry**: Post-transform reduction regimes (dampened, modular)
//! - **orchestrator**: Round engine and run reports
//! - **ranking**: Top-k inspection-count product
//! - **parsing**: Puzzle-notes reader producing agent specs
//!
//! # Critical Invariants
//!
//! 1. Worry levels are arbitrary precision; nothing wraps
//! 2. Agents take turns in ascending id order, items in insertion order
//! 3. Items received during a round wait for the receiver's next turn
//! 4. Transform expressions never reach a general-purpose evaluator

// Module declarations
pub mod core;
pub mod expression;
pub mod models;
pub mod orchestrator;
pub mod parsing;
pub mod ranking;
pub mod worry;

// Re-exports for convenience
pub use crate::core::round::RoundClock;
pub use expression::{evaluate, ExpressionError, Transform};
pub use models::{
    agent::{Agent, AgentId, AgentSpec, WorryLevel},
    event::{Event, EventLog},
    registry::{Registry, RegistryError},
};
pub use orchestrator::{
    AgentSnapshot, Orchestrator, OrchestratorConfig, RoundResult, RunReport, SimulationError,
};
pub use parsing::{parse_notes, ParseError};
pub use ranking::{top_k_product, RankingError};
pub use worry::{WorryController, WorryMode};
