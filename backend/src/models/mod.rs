//! Domain models for the worry simulator

pub mod agent;
pub mod event;
pub mod registry;

// Re-exports
pub use agent::{Agent, AgentId, AgentSpec, WorryLevel};
pub use event::{Event, EventLog};
pub use registry::{Registry, RegistryError};
