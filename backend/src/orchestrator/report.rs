//! Run Report - read-only view of a run for reporting collaborators
//!
//! Worry levels are arbitrary precision, so they are rendered as decimal
//! strings to keep the JSON form lossless. Reports are never read back into
//! a run; there is no restore path.

use crate::models::agent::{Agent, AgentId};
use crate::models::Registry;
use crate::worry::WorryMode;
use serde::Serialize;
use std::collections::BTreeMap;

/// Agent state at report time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub inspection_count: u64,
    pub transform: String,
    pub divisor: u64,
    pub on_true: AgentId,
    pub on_false: AgentId,
    /// Queued worry levels, decimal, in queue order
    pub items: Vec<String>,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        AgentSnapshot {
            id: agent.id(),
            inspection_count: agent.inspection_count(),
            transform: agent.transform().source().to_string(),
            divisor: agent.divisor(),
            on_true: agent.on_true(),
            on_false: agent.on_false(),
            items: agent.items().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Snapshot of a run's progress and per-agent state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub rounds_completed: usize,
    pub total_rounds: usize,
    pub worry_mode: WorryMode,
    /// Agents in ascending id order
    pub agents: Vec<AgentSnapshot>,
}

impl RunReport {
    pub fn new(
        rounds_completed: usize,
        total_rounds: usize,
        worry_mode: WorryMode,
        registry: &Registry,
    ) -> Self {
        Self {
            rounds_completed,
            total_rounds,
            worry_mode,
            agents: registry.agents().map(AgentSnapshot::from).collect(),
        }
    }

    /// Inspection count per agent id
    pub fn inspection_counts(&self) -> BTreeMap<AgentId, u64> {
        self.agents
            .iter()
            .map(|agent| (agent.id, agent.inspection_count))
            .collect()
    }

    /// Items queued across all agents
    pub fn total_items(&self) -> usize {
        self.agents.iter().map(|agent| agent.items.len()).sum()
    }
}
