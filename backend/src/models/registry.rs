//! Agent Registry
//!
//! Ordered, id-addressed collection of agents for one run.
//!
//! # Critical Invariants
//!
//! 1. **Unique ids**: no two agents share an id
//! 2. **Closed routing**: every `on_true` / `on_false` target exists
//! 3. **Positive divisors**: every test divisor is > 0
//! 4. **Fixed membership**: agents are never added or removed after load
//!
//! # Turn visibility
//!
//! `drain_snapshot` hands the round engine exactly the items an agent holds
//! when its turn starts and empties the queue. Anything enqueued afterwards,
//! including items the agent routes to itself, waits for its next turn.

use crate::expression::{ExpressionError, Transform};
use crate::models::agent::{Agent, AgentId, AgentSpec, WorryLevel};
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU64;
use thiserror::Error;

/// Errors raised while building or addressing the registry
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Registry must contain at least one agent")]
    Empty,

    #[error("Duplicate agent id: {0}")]
    DuplicateAgentId(AgentId),

    #[error("Agent {agent_id} routes to unknown agent {target}")]
    DanglingRoute { agent_id: AgentId, target: AgentId },

    #[error("Agent {agent_id} has a zero test divisor")]
    ZeroDivisor { agent_id: AgentId },

    #[error("Agent {agent_id} has an invalid transform: {source}")]
    InvalidTransform {
        agent_id: AgentId,
        #[source]
        source: ExpressionError,
    },

    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),
}

/// All agents taking part in a run, keyed by id
///
/// # Example
///
/// ```rust
/// use worry_simulator_core_rs::{AgentSpec, Registry};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = Registry::load(vec![
///     AgentSpec::new(0, "old + 1", 2, 1, 1).with_items([4u32]),
///     AgentSpec::new(1, "old * 2", 3, 0, 0),
/// ])?;
///
/// assert_eq!(registry.ids_in_order(), vec![0, 1]);
/// assert_eq!(registry.total_items(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    agents: BTreeMap<AgentId, Agent>,
}

impl Registry {
    /// Validate agent specs and build the registry
    ///
    /// # Errors
    ///
    /// - `Empty` if no specs are given
    /// - `DuplicateAgentId` if two specs share an id
    /// - `ZeroDivisor` if a test divisor is zero
    /// - `DanglingRoute` if a routing target is not in the spec set
    /// - `InvalidTransform` if a transform does not parse
    pub fn load(specs: impl IntoIterator<Item = AgentSpec>) -> Result<Self, RegistryError> {
        let specs: Vec<AgentSpec> = specs.into_iter().collect();
        if specs.is_empty() {
            return Err(RegistryError::Empty);
        }

        // Routes may point forward, so collect every id before checking them
        let mut ids = BTreeSet::new();
        for spec in &specs {
            if !ids.insert(spec.id) {
                return Err(RegistryError::DuplicateAgentId(spec.id));
            }
        }

        let mut agents = BTreeMap::new();
        for spec in specs {
            let agent_id = spec.id;

            let divisor =
                NonZeroU64::new(spec.divisor).ok_or(RegistryError::ZeroDivisor { agent_id })?;

            for target in [spec.on_true, spec.on_false] {
                if !ids.contains(&target) {
                    return Err(RegistryError::DanglingRoute { agent_id, target });
                }
            }

            let transform = Transform::compile(&spec.transform)
                .map_err(|source| RegistryError::InvalidTransform { agent_id, source })?;
            if !transform.expr().references_variable() {
                tracing::warn!(
                    agent_id,
                    transform = transform.source(),
                    "transform ignores the current worry level"
                );
            }

            agents.insert(
                agent_id,
                Agent::new(
                    agent_id,
                    spec.items,
                    transform,
                    divisor,
                    spec.on_true,
                    spec.on_false,
                ),
            );
        }

        Ok(Self { agents })
    }

    /// Look up an agent by id
    pub fn agent(&self, id: AgentId) -> Result<&Agent, RegistryError> {
        self.agents.get(&id).ok_or(RegistryError::AgentNotFound(id))
    }

    fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent, RegistryError> {
        self.agents
            .get_mut(&id)
            .ok_or(RegistryError::AgentNotFound(id))
    }

    /// Agent ids in ascending order; fixed for the lifetime of the run
    pub fn ids_in_order(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    /// Agents in ascending id order
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    /// Append an item to the back of an agent's queue
    pub fn enqueue(&mut self, id: AgentId, item: WorryLevel) -> Result<(), RegistryError> {
        self.agent_mut(id)?.receive(item);
        Ok(())
    }

    /// Take every item an agent currently holds, leaving its queue empty
    pub fn drain_snapshot(&mut self, id: AgentId) -> Result<Vec<WorryLevel>, RegistryError> {
        Ok(self.agent_mut(id)?.take_items())
    }

    /// Add `count` inspections to an agent's counter
    pub fn record_inspections(&mut self, id: AgentId, count: u64) -> Result<(), RegistryError> {
        self.agent_mut(id)?.record_inspections(count);
        Ok(())
    }

    /// Inspection count per agent id
    pub fn inspection_counts(&self) -> BTreeMap<AgentId, u64> {
        self.agents
            .iter()
            .map(|(id, agent)| (*id, agent.inspection_count()))
            .collect()
    }

    /// Items queued across all agents
    pub fn total_items(&self) -> usize {
        self.agents.values().map(|agent| agent.items().len()).sum()
    }

    /// Every agent's test divisor, in ascending id order
    pub fn divisors(&self) -> impl Iterator<Item = u64> + '_ {
        self.agents.values().map(Agent::divisor)
    }
}
