//! Agent model
//!
//! Represents one inspector taking part in the redistribution process.
//! Each agent has:
//! - An ordered queue of worry levels (arbitrary precision, non-negative)
//! - A transform expression applied to every item it inspects
//! - A positive test divisor and two routing targets
//! - A running inspection counter
//!
//! Routing targets are stored as ids and resolved through the registry, so
//! agents never hold references to each other.

use crate::expression::Transform;
use num_bigint::BigUint;
use num_traits::Zero;
use std::num::NonZeroU64;

/// Stable agent identifier
pub type AgentId = usize;

/// Worry level carried by an item
pub type WorryLevel = BigUint;

/// External description of an agent, as produced by an input reader
///
/// # Example
/// ```
/// use worry_simulator_core_rs::AgentSpec;
///
/// let spec = AgentSpec::new(0, "old * 19", 23, 2, 3).with_items([79u32, 98]);
/// assert_eq!(spec.items.len(), 2);
/// assert_eq!(spec.transform, "old * 19");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSpec {
    /// Unique agent id
    pub id: AgentId,

    /// Starting items in queue order
    pub items: Vec<WorryLevel>,

    /// Transform expression over `old`
    pub transform: String,

    /// Divisibility test value (must be positive)
    pub divisor: u64,

    /// Target when the test passes
    pub on_true: AgentId,

    /// Target when the test fails
    pub on_false: AgentId,
}

impl AgentSpec {
    /// Create a spec with an empty starting queue
    pub fn new(
        id: AgentId,
        transform: impl Into<String>,
        divisor: u64,
        on_true: AgentId,
        on_false: AgentId,
    ) -> Self {
        Self {
            id,
            items: Vec::new(),
            transform: transform.into(),
            divisor,
            on_true,
            on_false,
        }
    }

    /// Replace the starting items
    pub fn with_items<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<WorryLevel>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }
}

/// An agent inside a loaded registry
///
/// Only the registry and the round engine mutate agents: items are appended
/// on receipt and drained at the start of the agent's turn, and the counter
/// grows once per turn by the number of items drained.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    items: Vec<WorryLevel>,
    transform: Transform,
    divisor: NonZeroU64,
    on_true: AgentId,
    on_false: AgentId,
    inspection_count: u64,
}

impl Agent {
    /// Build an agent from already-validated parts
    pub fn new(
        id: AgentId,
        items: Vec<WorryLevel>,
        transform: Transform,
        divisor: NonZeroU64,
        on_true: AgentId,
        on_false: AgentId,
    ) -> Self {
        Self {
            id,
            items,
            transform,
            divisor,
            on_true,
            on_false,
            inspection_count: 0,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Items currently queued, in insertion order
    pub fn items(&self) -> &[WorryLevel] {
        &self.items
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn divisor(&self) -> u64 {
        self.divisor.get()
    }

    pub fn on_true(&self) -> AgentId {
        self.on_true
    }

    pub fn on_false(&self) -> AgentId {
        self.on_false
    }

    /// Total items inspected over the run so far
    pub fn inspection_count(&self) -> u64 {
        self.inspection_count
    }

    /// True if `level` passes this agent's divisibility test
    pub fn passes_test(&self, level: &WorryLevel) -> bool {
        (level % self.divisor.get()).is_zero()
    }

    /// Target agent for an item at `level`
    pub fn route_for(&self, level: &WorryLevel) -> AgentId {
        self.target_for(self.passes_test(level))
    }

    /// Target agent for a test outcome
    pub fn target_for(&self, passed: bool) -> AgentId {
        if passed {
            self.on_true
        } else {
            self.on_false
        }
    }

    pub(crate) fn receive(&mut self, item: WorryLevel) {
        self.items.push(item);
    }

    pub(crate) fn take_items(&mut self) -> Vec<WorryLevel> {
        std::mem::take(&mut self.items)
    }

    pub(crate) fn record_inspections(&mut self, count: u64) {
        self.inspection_count += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> Agent {
        Agent::new(
            0,
            vec![BigUint::from(79u32), BigUint::from(98u32)],
            Transform::compile("old * 19").unwrap(),
            NonZeroU64::new(23).unwrap(),
            2,
            3,
        )
    }

    #[test]
    fn test_route_for() {
        let agent = agent();
        assert_eq!(agent.route_for(&BigUint::from(46u32)), 2);
        assert_eq!(agent.route_for(&BigUint::from(500u32)), 3);
        assert_eq!(agent.route_for(&BigUint::from(0u32)), 2);
        assert_eq!(agent.target_for(true), 2);
        assert_eq!(agent.target_for(false), 3);
    }

    #[test]
    fn test_take_items_empties_queue() {
        let mut agent = agent();
        let taken = agent.take_items();
        assert_eq!(taken.len(), 2);
        assert!(agent.items().is_empty());

        agent.receive(BigUint::from(5u32));
        assert_eq!(agent.items(), &[BigUint::from(5u32)]);
    }

    #[test]
    fn test_record_inspections_accumulates() {
        let mut agent = agent();
        agent.record_inspections(2);
        agent.record_inspections(3);
        assert_eq!(agent.inspection_count(), 5);
    }
}
