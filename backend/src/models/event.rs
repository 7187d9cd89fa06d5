//! Structured record of round boundaries.
//!
//! The round engine can optionally keep an `EventLog` of what each turn and
//! round did. It is an observer only: nothing in the simulation reads it back.
//!
//! # Event Types
//!
//! - **TurnCompleted**: one agent finished inspecting its snapshot
//! - **RoundCompleted**: every agent has had its turn
//!
//! # Example
//!
//! ```rust
//! use worry_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::RoundCompleted {
//!     round: 1,
//!     items_inspected: 10,
//!     items_in_flight: 10,
//! });
//! assert_eq!(log.events_in_round(1).len(), 1);
//! ```

use crate::models::agent::AgentId;
use serde::Serialize;

/// Simulation event at a turn or round boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// An agent inspected and routed every item from its turn-start snapshot
    TurnCompleted {
        round: usize,
        agent_id: AgentId,
        inspected: usize,
        routed_on_true: usize,
        routed_on_false: usize,
    },

    /// All agents have taken their turn
    RoundCompleted {
        round: usize,
        items_inspected: usize,
        items_in_flight: usize,
    },
}

impl Event {
    /// Round (1-based) in which this event occurred
    pub fn round(&self) -> usize {
        match self {
            Event::TurnCompleted { round, .. } => *round,
            Event::RoundCompleted { round, .. } => *round,
        }
    }

    /// Short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::TurnCompleted { .. } => "TurnCompleted",
            Event::RoundCompleted { .. } => "RoundCompleted",
        }
    }

    /// Agent the event concerns, if any
    pub fn agent_id(&self) -> Option<AgentId> {
        match self {
            Event::TurnCompleted { agent_id, .. } => Some(*agent_id),
            Event::RoundCompleted { .. } => None,
        }
    }
}

/// Append-only event log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific round
    pub fn events_in_round(&self, round: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.round() == round).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific agent
    pub fn events_for_agent(&self, agent_id: AgentId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.agent_id() == Some(agent_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(round: usize, agent_id: AgentId) -> Event {
        Event::TurnCompleted {
            round,
            agent_id,
            inspected: 2,
            routed_on_true: 1,
            routed_on_false: 1,
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = turn(3, 1);
        assert_eq!(event.round(), 3);
        assert_eq!(event.event_type(), "TurnCompleted");
        assert_eq!(event.agent_id(), Some(1));
    }

    #[test]
    fn test_log_filters() {
        let mut log = EventLog::new();
        log.log(turn(1, 0));
        log.log(turn(1, 1));
        log.log(Event::RoundCompleted {
            round: 1,
            items_inspected: 4,
            items_in_flight: 4,
        });
        log.log(turn(2, 0));

        assert_eq!(log.len(), 4);
        assert_eq!(log.events_in_round(1).len(), 3);
        assert_eq!(log.events_of_type("RoundCompleted").len(), 1);
        assert_eq!(log.events_for_agent(0).len(), 2);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(turn(1, 2)).unwrap();
        assert_eq!(json["type"], "TurnCompleted");
        assert_eq!(json["agent_id"], 2);
    }
}
