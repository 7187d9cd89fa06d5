//! Orchestrator Engine
//!
//! Runs the round loop over a loaded registry:
//!
//! ```text
//! For each round r (1-based):
//!   For each agent id, ascending:
//!     1. Drain the agent's queue (turn-start snapshot)
//!     2. For each drained item, in insertion order:
//!        a. Apply the agent's transform
//!        b. Apply the run's worry controller
//!        c. Test divisibility, pick on_true / on_false
//!        d. Enqueue on the target
//!     3. Add the snapshot size to the agent's inspection count
//!   Advance the round clock
//! ```
//!
//! Items routed during a round, including items an agent routes to itself,
//! are only seen by their receiver on its next turn.
//!
//! Rounds are not transactional. An error aborts the run with the registry
//! left as it was at the point of failure.
//!
//! # Example
//!
//! ```rust
//! use worry_simulator_core_rs::orchestrator::{Orchestrator, OrchestratorConfig};
//! use worry_simulator_core_rs::AgentSpec;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let specs = vec![
//!     AgentSpec::new(0, "old * 19", 23, 2, 3).with_items([79u32, 98]),
//!     AgentSpec::new(1, "old + 6", 19, 2, 0).with_items([54u32, 65, 75, 74]),
//!     AgentSpec::new(2, "old * old", 13, 1, 3).with_items([79u32, 60, 97]),
//!     AgentSpec::new(3, "old + 3", 17, 0, 1).with_items([74u32]),
//! ];
//!
//! let mut orchestrator = Orchestrator::new(OrchestratorConfig::dampened(20, 3), specs)?;
//! orchestrator.run()?;
//! assert_eq!(orchestrator.monkey_business()?.to_string(), "10605");
//! # Ok(())
//! # }
//! ```

use crate::core::round::RoundClock;
use crate::expression::ExpressionError;
use crate::models::{AgentId, AgentSpec, Event, EventLog, Registry, RegistryError, WorryLevel};
use crate::orchestrator::report::RunReport;
use crate::ranking::{rank_agents, top_k_product, RankingError};
use crate::worry::{create_controller, WorryController, WorryError, WorryMode};
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, trace};

/// Rounds between progress log lines
const PROGRESS_INTERVAL: usize = 500;

// ============================================================================
// Configuration Types
// ============================================================================

fn default_rank_k() -> usize {
    2
}

/// Run configuration
///
/// # Fields
///
/// * `rounds` - Number of rounds to execute (required, positive)
/// * `worry_mode` - Worry regime for the whole run
/// * `rank_k` - How many top counts the ranking step multiplies (default 2)
/// * `record_events` - Keep a structured `EventLog` of turn and round boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub rounds: usize,

    pub worry_mode: WorryMode,

    #[serde(default = "default_rank_k")]
    pub rank_k: usize,

    #[serde(default)]
    pub record_events: bool,
}

impl OrchestratorConfig {
    /// Short run with floor-division relief
    pub fn dampened(rounds: usize, relief: u64) -> Self {
        Self {
            rounds,
            worry_mode: WorryMode::Dampened { relief },
            rank_k: default_rank_k(),
            record_events: false,
        }
    }

    /// Long run bounded by the common modulus
    pub fn modular(rounds: usize) -> Self {
        Self {
            rounds,
            worry_mode: WorryMode::Modular,
            rank_k: default_rank_k(),
            record_events: false,
        }
    }

    pub fn with_rank_k(mut self, rank_k: usize) -> Self {
        self.rank_k = rank_k;
        self
    }

    pub fn with_events(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.rounds == 0 {
            return Err(SimulationError::InvalidConfig(
                "rounds must be positive".to_string(),
            ));
        }
        if self.rank_k == 0 {
            return Err(SimulationError::InvalidConfig(
                "rank_k must be positive".to_string(),
            ));
        }
        if let WorryMode::Dampened { relief: 0 } = self.worry_mode {
            return Err(SimulationError::InvalidConfig(
                "relief must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Errors and Results
// ============================================================================

/// Errors that abort a run
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Worry(#[from] WorryError),

    #[error("Agent {agent_id} failed to transform worry level {level}: {source}")]
    Transform {
        agent_id: AgentId,
        level: String,
        #[source]
        source: ExpressionError,
    },

    #[error("Agent {agent_id} produced negative worry level {level} from '{expression}'")]
    NegativeWorry {
        agent_id: AgentId,
        expression: String,
        level: String,
    },

    #[error("Run already completed all {rounds} configured rounds")]
    RoundLimitReached { rounds: usize },

    #[error(transparent)]
    Ranking(#[from] RankingError),
}

/// Summary of one executed round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    /// 1-based round number
    pub round: usize,

    /// Items inspected across all agents this round
    pub items_inspected: usize,

    /// Items queued across all agents after the round
    pub items_in_flight: usize,
}

#[derive(Debug, Default)]
struct TurnOutcome {
    inspected: usize,
    routed_on_true: usize,
    routed_on_false: usize,
}

struct Inspection {
    target: AgentId,
    level: WorryLevel,
    passed: bool,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// One run: a registry, a round budget and a worry controller
#[derive(Debug)]
pub struct Orchestrator {
    config: OrchestratorConfig,
    registry: Registry,
    controller: Box<dyn WorryController>,
    clock: RoundClock,
    event_log: EventLog,
}

impl Orchestrator {
    /// Validate `config`, load the registry and select the worry controller
    pub fn new(
        config: OrchestratorConfig,
        specs: impl IntoIterator<Item = AgentSpec>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let registry = Registry::load(specs)?;
        let controller = create_controller(&config.worry_mode, &registry)?;

        info!(
            agents = registry.num_agents(),
            rounds = config.rounds,
            worry_mode = %config.worry_mode,
            "orchestrator initialised"
        );

        Ok(Self {
            clock: RoundClock::new(config.rounds),
            config,
            registry,
            controller,
            event_log: EventLog::new(),
        })
    }

    /// Execute exactly one round
    pub fn round(&mut self) -> Result<RoundResult, SimulationError> {
        if self.clock.is_complete() {
            return Err(SimulationError::RoundLimitReached {
                rounds: self.clock.total_rounds(),
            });
        }

        let round = self.clock.current_round() + 1;
        let mut items_inspected = 0;

        for agent_id in self.registry.ids_in_order() {
            let outcome = self.take_turn(agent_id)?;
            items_inspected += outcome.inspected;

            if self.config.record_events {
                self.event_log.log(Event::TurnCompleted {
                    round,
                    agent_id,
                    inspected: outcome.inspected,
                    routed_on_true: outcome.routed_on_true,
                    routed_on_false: outcome.routed_on_false,
                });
            }
        }

        self.clock.advance();
        let items_in_flight = self.registry.total_items();

        if self.config.record_events {
            self.event_log.log(Event::RoundCompleted {
                round,
                items_inspected,
                items_in_flight,
            });
        }

        debug!(round, items_inspected, items_in_flight, "round completed");
        if round % PROGRESS_INTERVAL == 0 {
            info!(round, total = self.clock.total_rounds(), "progress");
        }

        Ok(RoundResult {
            round,
            items_inspected,
            items_in_flight,
        })
    }

    /// Execute every remaining round
    pub fn run(&mut self) -> Result<(), SimulationError> {
        while !self.clock.is_complete() {
            self.round()?;
        }
        info!(
            rounds = self.clock.current_round(),
            worry_mode = %self.config.worry_mode,
            "run completed"
        );
        Ok(())
    }

    fn take_turn(&mut self, agent_id: AgentId) -> Result<TurnOutcome, SimulationError> {
        let items = self.registry.drain_snapshot(agent_id)?;
        let mut outcome = TurnOutcome {
            inspected: items.len(),
            ..TurnOutcome::default()
        };
        if items.is_empty() {
            return Ok(outcome);
        }

        for item in items {
            let inspection = self.inspect(agent_id, item)?;
            if inspection.passed {
                outcome.routed_on_true += 1;
            } else {
                outcome.routed_on_false += 1;
            }
            self.registry.enqueue(inspection.target, inspection.level)?;
        }

        self.registry
            .record_inspections(agent_id, outcome.inspected as u64)?;
        debug!(agent_id, inspected = outcome.inspected, "turn completed");
        Ok(outcome)
    }

    fn inspect(&self, agent_id: AgentId, item: WorryLevel) -> Result<Inspection, SimulationError> {
        let agent = self.registry.agent(agent_id)?;
        let old = BigInt::from(item);

        let transformed =
            agent
                .transform()
                .apply(&old)
                .map_err(|source| SimulationError::Transform {
                    agent_id,
                    level: old.to_string(),
                    source,
                })?;

        let relieved = self.controller.relieve(transformed);
        let level = relieved
            .to_biguint()
            .ok_or_else(|| SimulationError::NegativeWorry {
                agent_id,
                expression: agent.transform().source().to_string(),
                level: relieved.to_string(),
            })?;

        let passed = agent.passes_test(&level);
        let target = agent.target_for(passed);
        trace!(agent_id, %old, %level, target, "inspected item");

        Ok(Inspection {
            target,
            level,
            passed,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Product of the top `rank_k` inspection counts
    pub fn monkey_business(&self) -> Result<BigUint, SimulationError> {
        Ok(top_k_product(&self.registry, self.config.rank_k)?)
    }

    /// The `rank_k` most active agents with their counts
    pub fn most_active(&self) -> Vec<(AgentId, u64)> {
        let mut ranked = rank_agents(&self.registry.inspection_counts());
        ranked.truncate(self.config.rank_k);
        ranked
    }

    pub fn inspection_counts(&self) -> BTreeMap<AgentId, u64> {
        self.registry.inspection_counts()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Rounds completed so far
    pub fn current_round(&self) -> usize {
        self.clock.current_round()
    }

    pub fn is_complete(&self) -> bool {
        self.clock.is_complete()
    }

    pub fn controller_name(&self) -> &'static str {
        self.controller.name()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Read-only view of the current state for reporting
    pub fn report(&self) -> RunReport {
        RunReport::new(
            self.clock.current_round(),
            self.clock.total_rounds(),
            self.config.worry_mode,
            &self.registry,
        )
    }
}
