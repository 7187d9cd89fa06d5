//! Round management for the simulation
//!
//! A run executes a fixed, configured number of rounds. There is no other
//! stopping condition, so the clock only needs to count.

use serde::{Deserialize, Serialize};

/// Counts completed rounds against the configured total
///
/// # Example
/// ```
/// use worry_simulator_core_rs::RoundClock;
///
/// let mut clock = RoundClock::new(20);
/// assert_eq!(clock.current_round(), 0);
/// assert!(!clock.is_complete());
///
/// clock.advance();
/// assert_eq!(clock.current_round(), 1);
/// assert_eq!(clock.remaining(), 19);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClock {
    /// Rounds completed since the run started
    current_round: usize,
    /// Rounds the run is configured to execute
    total_rounds: usize,
}

impl RoundClock {
    /// Create a new clock for a run of `total_rounds` rounds
    ///
    /// # Panics
    /// Panics if `total_rounds` is zero. Configuration validation rejects
    /// that case before a clock is ever built.
    pub fn new(total_rounds: usize) -> Self {
        assert!(total_rounds > 0, "total_rounds must be positive");
        Self {
            current_round: 0,
            total_rounds,
        }
    }

    /// Record one completed round
    pub fn advance(&mut self) {
        self.current_round += 1;
    }

    /// Number of rounds completed so far
    pub fn current_round(&self) -> usize {
        self.current_round
    }

    /// Number of rounds the run is configured for
    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    /// Rounds left before the run halts
    ///
    /// # Example
    /// ```
    /// use worry_simulator_core_rs::RoundClock;
    ///
    /// let mut clock = RoundClock::new(3);
    /// for _ in 0..3 {
    ///     clock.advance();
    /// }
    /// assert_eq!(clock.remaining(), 0);
    /// assert!(clock.is_complete());
    /// ```
    pub fn remaining(&self) -> usize {
        self.total_rounds.saturating_sub(self.current_round)
    }

    /// True once every configured round has run
    pub fn is_complete(&self) -> bool {
        self.current_round >= self.total_rounds
    }

    /// True when the next round to run is the last one
    pub fn is_final_round(&self) -> bool {
        self.current_round + 1 == self.total_rounds
    }
}
