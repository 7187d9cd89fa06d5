//! Ranking step
//!
//! Reduces final inspection counts to the product of the top-k counts.
//! Agents that never inspected anything are not eligible; ties are broken by
//! ascending agent id so the ordering is reproducible.

use crate::models::{AgentId, Registry};
use num_bigint::BigUint;
use num_traits::One;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by the ranking step
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RankingError {
    #[error("Ranking needs at least one agent (k must be positive)")]
    ZeroK,

    #[error("Cannot rank top {requested} agents: only {available} have non-zero inspection counts")]
    InsufficientAgents { requested: usize, available: usize },
}

/// Eligible agents ordered by count descending, then id ascending
///
/// # Example
///
/// ```rust
/// use worry_simulator_core_rs::ranking::rank_agents;
/// use std::collections::BTreeMap;
///
/// let counts = BTreeMap::from([(0, 5), (1, 0), (2, 9), (3, 5)]);
/// assert_eq!(rank_agents(&counts), vec![(2, 9), (0, 5), (3, 5)]);
/// ```
pub fn rank_agents(counts: &BTreeMap<AgentId, u64>) -> Vec<(AgentId, u64)> {
    let mut ranked: Vec<(AgentId, u64)> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(id, count)| (*id, *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

/// Product of the `k` highest inspection counts
///
/// # Errors
///
/// - `ZeroK` if `k == 0`
/// - `InsufficientAgents` if fewer than `k` agents have non-zero counts
///
/// # Example
///
/// ```rust
/// use worry_simulator_core_rs::ranking::top_k_product_of_counts;
/// use num_bigint::BigUint;
/// use std::collections::BTreeMap;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let counts = BTreeMap::from([(0, 101), (1, 95), (2, 7), (3, 105)]);
/// assert_eq!(top_k_product_of_counts(&counts, 2)?, BigUint::from(10605u32));
/// # Ok(())
/// # }
/// ```
pub fn top_k_product_of_counts(
    counts: &BTreeMap<AgentId, u64>,
    k: usize,
) -> Result<BigUint, RankingError> {
    if k == 0 {
        return Err(RankingError::ZeroK);
    }

    let ranked = rank_agents(counts);
    if ranked.len() < k {
        return Err(RankingError::InsufficientAgents {
            requested: k,
            available: ranked.len(),
        });
    }

    Ok(ranked
        .iter()
        .take(k)
        .fold(BigUint::one(), |acc, (_, count)| acc * *count))
}

/// Product of the `k` highest inspection counts in `registry`
pub fn top_k_product(registry: &Registry, k: usize) -> Result<BigUint, RankingError> {
    top_k_product_of_counts(&registry.inspection_counts(), k)
}
