//! Worry Controller Module
//!
//! After an agent applies its transform to an item, the result is reduced
//! before the divisibility test. The reduction is pluggable and chosen once
//! per run; the two regimes are never mixed.
//!
//! # Controllers
//!
//! 1. **DampenedDivision**: `floor(value / relief)`, for short runs
//! 2. **ModularReduction**: `value mod M` where `M` is the product of every
//!    agent's test divisor, for long runs without relief
//!
//! Reducing modulo `M` leaves `value mod d` unchanged for every divisor `d`
//! of `M`, so routing decisions are exactly those of the unreduced value
//! while magnitudes stay bounded.
//!
//! # Example
//!
//! ```rust
//! use worry_simulator_core_rs::worry::{create_controller, WorryMode};
//! use worry_simulator_core_rs::{AgentSpec, Registry};
//! use num_bigint::BigInt;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::load(vec![
//!     AgentSpec::new(0, "old * 19", 23, 1, 1),
//!     AgentSpec::new(1, "old + 6", 19, 0, 0),
//! ])?;
//!
//! let dampened = create_controller(&WorryMode::Dampened { relief: 3 }, &registry)?;
//! assert_eq!(dampened.relieve(BigInt::from(1501)), BigInt::from(500));
//!
//! let modular = create_controller(&WorryMode::Modular, &registry)?;
//! assert_eq!(modular.relieve(BigInt::from(23 * 19 + 5)), BigInt::from(5));
//! # Ok(())
//! # }
//! ```

use crate::models::Registry;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod dampened;
pub mod modular;

pub use dampened::DampenedDivision;
pub use modular::{common_modulus, ModularReduction};

/// Errors raised while building a worry controller
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorryError {
    #[error("Relief factor must be positive")]
    ZeroRelief,

    #[error("Common modulus must be positive")]
    ZeroModulus,
}

/// Post-transform reduction applied to every inspected item
pub trait WorryController: std::fmt::Debug {
    /// Reduce a freshly transformed worry level
    fn relieve(&self, level: BigInt) -> BigInt;

    /// Short name for logs and reports
    fn name(&self) -> &'static str;
}

/// Worry regime selected for a run
///
/// Serialized internally tagged:
/// `{"mode": "dampened", "relief": 3}` or `{"mode": "modular"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum WorryMode {
    /// Floor-divide by `relief` after every transform
    Dampened { relief: u64 },

    /// Reduce modulo the product of all test divisors
    Modular,
}

impl Default for WorryMode {
    fn default() -> Self {
        WorryMode::Dampened { relief: 3 }
    }
}

impl std::fmt::Display for WorryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorryMode::Dampened { relief } => write!(f, "dampened(relief={})", relief),
            WorryMode::Modular => write!(f, "modular"),
        }
    }
}

/// Build the controller for `mode`
///
/// The modular controller takes its modulus from `registry` once, here; the
/// divisor set never changes during a run.
pub fn create_controller(
    mode: &WorryMode,
    registry: &Registry,
) -> Result<Box<dyn WorryController>, WorryError> {
    match mode {
        WorryMode::Dampened { relief } => Ok(Box::new(DampenedDivision::new(*relief)?)),
        WorryMode::Modular => Ok(Box::new(ModularReduction::for_registry(registry)?)),
    }
}
