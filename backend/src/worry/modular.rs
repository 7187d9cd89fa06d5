//! Modular-reduction controller
//!
//! Keeps worry levels below the common modulus `M` (product of every test
//! divisor). For any divisor `d` of `M`, `(v mod M) mod d == v mod d`, so
//! every agent's test sees the same outcome it would on the unreduced value.

use super::{WorryController, WorryError};
use crate::models::Registry;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Product of every agent's test divisor
pub fn common_modulus(registry: &Registry) -> BigUint {
    registry
        .divisors()
        .fold(BigUint::one(), |acc, divisor| acc * divisor)
}

/// `value mod M`, always non-negative
#[derive(Debug, Clone)]
pub struct ModularReduction {
    modulus: BigInt,
}

impl ModularReduction {
    /// Create a controller for an explicit modulus
    pub fn new(modulus: BigUint) -> Result<Self, WorryError> {
        if modulus.is_zero() {
            return Err(WorryError::ZeroModulus);
        }
        Ok(Self {
            modulus: BigInt::from(modulus),
        })
    }

    /// Create a controller whose modulus is the registry's common modulus
    pub fn for_registry(registry: &Registry) -> Result<Self, WorryError> {
        let modulus = common_modulus(registry);
        tracing::debug!(%modulus, "computed common modulus");
        Self::new(modulus)
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }
}

impl WorryController for ModularReduction {
    fn relieve(&self, level: BigInt) -> BigInt {
        level.mod_floor(&self.modulus)
    }

    fn name(&self) -> &'static str {
        "modular"
    }
}
