//! Dampened-division controller
//!
//! Divides every transformed value by a constant relief factor and rounds
//! toward negative infinity. Values stay small over short runs, but the
//! division discards divisibility information, so long runs need the
//! modular controller instead.

use super::{WorryController, WorryError};
use num_bigint::BigInt;
use num_integer::Integer;

/// `floor(value / relief)`
///
/// # Example
///
/// ```
/// use worry_simulator_core_rs::worry::{DampenedDivision, WorryController};
/// use num_bigint::BigInt;
///
/// let controller = DampenedDivision::new(3).unwrap();
/// assert_eq!(controller.relieve(BigInt::from(1862)), BigInt::from(620));
/// ```
#[derive(Debug, Clone)]
pub struct DampenedDivision {
    relief: BigInt,
}

impl DampenedDivision {
    /// Create a controller dividing by `relief`
    pub fn new(relief: u64) -> Result<Self, WorryError> {
        if relief == 0 {
            return Err(WorryError::ZeroRelief);
        }
        Ok(Self {
            relief: BigInt::from(relief),
        })
    }

    pub fn relief(&self) -> &BigInt {
        &self.relief
    }
}

impl WorryController for DampenedDivision {
    fn relieve(&self, level: BigInt) -> BigInt {
        level.div_floor(&self.relief)
    }

    fn name(&self) -> &'static str {
        "dampened"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_division() {
        let controller = DampenedDivision::new(3).unwrap();
        assert_eq!(controller.relieve(BigInt::from(1501)), BigInt::from(500));
        assert_eq!(controller.relieve(BigInt::from(2)), BigInt::from(0));
        assert_eq!(controller.relieve(BigInt::from(-1)), BigInt::from(-1));
    }

    #[test]
    fn test_relief_of_one_is_identity() {
        let controller = DampenedDivision::new(1).unwrap();
        assert_eq!(controller.relieve(BigInt::from(12345)), BigInt::from(12345));
    }

    #[test]
    fn test_zero_relief_rejected() {
        assert_eq!(DampenedDivision::new(0).unwrap_err(), WorryError::ZeroRelief);
    }
}
