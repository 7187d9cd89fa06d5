//! Tests for the worry controllers
//!
//! The modular controller must preserve every agent's divisibility test
//! while bounding values; the dampened controller is plain floor division.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use proptest::prelude::*;
use worry_simulator_core_rs::worry::{
    common_modulus, create_controller, DampenedDivision, ModularReduction, WorryError,
};
use worry_simulator_core_rs::{AgentSpec, Registry, WorryController, WorryMode};

const REFERENCE_DIVISORS: [u64; 4] = [23, 19, 13, 17];

fn reference_registry() -> Registry {
    Registry::load(vec![
        AgentSpec::new(0, "old * 19", 23, 2, 3),
        AgentSpec::new(1, "old + 6", 19, 2, 0),
        AgentSpec::new(2, "old * old", 13, 1, 3),
        AgentSpec::new(3, "old + 3", 17, 0, 1),
    ])
    .unwrap()
}

fn big_from_limbs(limbs: &[u32]) -> BigUint {
    BigUint::new(limbs.to_vec())
}

#[test]
fn test_reference_common_modulus() {
    assert_eq!(
        common_modulus(&reference_registry()),
        BigUint::from(96577u32)
    );
}

#[test]
fn test_common_modulus_does_not_overflow_u64() {
    let primes = [
        4_294_967_291u64,
        4_294_967_279,
        4_294_967_231,
        4_294_967_197,
    ];
    let specs: Vec<AgentSpec> = primes
        .iter()
        .enumerate()
        .map(|(id, divisor)| AgentSpec::new(id, "old", *divisor, 0, 0))
        .collect();
    let registry = Registry::load(specs).unwrap();

    let expected = primes
        .iter()
        .fold(BigUint::from(1u32), |acc, p| acc * *p);
    assert_eq!(common_modulus(&registry), expected);
    assert!(common_modulus(&registry) > BigUint::from(u64::MAX));
}

#[test]
fn test_dampened_reference_values() {
    let controller = DampenedDivision::new(3).unwrap();
    assert_eq!(controller.relieve(BigInt::from(79 * 19)), BigInt::from(500));
    assert_eq!(controller.relieve(BigInt::from(98 * 19)), BigInt::from(620));
    assert_eq!(controller.name(), "dampened");
}

#[test]
fn test_factory_selects_controller() {
    let registry = reference_registry();

    let dampened = create_controller(&WorryMode::Dampened { relief: 3 }, &registry).unwrap();
    assert_eq!(dampened.name(), "dampened");

    let modular = create_controller(&WorryMode::Modular, &registry).unwrap();
    assert_eq!(modular.name(), "modular");
    assert_eq!(modular.relieve(BigInt::from(96577 + 42)), BigInt::from(42));

    assert_eq!(
        create_controller(&WorryMode::Dampened { relief: 0 }, &registry).unwrap_err(),
        WorryError::ZeroRelief
    );
}

#[test]
fn test_modular_output_is_bounded() {
    let controller = ModularReduction::for_registry(&reference_registry()).unwrap();
    let huge = BigInt::from(10).pow(200);
    let reduced = controller.relieve(huge);
    assert!(reduced >= BigInt::from(0));
    assert!(reduced < BigInt::from(96577));
}

#[test]
fn test_modular_controller_needs_positive_modulus() {
    assert_eq!(
        ModularReduction::new(BigUint::from(0u32)).unwrap_err(),
        WorryError::ZeroModulus
    );

    let controller = ModularReduction::new(BigUint::from(96577u32)).unwrap();
    assert_eq!(controller.relieve(BigInt::from(-1)), BigInt::from(96576));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// (v mod M) mod d == v mod d for every reference divisor d
    #[test]
    fn prop_modular_reduction_preserves_divisibility(limbs in prop::collection::vec(any::<u32>(), 2..12)) {
        let value = big_from_limbs(&limbs);
        let controller = ModularReduction::for_registry(&reference_registry()).unwrap();
        let reduced = controller.relieve(BigInt::from(value.clone()));

        for divisor in REFERENCE_DIVISORS {
            let expected = BigInt::from(&value % divisor);
            prop_assert_eq!(reduced.mod_floor(&BigInt::from(divisor)), expected);
        }
    }

    /// Floor division agrees with integer division for non-negative inputs
    #[test]
    fn prop_dampened_matches_integer_division(value in any::<u64>(), relief in 1u64..1000) {
        let controller = DampenedDivision::new(relief).unwrap();
        prop_assert_eq!(
            controller.relieve(BigInt::from(value)),
            BigInt::from(value / relief)
        );
    }
}
