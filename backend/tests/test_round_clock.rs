//! Tests for RoundClock

use worry_simulator_core_rs::RoundClock;

#[test]
fn test_round_clock_new() {
    let clock = RoundClock::new(20);
    assert_eq!(clock.current_round(), 0);
    assert_eq!(clock.total_rounds(), 20);
    assert_eq!(clock.remaining(), 20);
    assert!(!clock.is_complete());
}

#[test]
fn test_advance_round() {
    let mut clock = RoundClock::new(20);

    clock.advance();
    assert_eq!(clock.current_round(), 1);
    assert_eq!(clock.remaining(), 19);

    clock.advance();
    assert_eq!(clock.current_round(), 2);
    assert_eq!(clock.remaining(), 18);
}

#[test]
fn test_completion_boundary() {
    let mut clock = RoundClock::new(10_000);

    for _ in 0..9_999 {
        clock.advance();
    }
    assert!(clock.is_final_round());
    assert!(!clock.is_complete());

    clock.advance();
    assert!(clock.is_complete());
    assert_eq!(clock.remaining(), 0);
}

#[test]
fn test_remaining_never_underflows() {
    let mut clock = RoundClock::new(1);
    clock.advance();
    clock.advance();
    assert_eq!(clock.remaining(), 0);
    assert!(clock.is_complete());
}
