//! End-to-end runs of the four-agent reference scenario
//!
//! Checks final products for both regimes and intermediate inspection
//! counts for the long modular run.

use std::collections::BTreeMap;
use worry_simulator_core_rs::orchestrator::{Orchestrator, OrchestratorConfig};
use worry_simulator_core_rs::{AgentSpec, WorryMode};

fn reference_specs() -> Vec<AgentSpec> {
    vec![
        AgentSpec::new(0, "old * 19", 23, 2, 3).with_items([79u32, 98]),
        AgentSpec::new(1, "old + 6", 19, 2, 0).with_items([54u32, 65, 75, 74]),
        AgentSpec::new(2, "old * old", 13, 1, 3).with_items([79u32, 60, 97]),
        AgentSpec::new(3, "old + 3", 17, 0, 1).with_items([74u32]),
    ]
}

fn counts(values: [u64; 4]) -> BTreeMap<usize, u64> {
    values.into_iter().enumerate().collect()
}

#[test]
fn test_dampened_twenty_rounds() {
    let mut orchestrator =
        Orchestrator::new(OrchestratorConfig::dampened(20, 3), reference_specs()).unwrap();
    orchestrator.run().unwrap();

    assert_eq!(orchestrator.inspection_counts(), counts([101, 95, 7, 105]));
    assert_eq!(orchestrator.most_active(), vec![(3, 105), (0, 101)]);
    assert_eq!(orchestrator.monkey_business().unwrap().to_string(), "10605");
}

#[test]
fn test_modular_ten_thousand_rounds() {
    let mut orchestrator =
        Orchestrator::new(OrchestratorConfig::modular(10_000), reference_specs()).unwrap();
    assert_eq!(orchestrator.controller_name(), "modular");

    let checkpoints = [
        (1, [2, 4, 3, 6]),
        (20, [99, 97, 8, 103]),
        (1000, [5204, 4792, 199, 5192]),
    ];
    for (round, expected) in checkpoints {
        while orchestrator.current_round() < round {
            orchestrator.round().unwrap();
        }
        assert_eq!(
            orchestrator.inspection_counts(),
            counts(expected),
            "counts after round {}",
            round
        );
    }

    orchestrator.run().unwrap();
    assert_eq!(
        orchestrator.inspection_counts(),
        counts([52166, 47830, 1938, 52013])
    );
    assert_eq!(
        orchestrator.monkey_business().unwrap().to_string(),
        "2713310158"
    );
}

#[test]
fn test_modular_levels_stay_below_modulus() {
    let mut orchestrator =
        Orchestrator::new(OrchestratorConfig::modular(500), reference_specs()).unwrap();
    orchestrator.run().unwrap();

    let bound = num_bigint::BigUint::from(23u32 * 19 * 13 * 17);
    for agent in orchestrator.registry().agents() {
        assert!(agent.items().iter().all(|item| *item < bound));
    }
}

#[test]
fn test_report_serializes_levels_as_strings() {
    let mut orchestrator =
        Orchestrator::new(OrchestratorConfig::dampened(1, 3), reference_specs()).unwrap();
    orchestrator.run().unwrap();

    let json = serde_json::to_value(orchestrator.report()).unwrap();
    assert_eq!(json["rounds_completed"], 1);
    assert_eq!(json["worry_mode"]["mode"], "dampened");
    assert_eq!(json["worry_mode"]["relief"], 3);
    assert_eq!(json["agents"][1]["items"][0], "2080");
    assert_eq!(json["agents"][3]["inspection_count"], 5);
    assert_eq!(orchestrator.report().worry_mode, WorryMode::Dampened { relief: 3 });
}
