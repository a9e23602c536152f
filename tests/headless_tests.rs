//! Integration tests for headless match execution
//!
//! These tests verify that:
//! - Match configs are validated
//! - Headless matches run to completion
//! - Match results are accessible programmatically
//! - Seeded RNG produces deterministic results

use skirmish::headless::{
    run_headless_match, ArchetypeDefinitions, HeadlessMatchConfig, MatchResult, RunOptions,
};

/// Helper to create a basic match config
fn create_config(team1: Vec<&str>, team2: Vec<&str>, seed: Option<u64>) -> HeadlessMatchConfig {
    let mut config = HeadlessMatchConfig::new(
        team1.into_iter().map(String::from).collect(),
        team2.into_iter().map(String::from).collect(),
    );
    config.max_duration_secs = 90.0;
    config.random_seed = seed;
    config
}

fn run(config: HeadlessMatchConfig) -> MatchResult {
    run_headless_match(config, ArchetypeDefinitions::default(), RunOptions::default())
        .expect("match should run to completion")
}

// =============================================================================
// Config Validation
// =============================================================================

#[test]
fn test_config_rejects_empty_team() {
    let config = create_config(vec![], vec!["Gunner"], None);
    let err = config.validate(&ArchetypeDefinitions::default()).unwrap_err();
    assert!(err.contains("team1"));
}

#[test]
fn test_config_rejects_oversized_team() {
    let config = create_config(vec!["Gunner"], vec!["Gunner"; 4], None);
    let err = config.validate(&ArchetypeDefinitions::default()).unwrap_err();
    assert!(err.contains("team2"));
}

#[test]
fn test_config_rejects_unknown_archetype() {
    let config = create_config(vec!["Gunner"], vec!["Wizard"], None);
    let err = config.validate(&ArchetypeDefinitions::default()).unwrap_err();
    assert!(err.contains("Unknown archetype: 'Wizard'"));
    assert!(err.contains("Gunner"));
}

#[test]
fn test_config_rejects_non_positive_duration() {
    let mut config = create_config(vec!["Gunner"], vec!["Brawler"], None);
    config.max_duration_secs = 0.0;
    let err = config.validate(&ArchetypeDefinitions::default()).unwrap_err();
    assert!(err.contains("max_duration_secs"));
}

#[test]
fn test_config_rejects_non_finite_duration() {
    for duration in [f32::NAN, f32::INFINITY] {
        let mut config = create_config(vec!["Gunner"], vec!["Brawler"], None);
        config.max_duration_secs = duration;
        let err = config.validate(&ArchetypeDefinitions::default()).unwrap_err();
        assert!(err.contains("max_duration_secs"), "{} accepted", duration);
    }
}

#[test]
fn test_huge_duration_runs_until_elimination() {
    // The step budget saturates instead of overflowing; the match still ends on a kill
    let mut config = create_config(vec!["Brawler"], vec!["Brawler"], Some(4));
    config.max_duration_secs = 1e20;
    let result = run(config);

    assert!(result.combatants().any(|c| !c.survived));
    assert!(result.match_time < 1000.0);
}

#[test]
fn test_config_parses_json_fields() {
    let config = HeadlessMatchConfig::from_json(
        r#"{
            "team1": ["Gunner", "Support"],
            "team2": ["Brawler"],
            "max_duration_secs": 45,
            "tick_rate": 30,
            "random_seed": 1234,
            "output_path": "out/match.json",
            "beware_search_secs": 4,
            "arena_half_extent": 8
        }"#,
        &ArchetypeDefinitions::default(),
    )
    .expect("config should parse");

    assert_eq!(config.team1, vec!["Gunner", "Support"]);
    assert_eq!(config.max_duration_secs, 45.0);
    assert_eq!(config.tick_rate, 30.0);
    assert_eq!(config.random_seed, Some(1234));
    assert_eq!(config.output_path.as_deref(), Some("out/match.json"));
    assert_eq!(config.beware_search_secs, 4.0);
    assert_eq!(config.arena_half_extent, 8.0);
}

#[test]
fn test_config_from_invalid_json_fails() {
    let err = HeadlessMatchConfig::from_json("{ team1: ", &ArchetypeDefinitions::default())
        .unwrap_err();
    assert!(err.starts_with("Failed to parse JSON"));
}

#[test]
fn test_run_rejects_invalid_config() {
    let config = create_config(vec!["Gunner"], vec!["Wizard"], Some(1));
    let result =
        run_headless_match(config, ArchetypeDefinitions::default(), RunOptions::default());
    assert!(result.is_err());
}

// =============================================================================
// Full Matches
// =============================================================================

#[test]
fn test_seeded_match_runs_to_completion() {
    let result = run(create_config(vec!["Gunner"], vec!["Brawler"], Some(42)));

    assert_eq!(result.random_seed, Some(42));
    assert_eq!(result.team1_combatants.len(), 1);
    assert_eq!(result.team2_combatants.len(), 1);
    assert!(result.match_time > 0.0);
    assert!(result.match_time <= 90.0 + 0.1);

    let dealt: f32 = result.combatants().map(|c| c.damage_dealt).sum();
    let taken: f32 = result.combatants().map(|c| c.damage_taken).sum();
    assert!(dealt > 0.0, "someone should land a hit");
    assert!((dealt - taken).abs() < 1e-3, "damage dealt and taken must balance");
    assert!(result.combatants().all(|c| c.attacks_fired > 0));
}

#[test]
fn test_winner_matches_survivors() {
    let result = run(create_config(
        vec!["Gunner", "Brawler"],
        vec!["Support", "Brawler"],
        Some(7),
    ));

    let team1_alive = result.team1_combatants.iter().any(|c| c.survived);
    let team2_alive = result.team2_combatants.iter().any(|c| c.survived);

    match result.winner {
        Some(1) => assert!(team1_alive && !team2_alive),
        Some(2) => assert!(team2_alive && !team1_alive),
        None => assert!(team1_alive == team2_alive),
        Some(other) => panic!("unexpected winner {}", other),
    }

    for combatant in result.combatants() {
        assert_eq!(combatant.survived, combatant.final_health > 0.0);
        assert!(combatant.final_health <= combatant.max_health);
    }
}

#[test]
fn test_combatants_stay_inside_arena() {
    let mut config = create_config(vec!["Brawler", "Brawler"], vec!["Gunner"], Some(11));
    config.arena_half_extent = 6.0;
    let result = run(config);

    for combatant in result.combatants() {
        let (x, y) = combatant.final_position;
        assert!(x.abs() <= 6.0 + 1e-4 && y.abs() <= 6.0 + 1e-4, "{} left the arena", combatant.id);
    }
}

#[test]
fn test_brawlers_walk_into_melee() {
    let result = run(create_config(vec!["Brawler"], vec!["Brawler"], Some(5)));

    // Brawlers spawn far outside melee range, so both must close in and stop
    for combatant in result.combatants() {
        assert!(combatant.move_ends > 0, "{} never stopped moving", combatant.id);
    }
    let (x1, _) = result.team1_combatants[0].final_position;
    let (x2, _) = result.team2_combatants[0].final_position;
    assert!((x2 - x1).abs() < 4.0);
}

#[test]
fn test_short_timeout_is_a_draw() {
    let mut config = create_config(vec!["Brawler"], vec!["Brawler"], Some(1));
    config.max_duration_secs = 0.5;
    let result = run(config);

    assert_eq!(result.winner, None);
    assert!(result.combatants().all(|c| c.survived));
    assert!(result.match_time >= 0.5);
}

#[test]
fn test_combatant_ids_are_unique_per_slot() {
    let result = run(create_config(vec!["Gunner", "Gunner"], vec!["Support"], Some(3)));

    let ids: Vec<&str> = result.team1_combatants.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["Team 1 Gunner #1", "Team 1 Gunner #2"]);
    assert_eq!(result.team2_combatants[0].id, "Team 2 Support #1");
    assert_eq!(result.team2_combatants[0].archetype, "Support");
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seed_same_result() {
    let first = run(create_config(vec!["Gunner", "Support"], vec!["Brawler"], Some(2024)));
    let second = run(create_config(vec!["Gunner", "Support"], vec!["Brawler"], Some(2024)));

    assert_eq!(first, second);
}

#[test]
fn test_saved_log_goes_to_output_path() {
    let path = std::env::temp_dir().join(format!("skirmish_match_{}.json", std::process::id()));
    let mut config = create_config(vec!["Gunner"], vec!["Gunner"], Some(8));
    config.output_path = Some(path.to_string_lossy().to_string());

    let result = run_headless_match(
        config,
        ArchetypeDefinitions::default(),
        RunOptions {
            verbose: false,
            save_log: true,
        },
    )
    .expect("match should run");

    let written = result.log_path.expect("log path should be reported");
    let contents = std::fs::read_to_string(&written).expect("log should exist");
    let json: serde_json::Value = serde_json::from_str(&contents).expect("log should be JSON");
    assert_eq!(json["metadata"]["random_seed"], 8);
    assert_eq!(json["combatants"].as_array().map(|c| c.len()), Some(2));

    let _ = std::fs::remove_file(&written);
}
