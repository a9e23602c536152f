//! Skirmish - headless arena runner
//!
//! Loads a JSON match config, runs the match to completion and prints a
//! summary.

use std::process::ExitCode;

use skirmish::cli;
use skirmish::headless::{
    run_headless_match, ArchetypeDefinitions, HeadlessMatchConfig, MatchResult, RunOptions,
};

fn main() -> ExitCode {
    let args = cli::parse_args();

    match run(args) {
        Ok(result) => {
            print_summary(&result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: cli::Args) -> Result<MatchResult, String> {
    let archetypes = match &args.archetypes {
        Some(path) => ArchetypeDefinitions::load_from_file(path)?,
        None => ArchetypeDefinitions::default(),
    };
    let mut config = HeadlessMatchConfig::load_from_file(&args.config, &archetypes)?;

    // CLI overrides
    if let Some(output) = args.output {
        config.output_path = Some(output.to_string_lossy().to_string());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }

    println!("Starting headless match simulation...");
    println!("  Team 1: {:?}", config.team1);
    println!("  Team 2: {:?}", config.team2);
    println!("  Max duration: {:.0}s", config.max_duration_secs);
    if let Some(seed) = config.random_seed {
        println!("  Seed: {}", seed);
    }

    run_headless_match(
        config,
        archetypes,
        RunOptions {
            verbose: args.verbose,
            save_log: !args.no_log,
        },
    )
}

fn print_summary(result: &MatchResult) {
    match result.winner {
        Some(team) => println!("Team {} wins after {:.1}s", team, result.match_time),
        None => println!("Draw after {:.1}s", result.match_time),
    }

    for combatant in result.combatants() {
        println!(
            "  {:<20} {:>6.1}/{:<6.1} dealt {:>6.1}  taken {:>6.1}  attacks {:>3}{}",
            combatant.id,
            combatant.final_health,
            combatant.max_health,
            combatant.damage_dealt,
            combatant.damage_taken,
            combatant.attacks_fired,
            if combatant.survived { "" } else { "  (dead)" }
        );
    }

    if let Some(path) = &result.log_path {
        println!("Match complete. Log saved to: {}", path);
    }
}
