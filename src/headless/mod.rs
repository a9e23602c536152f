//! Headless arena
//!
//! Runs matches between teams of arena characters without any graphical
//! output, suitable for automated testing and balance runs.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless match
//! cargo run --release -- match_config.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "team1": ["Gunner", "Support"],
//!   "team2": ["Brawler", "Brawler"],
//!   "max_duration_secs": 120,
//!   "random_seed": 42
//! }
//! ```

pub mod archetypes;
pub mod config;
pub mod runner;

pub use archetypes::{ArchetypeDefinition, ArchetypeDefinitions};
pub use config::HeadlessMatchConfig;
pub use runner::{
    build_headless_app, run_headless_match, CombatantResult, HeadlessMatchState, HeadlessPlugin,
    MatchResult, RunOptions,
};
