//! Headless match execution
//!
//! Runs arena matches without any graphical output, suitable for automated
//! testing. The app is stepped by hand with a fixed time step, so a seeded
//! match always plays out the same way.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use crate::combat::ai::ArenaAi;
use crate::combat::components::{ArenaBounds, Combatant, GameRng};
use crate::combat::log::{
    CombatLog, CombatLogEventType, CombatantId, CombatantMetadata, MatchMetadata,
};
use crate::combat::{CombatPlugin, CombatSystemPhase};

use super::archetypes::ArchetypeDefinitions;
use super::config::HeadlessMatchConfig;

/// Spawn lines sit this fraction of the way from the centre to the wall
const SPAWN_LINE_FRACTION: f32 = 0.6;

/// Spacing between teammates on a spawn line
const SPAWN_SPACING: f32 = 3.0;

/// Result of a completed headless match
///
/// This struct provides programmatic access to match results for testing and analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The winning team (1 or 2), or None for a draw
    pub winner: Option<u8>,
    /// Total match duration in seconds
    pub match_time: f32,
    /// Combatant statistics from the match
    pub team1_combatants: Vec<CombatantResult>,
    /// Combatant statistics from the match
    pub team2_combatants: Vec<CombatantResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
    /// Where the combat log was written, if it was saved
    pub log_path: Option<String>,
}

impl MatchResult {
    pub fn combatants(&self) -> impl Iterator<Item = &CombatantResult> {
        self.team1_combatants.iter().chain(self.team2_combatants.iter())
    }
}

/// Statistics for a single combatant after the match
#[derive(Debug, Clone, PartialEq)]
pub struct CombatantResult {
    /// Log identifier, e.g. "Team 1 Gunner #1"
    pub id: CombatantId,
    pub archetype: String,
    pub max_health: f32,
    /// Health remaining at match end (0 if dead)
    pub final_health: f32,
    pub survived: bool,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub attacks_fired: u32,
    /// Times auto-movement ended
    pub move_ends: u32,
    pub final_position: (f32, f32),
}

/// Options for a headless run that are not part of the match itself
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Install Bevy's log subscriber so `info!`/`debug!` output shows
    pub verbose: bool,
    /// Write the combat log as JSON when the match ends
    pub save_log: bool,
}

/// Resource to track headless match state
#[derive(Resource)]
pub struct HeadlessMatchState {
    /// Maximum match duration before declaring a draw
    pub max_duration: f32,
    /// Elapsed match time
    pub elapsed_time: f32,
    /// Custom output path for match log
    pub output_path: Option<String>,
    /// Whether to write the combat log at match end
    pub save_log: bool,
    /// Whether the match has completed
    pub match_complete: bool,
    /// Random seed for deterministic simulation (if provided)
    pub random_seed: Option<u64>,
    /// Match result (populated when match completes)
    pub result: Option<MatchResult>,
    /// Set when saving the combat log failed
    pub log_error: Option<String>,
}

/// Team compositions resolved against the archetype definitions
#[derive(Resource)]
struct MatchRoster {
    config: HeadlessMatchConfig,
    archetypes: ArchetypeDefinitions,
}

/// Plugin for headless match execution
pub struct HeadlessPlugin {
    pub config: HeadlessMatchConfig,
    pub archetypes: ArchetypeDefinitions,
    pub save_log: bool,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let step = Duration::from_secs_f32(self.config.step_secs());

        // Initialize GameRng with seed if provided (deterministic mode)
        let game_rng = match self.config.random_seed {
            Some(seed) => {
                info!("Using deterministic RNG with seed: {}", seed);
                GameRng::from_seed(seed)
            }
            None => {
                info!("Using non-deterministic RNG (no seed provided)");
                GameRng::from_entropy()
            }
        };

        app.add_plugins(CombatPlugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(step))
            .insert_resource(game_rng)
            .insert_resource(ArenaBounds {
                half_extent: self.config.arena_half_extent,
            })
            .insert_resource(HeadlessMatchState {
                max_duration: self.config.max_duration_secs,
                elapsed_time: 0.0,
                output_path: self.config.output_path.clone(),
                save_log: self.save_log,
                match_complete: false,
                random_seed: self.config.random_seed,
                result: None,
                log_error: None,
            })
            .insert_resource(MatchRoster {
                config: self.config.clone(),
                archetypes: self.archetypes.clone(),
            })
            .add_systems(Startup, headless_setup_match)
            .add_systems(
                Update,
                (headless_track_time, headless_check_match_end)
                    .chain()
                    .after(CombatSystemPhase::CombatResolution),
            );

        // Virtual time clamps long frames; keep whole steps intact.
        if let Some(mut virtual_time) = app.world_mut().get_resource_mut::<Time<Virtual>>() {
            let max_delta = virtual_time.max_delta().max(step);
            virtual_time.set_max_delta(max_delta);
        }
    }
}

/// Helper to generate a consistent combatant ID for the combat log.
///
/// Format: "Team {team} {archetype} #{n}" with a 1-based slot number
pub fn combatant_id(team: u8, archetype: &str, slot: usize) -> CombatantId {
    format!("Team {} {} #{}", team, archetype, slot + 1)
}

/// Spawn position for a team slot. Team 1 lines up on the left, team 2 on
/// the right, both centred on the horizontal axis.
pub fn spawn_position(team: u8, slot: usize, team_size: usize, half_extent: f32) -> Vec2 {
    let side = if team == 1 { -1.0 } else { 1.0 };
    let offset = slot as f32 - (team_size as f32 - 1.0) / 2.0;
    Vec2::new(
        side * half_extent * SPAWN_LINE_FRACTION,
        offset * SPAWN_SPACING,
    )
}

/// Setup system for headless match
fn headless_setup_match(
    mut commands: Commands,
    roster: Res<MatchRoster>,
    mut combat_log: ResMut<CombatLog>,
) {
    // Clear and initialize combat log
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::MatchEvent,
        "Match started (headless mode)!".to_string(),
    );

    let config = &roster.config;
    for (team, members) in [(1u8, &config.team1), (2u8, &config.team2)] {
        for (slot, name) in members.iter().enumerate() {
            let Some(archetype) = roster.archetypes.get(name) else {
                warn!("Skipping unknown archetype '{}'", name);
                continue;
            };

            let id = combatant_id(team, name, slot);
            let position = spawn_position(team, slot, members.len(), config.arena_half_extent);
            let character = archetype.build_character(ArenaAi::new(config.beware_search_secs));
            let mut combatant = Combatant::new(
                id.clone(),
                team,
                name.clone(),
                archetype.max_health,
                position,
                character,
            );

            combatant.character.setup();
            combatant.character.set_attack_style(archetype.attack_style);
            combatant.character.set_beware_mode(config.beware_search_secs);

            combat_log.register_combatant(id);
            commands.spawn(combatant);
        }
    }

    info!(
        "Headless match setup complete: Team 1 ({} members) vs Team 2 ({} members)",
        config.team1.len(),
        config.team2.len()
    );
}

/// Track elapsed match time (used for timeout detection).
fn headless_track_time(time: Res<Time>, mut headless_state: ResMut<HeadlessMatchState>) {
    if !headless_state.match_complete {
        headless_state.elapsed_time += time.delta_secs();
    }
}

/// Check if the match has ended (one or both teams eliminated, or timeout)
fn headless_check_match_end(
    combatants: Query<&Combatant>,
    mut combat_log: ResMut<CombatLog>,
    mut headless_state: ResMut<HeadlessMatchState>,
) {
    if headless_state.match_complete {
        return;
    }

    // Check team survival
    let team1_alive = combatants.iter().any(|c| c.team == 1 && c.is_alive());
    let team2_alive = combatants.iter().any(|c| c.team == 2 && c.is_alive());

    let winner = if !team1_alive || !team2_alive {
        if !team1_alive && !team2_alive {
            info!("Match ended in a DRAW (both teams eliminated simultaneously)!");
            None
        } else if team1_alive {
            info!("Match ended! Team 1 wins!");
            Some(1)
        } else {
            info!("Match ended! Team 2 wins!");
            Some(2)
        }
    } else if headless_state.elapsed_time >= headless_state.max_duration {
        info!(
            "Match timed out after {:.1}s - declaring DRAW",
            headless_state.elapsed_time
        );
        None
    } else {
        return;
    };

    let message = match winner {
        Some(team) => format!("Match over: Team {} wins", team),
        None => "Match over: draw".to_string(),
    };
    combat_log.log(CombatLogEventType::MatchEvent, message);

    let mut result = build_match_result(&combatants, winner, &headless_state);
    if headless_state.save_log {
        match save_headless_match_log(&combatants, &combat_log, winner, &headless_state) {
            Ok(path) => result.log_path = Some(path),
            Err(e) => {
                warn!("Failed to save combat log: {}", e);
                headless_state.log_error = Some(e);
            }
        }
    }

    headless_state.result = Some(result);
    headless_state.match_complete = true;
}

fn combatant_result(combatant: &Combatant) -> CombatantResult {
    CombatantResult {
        id: combatant.id.clone(),
        archetype: combatant.archetype.clone(),
        max_health: combatant.max_health,
        final_health: combatant.current_health,
        survived: combatant.is_alive(),
        damage_dealt: combatant.damage_dealt,
        damage_taken: combatant.damage_taken,
        attacks_fired: combatant.attacks_fired,
        move_ends: combatant.move_end_count(),
        final_position: (combatant.position.x, combatant.position.y),
    }
}

/// Build the MatchResult from current combatant state
fn build_match_result(
    combatants: &Query<&Combatant>,
    winner: Option<u8>,
    headless_state: &HeadlessMatchState,
) -> MatchResult {
    let mut team1_combatants = Vec::new();
    let mut team2_combatants = Vec::new();

    for combatant in combatants.iter() {
        let result = combatant_result(combatant);
        if combatant.team == 1 {
            team1_combatants.push(result);
        } else {
            team2_combatants.push(result);
        }
    }

    // Query order is not spawn order once archetypes differ
    team1_combatants.sort_by(|a, b| a.id.cmp(&b.id));
    team2_combatants.sort_by(|a, b| a.id.cmp(&b.id));

    MatchResult {
        winner,
        match_time: headless_state.elapsed_time,
        team1_combatants,
        team2_combatants,
        random_seed: headless_state.random_seed,
        log_path: None,
    }
}

/// Save the combat log to a file
fn save_headless_match_log(
    combatants: &Query<&Combatant>,
    combat_log: &CombatLog,
    winner: Option<u8>,
    headless_state: &HeadlessMatchState,
) -> Result<String, String> {
    let mut team1 = Vec::new();
    let mut team2 = Vec::new();

    for combatant in combatants.iter() {
        let metadata = CombatantMetadata {
            id: combatant.id.clone(),
            archetype: combatant.archetype.clone(),
            max_health: combatant.max_health,
            final_health: combatant.current_health,
            damage_dealt: combatant.damage_dealt,
            damage_taken: combatant.damage_taken,
            attacks_fired: combatant.attacks_fired,
            final_position: (combatant.position.x, combatant.position.y),
        };

        if combatant.team == 1 {
            team1.push(metadata);
        } else {
            team2.push(metadata);
        }
    }

    let match_metadata = MatchMetadata {
        winner,
        match_time: headless_state.elapsed_time,
        random_seed: headless_state.random_seed,
        team1,
        team2,
    };

    combat_log.save_to_file(&match_metadata, headless_state.output_path.as_deref())
}

/// Build the headless app without running it.
///
/// Useful for tests that want to step the simulation and inspect the world.
pub fn build_headless_app(
    config: HeadlessMatchConfig,
    archetypes: ArchetypeDefinitions,
    options: RunOptions,
) -> Result<App, String> {
    config.validate(&archetypes)?;

    let mut app = App::new();
    // Minimal plugins - no window, no rendering
    app.add_plugins(MinimalPlugins);
    if options.verbose {
        app.add_plugins(bevy::log::LogPlugin::default());
    }
    app.add_plugins(HeadlessPlugin {
        config,
        archetypes,
        save_log: options.save_log,
    });
    app.finish();
    app.cleanup();

    Ok(app)
}

/// Upper bound on `app.update()` calls for a match
///
/// Leaves room for the zero-length first frame plus float drift in the clock.
/// The float-to-int cast saturates, so huge durations cap at `u64::MAX`.
fn step_limit(config: &HeadlessMatchConfig) -> u64 {
    ((config.max_duration_secs * config.tick_rate).ceil() as u64).saturating_add(10)
}

/// Run a headless match with the given configuration
pub fn run_headless_match(
    config: HeadlessMatchConfig,
    archetypes: ArchetypeDefinitions,
    options: RunOptions,
) -> Result<MatchResult, String> {
    let max_steps = step_limit(&config);
    let mut app = build_headless_app(config, archetypes, options)?;

    for _ in 0..max_steps {
        app.update();

        let mut state = app.world_mut().resource_mut::<HeadlessMatchState>();
        if !state.match_complete {
            continue;
        }
        if let Some(error) = state.log_error.take() {
            return Err(error);
        }
        return state
            .result
            .take()
            .ok_or_else(|| "Match completed without a result".to_string());
    }

    Err(format!("Match did not finish within {} steps", max_steps))
}
