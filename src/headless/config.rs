//! JSON configuration parsing for headless mode
//!
//! Parses JSON match configurations and checks them against the known
//! archetypes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::archetypes::ArchetypeDefinitions;

/// Headless match configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessMatchConfig {
    /// Team 1 composition (1-3 archetype names)
    pub team1: Vec<String>,
    /// Team 2 composition (1-3 archetype names)
    pub team2: Vec<String>,
    /// Maximum match duration in seconds (default: 120)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Simulation steps per second (default: 60)
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f32,
    /// Random seed for deterministic match reproduction
    /// If provided, the match will use a seeded RNG for reproducible results
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for match log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// How long an idle combatant searches for enemies (default: 10)
    #[serde(default = "default_beware_search")]
    pub beware_search_secs: f32,
    /// Half width of the square arena; combatants cannot leave it (default: 12)
    #[serde(default = "default_arena_half_extent")]
    pub arena_half_extent: f32,
}

fn default_max_duration() -> f32 {
    120.0
}

fn default_tick_rate() -> f32 {
    60.0
}

fn default_beware_search() -> f32 {
    10.0
}

fn default_arena_half_extent() -> f32 {
    12.0
}

impl HeadlessMatchConfig {
    /// A config with default settings for the given teams
    pub fn new(team1: Vec<String>, team2: Vec<String>) -> Self {
        Self {
            team1,
            team2,
            max_duration_secs: default_max_duration(),
            tick_rate: default_tick_rate(),
            random_seed: None,
            output_path: None,
            beware_search_secs: default_beware_search(),
            arena_half_extent: default_arena_half_extent(),
        }
    }

    /// Load configuration from a JSON file and validate it against `archetypes`
    pub fn load_from_file(path: &Path, archetypes: &ArchetypeDefinitions) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_json(&contents, archetypes)
    }

    pub fn from_json(contents: &str, archetypes: &ArchetypeDefinitions) -> Result<Self, String> {
        let config: HeadlessMatchConfig =
            serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate(archetypes)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self, archetypes: &ArchetypeDefinitions) -> Result<(), String> {
        // Validate team sizes
        if self.team1.is_empty() || self.team1.len() > 3 {
            return Err("team1 must have 1-3 members".to_string());
        }
        if self.team2.is_empty() || self.team2.len() > 3 {
            return Err("team2 must have 1-3 members".to_string());
        }

        // Validate archetype names
        for name in self.team1.iter().chain(self.team2.iter()) {
            if archetypes.get(name).is_none() {
                let valid: Vec<&str> = archetypes.names().collect();
                return Err(format!(
                    "Unknown archetype: '{}'. Valid archetypes: {}",
                    name,
                    valid.join(", ")
                ));
            }
        }

        if !self.max_duration_secs.is_finite() || self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive and finite".to_string());
        }
        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 {
            return Err("tick_rate must be positive and finite".to_string());
        }
        if self.beware_search_secs < 0.0 {
            return Err("beware_search_secs must not be negative".to_string());
        }
        if self.arena_half_extent <= 0.0 {
            return Err("arena_half_extent must be positive".to_string());
        }

        Ok(())
    }

    /// Seconds per simulation step
    pub fn step_secs(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_in() {
        let config = HeadlessMatchConfig::from_json(
            r#"{"team1": ["Gunner"], "team2": ["Brawler"]}"#,
            &ArchetypeDefinitions::default(),
        )
        .unwrap();
        assert_eq!(config.max_duration_secs, 120.0);
        assert_eq!(config.tick_rate, 60.0);
        assert_eq!(config.beware_search_secs, 10.0);
        assert_eq!(config.arena_half_extent, 12.0);
        assert!(config.random_seed.is_none());
        assert!(config.output_path.is_none());
    }

    #[test]
    fn test_step_secs() {
        let mut config = HeadlessMatchConfig::new(vec!["Gunner".into()], vec!["Gunner".into()]);
        config.tick_rate = 20.0;
        assert!((config.step_secs() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_tick_rate() {
        let mut config = HeadlessMatchConfig::new(vec!["Gunner".into()], vec!["Gunner".into()]);
        config.tick_rate = 0.0;
        let err = config.validate(&ArchetypeDefinitions::default()).unwrap_err();
        assert!(err.contains("tick_rate"));
    }

    #[test]
    fn test_rejects_non_finite_tick_rate() {
        let mut config = HeadlessMatchConfig::new(vec!["Gunner".into()], vec!["Gunner".into()]);
        for rate in [f32::NAN, f32::INFINITY] {
            config.tick_rate = rate;
            let err = config.validate(&ArchetypeDefinitions::default()).unwrap_err();
            assert!(err.contains("tick_rate"));
        }
    }
}
