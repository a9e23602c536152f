//! Archetype Configuration
//!
//! Combatant archetypes (stats and attack slots) are data-driven and loaded
//! from RON. The built-in set in `assets/config/archetypes.ron` is embedded at
//! compile time so matches never depend on the working directory.
//!
//! ## Usage
//!
//! ```ignore
//! let archetypes = ArchetypeDefinitions::default();
//! let gunner = archetypes.get("Gunner").unwrap();
//! let character = gunner.build_character(ArenaAi::new(10.0));
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::character::{AttackOrder, AttackStyle, TargetingState};
use crate::combat::ai::ArenaAi;
use crate::combat::components::{ArenaCharacter, AttackQueue};
use crate::status::CharacterStatus;

const BUILTIN_ARCHETYPES: &str = include_str!("../../assets/config/archetypes.ron");

/// Stats and attack slots for one kind of combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeDefinition {
    pub name: String,
    /// Body radius
    pub size: f32,
    pub max_health: f32,
    /// Base move speed in character units
    pub move_speed: f32,
    /// Base seconds between auto-attacks
    pub auto_attack_delay: f32,
    #[serde(default)]
    pub attack_style: AttackStyle,
    pub attack_orders: Vec<AttackOrder>,
}

impl ArchetypeDefinition {
    /// Build an arena character with this archetype's stats and slots.
    ///
    /// The character still needs `setup()` once it is placed.
    pub fn build_character(&self, ai: ArenaAi) -> ArenaCharacter {
        let mut character = ArenaCharacter::new(
            CharacterStatus::new(self.move_speed, self.auto_attack_delay),
            AttackQueue::default(),
        )
        .with_targeting(TargetingState::new())
        .with_ai(ai)
        .with_attack_orders(self.attack_orders.iter().cloned())
        .with_size(self.size);
        character.set_attack_style(self.attack_style);
        character
    }
}

/// Top-level structure of an archetypes file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypesConfig {
    pub archetypes: Vec<ArchetypeDefinition>,
}

/// All known archetypes, looked up by name.
#[derive(Debug, Clone)]
pub struct ArchetypeDefinitions {
    definitions: Vec<ArchetypeDefinition>,
}

impl Default for ArchetypeDefinitions {
    /// The embedded built-in archetypes.
    fn default() -> Self {
        match Self::from_ron(BUILTIN_ARCHETYPES) {
            Ok(definitions) => definitions,
            Err(e) => panic!("Built-in archetypes are invalid: {}", e),
        }
    }
}

impl ArchetypeDefinitions {
    pub fn new(config: ArchetypesConfig) -> Result<Self, String> {
        let definitions = Self {
            definitions: config.archetypes,
        };
        definitions.validate()?;
        Ok(definitions)
    }

    pub fn from_ron(contents: &str) -> Result<Self, String> {
        let config: ArchetypesConfig =
            ron::from_str(contents).map_err(|e| format!("Failed to parse archetypes: {}", e))?;
        Self::new(config)
    }

    /// Load an archetype override file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_ron(&contents).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn get(&self, name: &str) -> Option<&ArchetypeDefinition> {
        self.definitions.iter().find(|def| def.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|def| def.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn validate(&self) -> Result<(), String> {
        if self.definitions.is_empty() {
            return Err("no archetypes defined".to_string());
        }

        for (i, def) in self.definitions.iter().enumerate() {
            if self.definitions[..i].iter().any(|other| other.name == def.name) {
                return Err(format!("duplicate archetype '{}'", def.name));
            }
            if def.attack_orders.is_empty() {
                return Err(format!("archetype '{}' has no attack orders", def.name));
            }
            if def.max_health <= 0.0 {
                return Err(format!("archetype '{}' must have positive max_health", def.name));
            }
            if def.size < 0.0 {
                return Err(format!("archetype '{}' has a negative size", def.name));
            }
        }

        Ok(())
    }
}
