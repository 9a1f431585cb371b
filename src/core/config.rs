//! Simulation configuration with documented constants
//!
//! Every tunable number used by world generation, combat, AI and loot lives
//! here. Configs deserialize from TOML with per-field defaults, so a file only
//! needs to name the values it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::combat::constants;
use crate::core::error::{CoreError, Result};

/// World generation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Land threshold base: a cell is land when `distance < land_threshold + noise * land_noise`
    pub land_threshold: f64,
    pub land_noise: f64,
    /// Normalized distance below which chunks are industrial
    pub industrial_radius: f64,
    /// Normalized distance below which chunks are ruins/overgrowth
    pub middle_radius: f64,
    /// Width of a chunk in world units
    pub chunk_world_size: f32,
    /// Entity offset band inside a chunk (min, max)
    pub entity_offset_min: f32,
    pub entity_offset_max: f32,
    /// Mobs per chunk, inclusive range
    pub min_mobs: usize,
    pub max_mobs: usize,
    /// Chance a chunk also carries resource nodes
    pub resource_chance: f64,
    pub min_resources: usize,
    pub max_resources: usize,
    /// One extraction chunk per this many grid cells of size
    pub extraction_cell_ratio: usize,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            land_threshold: 0.8,
            land_noise: 0.3,
            industrial_radius: 0.3,
            middle_radius: 0.6,
            chunk_world_size: 100.0,
            entity_offset_min: 10.0,
            entity_offset_max: 90.0,
            min_mobs: 1,
            max_mobs: 3,
            resource_chance: 0.5,
            min_resources: 1,
            max_resources: 5,
            extraction_cell_ratio: 10,
        }
    }
}

/// Projectile, melee and contact tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Bullet speed in units per second
    pub projectile_speed: f32,
    /// Seconds a pattern's bullets stay alive
    pub projectile_lifespan: f64,
    pub hit_radius: f32,
    pub bullet_damage: f32,
    pub melee_damage: f32,
    /// Seconds a melee swing stays active
    pub melee_window: f64,
    /// Half-width of the melee arc in radians
    pub melee_half_angle: f32,
    pub contact_radius: f32,
    /// Used when a mob definition cannot be resolved
    pub default_contact_damage: f32,
    /// Minimum seconds between two contact hits from the same mob
    pub contact_attack_interval: f64,
    pub pickup_radius: f32,
    /// Damage a mob-fired bullet deals to the player
    pub mob_bullet_damage: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            projectile_speed: constants::PROJECTILE_SPEED,
            projectile_lifespan: constants::PROJECTILE_LIFESPAN,
            hit_radius: constants::HIT_RADIUS,
            bullet_damage: constants::BULLET_DAMAGE,
            melee_damage: constants::MELEE_DAMAGE,
            melee_window: constants::MELEE_WINDOW,
            melee_half_angle: constants::MELEE_HALF_ANGLE,
            contact_radius: constants::CONTACT_RADIUS,
            default_contact_damage: constants::DEFAULT_CONTACT_DAMAGE,
            contact_attack_interval: constants::CONTACT_ATTACK_INTERVAL,
            pickup_radius: constants::PICKUP_RADIUS,
            mob_bullet_damage: constants::MOB_BULLET_DAMAGE,
        }
    }
}

/// Mob decision tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Multiple of sight range beyond which an active mob de-aggros
    pub deaggro_factor: f32,
    /// COWARD mobs flee below this health fraction
    pub coward_flee_threshold: f32,
    /// SURVIVE mobs flee below this health fraction
    pub survive_flee_threshold: f32,
    /// HOARD mobs divert to loot closer than this
    pub hoard_loot_radius: f32,
    pub fantasy_melee_range: f32,
    pub fantasy_block_chance: f64,
    pub scifi_min_range: f32,
    pub scifi_max_range: f32,
    pub postapoc_melee_range: f32,
    pub eldritch_phase_chance: f64,
    /// Seconds between SPAWN emissions of a REPRODUCE mob
    pub spawn_interval: f64,
    /// Cap on mobs per chunk once spawning is involved
    pub max_mobs_per_chunk: usize,
    /// Only chunks within this many world units of the player are evaluated
    pub simulation_radius: f32,
    /// Minimum seconds between two ranged patterns from the same mob
    pub ranged_attack_interval: f64,
    /// Half-width of the player's view cone when judging "looking at"
    pub look_cone_half_angle: f32,
    /// Distance from the player a phasing mob reappears at
    pub phase_distance: f32,
    /// Melee lunges stop this close to the player
    pub melee_stop_distance: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            deaggro_factor: 2.0,
            coward_flee_threshold: 0.3,
            survive_flee_threshold: 0.5,
            hoard_loot_radius: 5.0,
            fantasy_melee_range: 2.0,
            fantasy_block_chance: 0.2,
            scifi_min_range: 4.0,
            scifi_max_range: 12.0,
            postapoc_melee_range: 1.5,
            eldritch_phase_chance: 0.15,
            spawn_interval: 10.0,
            max_mobs_per_chunk: 8,
            simulation_radius: 150.0,
            ranged_attack_interval: 1.5,
            look_cone_half_angle: 0.5,
            phase_distance: 4.0,
            melee_stop_distance: 0.5,
        }
    }
}

/// Drop chances, all multiplied by magic find
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub material_chance: f64,
    pub gear_chance: f64,
    pub elite_gear_chance: f64,
    pub boss_gear_chance: f64,
    /// Not scaled by magic find
    pub tome_chance: f64,
    pub magic_find: f64,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            material_chance: 0.5,
            gear_chance: 0.1,
            elite_gear_chance: 0.5,
            boss_gear_chance: 1.0,
            tome_chance: 0.05,
            magic_find: 1.0,
        }
    }
}

/// Complete configuration for the simulation core
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub world: WorldGenConfig,
    pub combat: CombatConfig,
    pub ai: AiConfig,
    pub loot: LootConfig,
}

impl CoreConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: CoreConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let world = &self.world;
        if world.chunk_world_size <= 0.0 {
            return Err(invalid("world.chunk_world_size must be positive"));
        }
        if world.entity_offset_min >= world.entity_offset_max
            || world.entity_offset_max > world.chunk_world_size
        {
            return Err(invalid(format!(
                "entity offset band ({}, {}) must be non-empty and inside the chunk ({})",
                world.entity_offset_min, world.entity_offset_max, world.chunk_world_size
            )));
        }
        if world.min_mobs > world.max_mobs || world.min_resources > world.max_resources {
            return Err(invalid("entity count ranges must be ordered"));
        }
        if world.extraction_cell_ratio == 0 {
            return Err(invalid("world.extraction_cell_ratio must be at least 1"));
        }

        let combat = &self.combat;
        if combat.projectile_speed <= 0.0 || combat.projectile_lifespan <= 0.0 {
            return Err(invalid("projectile speed and lifespan must be positive"));
        }
        if combat.hit_radius <= 0.0 || combat.contact_radius <= 0.0 || combat.pickup_radius <= 0.0
        {
            return Err(invalid("radii must be positive"));
        }
        if combat.melee_window <= 0.0 || combat.contact_attack_interval < 0.0 {
            return Err(invalid("melee window must be positive, attack interval non-negative"));
        }

        let ai = &self.ai;
        if ai.scifi_min_range >= ai.scifi_max_range {
            return Err(invalid(format!(
                "ai.scifi_min_range ({}) should be < ai.scifi_max_range ({})",
                ai.scifi_min_range, ai.scifi_max_range
            )));
        }

        for (name, chance) in [
            ("ai.fantasy_block_chance", ai.fantasy_block_chance),
            ("ai.eldritch_phase_chance", ai.eldritch_phase_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(format!("{} ({}) must lie in [0, 1]", name, chance)));
            }
        }

        if ai.ranged_attack_interval < 0.0 || ai.spawn_interval < 0.0 {
            return Err(invalid("ai intervals must be non-negative"));
        }

        if self.loot.magic_find < 0.0 {
            return Err(invalid("loot.magic_find must be non-negative"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config = CoreConfig::from_toml_str(
            r#"
            [combat]
            bullet_damage = 40.0

            [world]
            max_mobs = 5
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.combat.bullet_damage, 40.0);
        assert_eq!(config.combat.hit_radius, 1.5);
        assert_eq!(config.world.max_mobs, 5);
        assert_eq!(config.world.min_mobs, 1);
        assert_eq!(config.ai, AiConfig::default());
    }

    #[test]
    fn test_rejects_inverted_scifi_band() {
        let result = CoreConfig::from_toml_str(
            r#"
            [ai]
            scifi_min_range = 20.0
            "#,
        );
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_phase_chance_above_one() {
        let result = CoreConfig::from_toml_str("[ai]\neldritch_phase_chance = 1.5\n");
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_negative_block_chance() {
        let result = CoreConfig::from_toml_str("[ai]\nfantasy_block_chance = -0.1\n");
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));

        let edge = CoreConfig::from_toml_str("[ai]\nfantasy_block_chance = 1.0\n");
        assert!(edge.is_ok());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = CoreConfig::from_toml_str("[combat\nbullet_damage = ");
        assert!(matches!(result, Err(CoreError::TomlError(_))));
    }
}
