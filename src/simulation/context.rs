//! Building the per-mob combat snapshot

use serde::{Deserialize, Serialize};

use crate::ai::CombatContext;
use crate::catalog::MobDefinition;
use crate::core::config::AiConfig;
use crate::core::types::{angle_delta, Vec2};
use crate::world::WorldEntity;

/// What the host tells the core about the player each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// 0..100
    pub noise_level: f32,
    /// Facing angle in radians
    pub facing: f32,
    /// Ambient light 0 (dark) .. 1 (bright)
    pub ambient_light: f32,
}

impl PlayerSnapshot {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            health: 100.0,
            max_health: 100.0,
            noise_level: 0.0,
            facing: 0.0,
            ambient_light: 1.0,
        }
    }

    pub fn hp_percent(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn is_looking_at(&self, point: Vec2, half_angle: f32) -> bool {
        angle_delta(self.position.angle_to(&point), self.facing) <= half_angle
    }
}

/// Nearby state the snapshot needs beyond the mob and player
#[derive(Debug, Clone, Copy)]
pub struct Surroundings {
    pub home: Vec2,
    pub territory_radius: f32,
    pub nearby_allies: usize,
    pub nearest_loot: Option<Vec2>,
}

pub fn build_context(
    mob: &WorldEntity,
    def: &MobDefinition,
    player: &PlayerSnapshot,
    surroundings: &Surroundings,
    config: &AiConfig,
) -> CombatContext {
    let health = mob.health.unwrap_or(0.0);
    let mob_hp_percent = if def.base_health > 0.0 {
        (health / def.base_health).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let nearest_corpse_dist = surroundings.nearest_loot.map(|pos| mob.position.distance(&pos));

    CombatContext {
        mob_pos: mob.position,
        mob_hp_percent,
        player_pos: player.position,
        player_hp_percent: player.hp_percent(),
        player_noise_level: player.noise_level,
        player_is_looking_at_mob: player.is_looking_at(mob.position, config.look_cone_half_angle),
        light_level_at_mob: player.ambient_light,
        nearby_allies_count: surroundings.nearby_allies,
        distance_to_player: mob.position.distance(&player.position),
        is_in_territory: mob.position.distance(&surroundings.home) <= surroundings.territory_radius,
        nearest_corpse_dist,
        nearest_corpse_pos: surroundings.nearest_loot,
        home_pos: Some(surroundings.home),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentCatalog;
    use crate::core::types::{Rank, Rarity};

    #[test]
    fn test_context_fields() {
        let catalog = ContentCatalog::builtin();
        let def = catalog.mob("raider").expect("raider");
        let mob = WorldEntity::mob(
            &def.id,
            Vec2::new(10.0, 0.0),
            Rank::F,
            Rarity::Common,
            def.base_health / 2.0,
        );
        let player = PlayerSnapshot::at(Vec2::ZERO);
        let surroundings = Surroundings {
            home: Vec2::new(10.0, 0.0),
            territory_radius: 50.0,
            nearby_allies: 2,
            nearest_loot: Some(Vec2::new(13.0, 4.0)),
        };
        let ctx = build_context(&mob, def, &player, &surroundings, &AiConfig::default());
        assert!((ctx.mob_hp_percent - 0.5).abs() < 1e-6);
        assert!((ctx.distance_to_player - 10.0).abs() < 1e-6);
        assert!(ctx.player_is_looking_at_mob);
        assert!(ctx.is_in_territory);
        assert_eq!(ctx.nearest_corpse_dist, Some(5.0));
        assert_eq!(ctx.nearby_allies_count, 2);
    }

    #[test]
    fn test_looking_cone() {
        let mut player = PlayerSnapshot::at(Vec2::ZERO);
        player.facing = std::f32::consts::PI;
        assert!(!player.is_looking_at(Vec2::new(5.0, 0.0), 0.5));
        assert!(player.is_looking_at(Vec2::new(-5.0, 0.5), 0.5));
    }
}
