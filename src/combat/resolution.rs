//! Per-tick combat resolution
//!
//! Resolution order:
//! 1. Bullets against mobs
//! 2. Melee arcs against mobs
//! 3. Hostile mob contact against the player
//!
//! Damage is folded sequentially over one working copy of the touched chunks:
//! a mob killed by an earlier pair is skipped by every later pair. Player state
//! is never mutated here; damage comes back in the result.

use ahash::AHashMap;
use rand::Rng;
use std::collections::BTreeMap;

use crate::catalog::ContentCatalog;
use crate::combat::events::{CombatEvent, CombatEventLog, LootDrop};
use crate::combat::projectile::{MeleeSwingArc, Projectile};
use crate::core::config::CoreConfig;
use crate::core::types::{ChunkCoord, EntityId, SimTime, Vec2};
use crate::items::{Item, LootTable};
use crate::world::Chunk;

/// Last contact hit per mob, so touching mobs attack on a cadence
#[derive(Debug, Clone, Default)]
pub struct AttackCooldowns {
    last_hit: AHashMap<EntityId, SimTime>,
}

impl AttackCooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&self, mob: EntityId, now: SimTime, interval: f64) -> bool {
        self.last_hit.get(&mob).map_or(true, |&last| now - last >= interval)
    }

    pub fn record(&mut self, mob: EntityId, now: SimTime) {
        self.last_hit.insert(mob, now);
    }

    pub fn forget(&mut self, mob: EntityId) {
        self.last_hit.remove(&mob);
    }

    pub fn len(&self) -> usize {
        self.last_hit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_hit.is_empty()
    }
}

/// Everything one combat tick reads
#[derive(Debug, Clone, Copy)]
pub struct CombatInput<'a> {
    pub bullets: &'a [Projectile],
    pub chunks: &'a BTreeMap<ChunkCoord, Chunk>,
    pub player_pos: Vec2,
    pub player_health: f32,
    pub melee_arcs: &'a [MeleeSwingArc],
    pub now: SimTime,
}

#[derive(Debug, Clone, Default)]
pub struct CombatTickResult {
    pub events: CombatEventLog,
    /// Copies of every chunk whose entities changed this tick
    pub updated_chunks: BTreeMap<ChunkCoord, Chunk>,
    pub surviving_bullets: Vec<Projectile>,
    pub player_damage: f32,
    pub spawned_loot: Vec<LootDrop>,
}

#[derive(Debug, Clone)]
pub struct PickupResult {
    pub picked_up: Vec<Item>,
    pub remaining: Vec<LootDrop>,
}

/// Snapshot of a live mob taken at the start of the tick
#[derive(Debug, Clone)]
struct LiveMob {
    coord: ChunkCoord,
    id: EntityId,
    definition_id: String,
    position: Vec2,
    health: f32,
    hostile: bool,
}

pub struct CombatSystem<'a> {
    catalog: &'a ContentCatalog,
    config: &'a CoreConfig,
}

impl<'a> CombatSystem<'a> {
    pub fn new(catalog: &'a ContentCatalog, config: &'a CoreConfig) -> Self {
        Self { catalog, config }
    }

    pub fn tick<R: Rng + ?Sized>(
        &self,
        input: CombatInput<'_>,
        cooldowns: &mut AttackCooldowns,
        rng: &mut R,
    ) -> CombatTickResult {
        let combat = &self.config.combat;
        let mut result = CombatTickResult::default();

        let mut mobs: Vec<LiveMob> = input
            .chunks
            .iter()
            .flat_map(|(coord, chunk)| {
                chunk.entities.iter().filter(|e| e.is_alive_mob()).map(|e| LiveMob {
                    coord: *coord,
                    id: e.id,
                    definition_id: e.definition_id.clone(),
                    position: e.position,
                    health: e.health.unwrap_or(0.0),
                    hostile: e.hostile,
                })
            })
            .collect();

        // 1. Bullets: each bullet stops at the first mob it hits
        for bullet in input.bullets {
            let target = mobs.iter().position(|mob| {
                mob.health > 0.0 && bullet.position.distance(&mob.position) < combat.hit_radius
            });
            match target {
                Some(idx) => self.damage_mob(
                    &mut mobs[idx],
                    combat.bullet_damage,
                    input.chunks,
                    &mut result,
                    rng,
                ),
                None => result.surviving_bullets.push(bullet.clone()),
            }
        }

        // 2. Melee arcs
        for arc in input.melee_arcs.iter().filter(|a| a.is_active(input.now, combat)) {
            for mob in mobs.iter_mut() {
                if mob.health <= 0.0 {
                    continue;
                }
                if arc.origin.distance(&mob.position) > arc.range
                    || !arc.covers_angle(mob.position, combat)
                {
                    continue;
                }
                self.damage_mob(mob, combat.melee_damage, input.chunks, &mut result, rng);
            }
        }

        // 3. Contact damage
        if input.player_health > 0.0 {
            for mob in mobs.iter().filter(|m| m.health > 0.0 && m.hostile) {
                if input.player_pos.distance(&mob.position) >= combat.contact_radius {
                    continue;
                }
                if !cooldowns.ready(mob.id, input.now, combat.contact_attack_interval) {
                    continue;
                }
                let damage = self
                    .catalog
                    .mob(&mob.definition_id)
                    .map_or(combat.default_contact_damage, |def| def.base_damage);
                cooldowns.record(mob.id, input.now);
                result.player_damage += damage;
                result.events.push(CombatEvent::PlayerDamage { entity_id: mob.id, damage });
            }
        }

        for mob in mobs.iter().filter(|m| m.health <= 0.0) {
            cooldowns.forget(mob.id);
        }

        result
    }

    fn damage_mob<R: Rng + ?Sized>(
        &self,
        mob: &mut LiveMob,
        damage: f32,
        source: &BTreeMap<ChunkCoord, Chunk>,
        result: &mut CombatTickResult,
        rng: &mut R,
    ) {
        mob.health = (mob.health - damage).max(0.0);
        result.events.push(CombatEvent::Hit {
            entity_id: mob.id,
            damage,
            position: mob.position,
        });

        let Some(chunk) = working_chunk(&mut result.updated_chunks, source, mob.coord) else {
            return;
        };

        if mob.health > 0.0 {
            if let Some(entity) = chunk.entity_mut(mob.id) {
                entity.health = Some(mob.health);
            }
            return;
        }

        chunk.remove_entity(mob.id);
        result.events.push(CombatEvent::Kill { entity_id: mob.id });
        tracing::debug!(mob = %mob.definition_id, chunk = %mob.coord, "Mob killed");

        let Some(def) = self.catalog.mob(&mob.definition_id) else {
            tracing::warn!(mob = %mob.definition_id, "Unknown mob definition, no loot");
            return;
        };
        let loot = LootTable::new(self.catalog, &self.config.loot).generate_loot(
            def,
            self.config.loot.magic_find,
            rng,
        );
        if loot.is_empty() {
            return;
        }
        let drop = LootDrop::new(mob.position, loot);
        result.events.push(CombatEvent::LootSpawn {
            drop_id: drop.id,
            position: drop.position,
            item_count: drop.items.len(),
        });
        result.spawned_loot.push(drop);
    }
}

/// The tick's copy of a chunk, cloned from the source on first touch
fn working_chunk<'m>(
    updated: &'m mut BTreeMap<ChunkCoord, Chunk>,
    source: &BTreeMap<ChunkCoord, Chunk>,
    coord: ChunkCoord,
) -> Option<&'m mut Chunk> {
    if !updated.contains_key(&coord) {
        let chunk = source.get(&coord)?.clone();
        updated.insert(coord, chunk);
    }
    updated.get_mut(&coord)
}

/// Split ground loot into what the player picks up and what stays
///
/// Distance only; inventory capacity is the caller's concern.
pub fn check_loot_pickup(player_pos: Vec2, drops: Vec<LootDrop>, radius: f32) -> PickupResult {
    let (near, far): (Vec<LootDrop>, Vec<LootDrop>) = drops
        .into_iter()
        .partition(|drop| player_pos.distance(&drop.position) < radius);
    PickupResult {
        picked_up: near.into_iter().flat_map(|drop| drop.items).collect(),
        remaining: far,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Biome, Genre, Rank, Rarity, ScanLevel};
    use crate::world::WorldEntity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn single_chunk(entities: Vec<WorldEntity>) -> BTreeMap<ChunkCoord, Chunk> {
        let coord = ChunkCoord::new(0, 0);
        let mut chunks = BTreeMap::new();
        chunks.insert(
            coord,
            Chunk {
                id: Chunk::chunk_id(coord),
                coord,
                biome: Biome::Ruins,
                genre: Genre::Fantasy,
                rank: Rank::F,
                rarity: Rarity::Common,
                entities,
                scan_level: ScanLevel::Detailed,
                traversable: true,
                is_extraction_point: false,
            },
        );
        chunks
    }

    fn bullet_at(x: f32, y: f32) -> Projectile {
        Projectile {
            id: "p_0".to_string(),
            position: Vec2::new(x, y),
            angle: 0.0,
            speed: 10.0,
            spawn_time: 0.0,
            lifespan: 2.0,
        }
    }

    fn input<'a>(
        bullets: &'a [Projectile],
        chunks: &'a BTreeMap<ChunkCoord, Chunk>,
        arcs: &'a [MeleeSwingArc],
    ) -> CombatInput<'a> {
        CombatInput {
            bullets,
            chunks,
            player_pos: Vec2::new(50.0, 50.0),
            player_health: 100.0,
            melee_arcs: arcs,
            now: 1.0,
        }
    }

    #[test]
    fn test_bullet_hit_boundary() {
        let catalog = ContentCatalog::builtin();
        let config = CoreConfig::default();
        let system = CombatSystem::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let chunks = single_chunk(vec![WorldEntity::mob(
            "goblin_grunt",
            Vec2::new(10.0, 10.0),
            Rank::F,
            Rarity::Common,
            100.0,
        )]);

        let near = [bullet_at(11.0, 10.0)];
        let result = system.tick(input(&near, &chunks, &[]), &mut AttackCooldowns::new(), &mut rng);
        assert_eq!(result.events.hits(), 1);
        assert!(result.surviving_bullets.is_empty());
        let entity = &result.updated_chunks[&ChunkCoord::new(0, 0)].entities[0];
        assert_eq!(entity.health, Some(75.0));

        let far = [bullet_at(12.0, 10.0)];
        let result = system.tick(input(&far, &chunks, &[]), &mut AttackCooldowns::new(), &mut rng);
        assert_eq!(result.events.hits(), 0);
        assert_eq!(result.surviving_bullets.len(), 1);
        assert!(result.updated_chunks.is_empty());
    }

    #[test]
    fn test_kill_removes_mob_once() {
        let catalog = ContentCatalog::builtin();
        let config = CoreConfig::default();
        let system = CombatSystem::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let chunks = single_chunk(vec![WorldEntity::mob(
            "goblin_grunt",
            Vec2::new(10.0, 10.0),
            Rank::F,
            Rarity::Common,
            30.0,
        )]);

        let bullets = [bullet_at(10.0, 10.0), bullet_at(10.5, 10.0), bullet_at(9.5, 10.0)];
        let result = system.tick(
            input(&bullets, &chunks, &[]),
            &mut AttackCooldowns::new(),
            &mut rng,
        );
        assert_eq!(result.events.kills(), 1);
        assert_eq!(result.events.hits(), 2);
        // The third bullet flies on past the corpse
        assert_eq!(result.surviving_bullets.len(), 1);
        assert!(result.updated_chunks[&ChunkCoord::new(0, 0)].entities.is_empty());
    }

    #[test]
    fn test_melee_arc_hits_in_front_only() {
        let catalog = ContentCatalog::builtin();
        let config = CoreConfig::default();
        let system = CombatSystem::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let front = WorldEntity::mob(
            "raider",
            Vec2::new(52.0, 50.0),
            Rank::F,
            Rarity::Common,
            200.0,
        );
        let behind = WorldEntity::mob(
            "raider",
            Vec2::new(48.0, 50.0),
            Rank::F,
            Rarity::Common,
            200.0,
        );
        let chunks = single_chunk(vec![front, behind]);
        let arcs = [MeleeSwingArc::new(Vec2::new(50.0, 50.0), 0.0, 3.0, 0.9)];

        let result = system.tick(input(&[], &chunks, &arcs), &mut AttackCooldowns::new(), &mut rng);
        assert_eq!(result.events.hits(), 1);
        let chunk = &result.updated_chunks[&ChunkCoord::new(0, 0)];
        assert_eq!(chunk.entities[0].health, Some(150.0));
        assert_eq!(chunk.entities[1].health, Some(200.0));

        // Expired arc does nothing
        let stale = [MeleeSwingArc::new(Vec2::new(50.0, 50.0), 0.0, 3.0, 0.5)];
        let result = system.tick(
            input(&[], &chunks, &stale),
            &mut AttackCooldowns::new(),
            &mut rng,
        );
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_contact_damage_respects_cooldown() {
        let catalog = ContentCatalog::builtin();
        let config = CoreConfig::default();
        let system = CombatSystem::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let raider_damage = catalog.mob("raider").map(|m| m.base_damage).expect("raider");
        let chunks = single_chunk(vec![WorldEntity::mob(
            "raider",
            Vec2::new(50.5, 50.0),
            Rank::F,
            Rarity::Common,
            100.0,
        )]);
        let mut cooldowns = AttackCooldowns::new();

        let mut tick_input = input(&[], &chunks, &[]);
        let first = system.tick(tick_input, &mut cooldowns, &mut rng);
        assert_eq!(first.player_damage, raider_damage);

        tick_input.now = 1.5;
        let second = system.tick(tick_input, &mut cooldowns, &mut rng);
        assert_eq!(second.player_damage, 0.0);

        tick_input.now = 2.0;
        let third = system.tick(tick_input, &mut cooldowns, &mut rng);
        assert_eq!(third.player_damage, raider_damage);
    }

    #[test]
    fn test_unknown_definition_uses_default_contact_damage() {
        let catalog = ContentCatalog::builtin();
        let config = CoreConfig::default();
        let system = CombatSystem::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let chunks = single_chunk(vec![WorldEntity::mob(
            "mystery",
            Vec2::new(50.0, 50.5),
            Rank::F,
            Rarity::Common,
            10.0,
        )]);
        let result = system.tick(input(&[], &chunks, &[]), &mut AttackCooldowns::new(), &mut rng);
        assert_eq!(result.player_damage, config.combat.default_contact_damage);
    }

    #[test]
    fn test_pickup_by_distance() {
        let drops = vec![
            LootDrop::new(Vec2::new(1.0, 0.0), Vec::new()),
            LootDrop::new(Vec2::new(5.0, 0.0), Vec::new()),
        ];
        let result = check_loot_pickup(Vec2::ZERO, drops, 2.0);
        assert_eq!(result.remaining.len(), 1);
        assert_eq!(result.remaining[0].position, Vec2::new(5.0, 0.0));
    }
}
