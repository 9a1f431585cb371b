//! One play session: the authoritative tick over a generated map
//!
//! Per tick:
//! 1. Activation and action selection for every live mob near the player
//! 2. Primitives applied to positions, patterns and spawns
//! 3. Player bullets recomputed from their patterns, stale patterns and arcs dropped
//! 4. Combat resolution against the chunk entities
//! 5. Mob bullets against the player, unless a live swing deflects them
//! 6. Loot pickup

use ahash::AHashMap;
use rand::Rng;
use std::f32::consts::TAU;

use crate::ai::{
    check_activation, decide_action, industrial_action, BehaviorPrimitive, DecisionMetadata,
    MobDecision, MobProfile, MobState,
};
use crate::catalog::{ContentCatalog, MobDefinition};
use crate::combat::{
    check_deflection, check_loot_pickup, get_projectiles_at_time, AttackCooldowns, CombatEvent,
    CombatEventLog, CombatInput, CombatSystem, LootDrop, MeleeSwingArc, PatternKind, Projectile,
    ProjectilePattern,
};
use crate::core::config::{CombatConfig, CoreConfig};
use crate::core::types::{ChunkCoord, EntityId, Rarity, SimTime, Vec2};
use crate::items::Item;
use crate::simulation::context::{build_context, PlayerSnapshot, Surroundings};
use crate::world::{WorldEntity, WorldMap};

/// Per-mob AI memory kept between ticks
#[derive(Debug, Clone, PartialEq)]
pub struct MobBrain {
    pub state: MobState,
    pub sequence_index: u32,
    pub last_spawn_at: Option<SimTime>,
    pub last_shot_at: Option<SimTime>,
    /// Where the mob was first seen; anchors its territory
    pub home: Vec2,
}

impl MobBrain {
    pub fn new(home: Vec2) -> Self {
        Self {
            state: MobState::Dormant,
            sequence_index: 0,
            last_spawn_at: None,
            last_shot_at: None,
            home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOwner {
    Player,
    Mob(EntityId),
}

/// A fired pattern plus which of its bullets already hit something
#[derive(Debug, Clone)]
pub struct ActivePattern {
    pub owner: PatternOwner,
    pub pattern: ProjectilePattern,
    spent: Vec<bool>,
}

impl ActivePattern {
    pub fn new(owner: PatternOwner, pattern: ProjectilePattern) -> Self {
        Self {
            owner,
            spent: vec![false; pattern.kind.bullet_count()],
            pattern,
        }
    }

    fn live_bullets(&self, now: SimTime, config: &CombatConfig) -> Vec<(usize, Projectile)> {
        get_projectiles_at_time(&self.pattern, now, config)
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !self.spent.get(*idx).copied().unwrap_or(true))
            .collect()
    }

    fn mark_spent(&mut self, idx: usize) {
        if let Some(spent) = self.spent.get_mut(idx) {
            *spent = true;
        }
    }

    fn exhausted(&self) -> bool {
        self.spent.iter().all(|&s| s)
    }
}

/// Ranged pattern a mob of this rarity fires
pub fn pattern_for_rarity(rarity: Rarity) -> PatternKind {
    match rarity {
        Rarity::Legendary | Rarity::Artifact => PatternKind::Nova,
        Rarity::Rare | Rarity::Epic => PatternKind::Shotgun,
        Rarity::Scrap | Rarity::Common | Rarity::Uncommon => PatternKind::Single,
    }
}

#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub now: SimTime,
    pub events: CombatEventLog,
    pub decisions: Vec<(EntityId, MobDecision)>,
    pub player_damage: f32,
    pub picked_up: Vec<Item>,
    pub spawned: usize,
}

pub struct Session<'a> {
    catalog: &'a ContentCatalog,
    config: &'a CoreConfig,
    map: WorldMap,
    brains: AHashMap<EntityId, MobBrain>,
    patterns: Vec<ActivePattern>,
    melee_arcs: Vec<MeleeSwingArc>,
    ground_loot: Vec<LootDrop>,
    cooldowns: AttackCooldowns,
    player_pos: Vec2,
    last_tick: Option<SimTime>,
}

impl<'a> Session<'a> {
    pub fn new(
        map: WorldMap,
        catalog: &'a ContentCatalog,
        config: &'a CoreConfig,
        player_start: Vec2,
    ) -> Self {
        tracing::info!(
            seed = %map.seed,
            chunks = map.chunks.len(),
            mobs = map.live_mob_count(),
            "Session started"
        );
        Self {
            catalog,
            config,
            map,
            brains: AHashMap::new(),
            patterns: Vec::new(),
            melee_arcs: Vec::new(),
            ground_loot: Vec::new(),
            cooldowns: AttackCooldowns::new(),
            player_pos: player_start,
            last_tick: None,
        }
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub fn into_map(self) -> WorldMap {
        self.map
    }

    pub fn ground_loot(&self) -> &[LootDrop] {
        &self.ground_loot
    }

    pub fn active_patterns(&self) -> &[ActivePattern] {
        &self.patterns
    }

    pub fn brain(&self, id: EntityId) -> Option<&MobBrain> {
        self.brains.get(&id)
    }

    pub fn player_position(&self) -> Vec2 {
        self.player_pos
    }

    /// Player fires a pattern from their current position
    pub fn fire(&mut self, kind: PatternKind, angle: f32, now: SimTime) {
        let pattern = ProjectilePattern::new(kind, self.player_pos, now, angle);
        self.patterns.push(ActivePattern::new(PatternOwner::Player, pattern));
    }

    /// Player swings a melee arc from their current position
    pub fn swing(&mut self, angle: f32, range: f32, now: SimTime) {
        self.melee_arcs
            .push(MeleeSwingArc::new(self.player_pos, angle, range, now));
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now: SimTime,
        player: &PlayerSnapshot,
        rng: &mut R,
    ) -> TickReport {
        let config = self.config;
        let dt = self.last_tick.map_or(0.0, |last| (now - last).max(0.0)) as f32;
        self.last_tick = Some(now);
        self.player_pos = player.position;

        let mut report = TickReport { now, ..TickReport::default() };

        // 1-2. Decide, then apply
        let decisions = self.decide(now, player, rng);
        for (coord, id, decision) in &decisions {
            self.apply(*coord, *id, decision, now, dt, player, rng, &mut report);
        }
        report.decisions = decisions.into_iter().map(|(_, id, d)| (id, d)).collect();

        // 3. Player bullets
        self.patterns
            .retain(|p| !p.pattern.is_expired(now, &config.combat) && !p.exhausted());
        self.melee_arcs
            .retain(|arc| now - arc.start_time <= config.combat.melee_window);

        let mut owners: Vec<(usize, usize)> = Vec::new();
        let mut bullets: Vec<Projectile> = Vec::new();
        for (pattern_idx, active) in self.patterns.iter().enumerate() {
            if active.owner != PatternOwner::Player {
                continue;
            }
            for (bullet_idx, bullet) in active.live_bullets(now, &config.combat) {
                owners.push((pattern_idx, bullet_idx));
                bullets.push(bullet);
            }
        }

        // 4. Combat
        let system = CombatSystem::new(self.catalog, config);
        let result = system.tick(
            CombatInput {
                bullets: &bullets,
                chunks: &self.map.chunks,
                player_pos: player.position,
                player_health: player.health,
                melee_arcs: &self.melee_arcs,
                now,
            },
            &mut self.cooldowns,
            rng,
        );

        // Surviving bullets keep input order; anything missing hit a mob
        let mut surviving = result.surviving_bullets.iter().peekable();
        for (bullet, &(pattern_idx, bullet_idx)) in bullets.iter().zip(&owners) {
            if surviving.peek() == Some(&bullet) {
                surviving.next();
            } else {
                self.patterns[pattern_idx].mark_spent(bullet_idx);
            }
        }

        for event in result.events.iter() {
            if let CombatEvent::Kill { entity_id } = event {
                self.brains.remove(entity_id);
            }
        }
        self.map.chunks.extend(result.updated_chunks);
        self.ground_loot.extend(result.spawned_loot);
        report.player_damage += result.player_damage;
        report.events.extend(result.events);

        // 5. Mob bullets
        for active in self.patterns.iter_mut() {
            let PatternOwner::Mob(shooter) = active.owner else {
                continue;
            };
            for (bullet_idx, bullet) in active.live_bullets(now, &config.combat) {
                if bullet.position.distance(&player.position) >= config.combat.hit_radius {
                    continue;
                }
                active.mark_spent(bullet_idx);
                let deflected = self
                    .melee_arcs
                    .iter()
                    .any(|arc| check_deflection(&bullet, arc, now, &config.combat));
                if deflected {
                    report.events.push(CombatEvent::Deflect { position: bullet.position });
                } else {
                    let damage = config.combat.mob_bullet_damage;
                    report.player_damage += damage;
                    report.events.push(CombatEvent::PlayerDamage { entity_id: shooter, damage });
                }
            }
        }

        // 6. Pickup
        let drops = std::mem::take(&mut self.ground_loot);
        let pickup = check_loot_pickup(player.position, drops, config.combat.pickup_radius);
        self.ground_loot = pickup.remaining;
        report.picked_up = pickup.picked_up;

        if !report.events.is_empty() {
            tracing::debug!(
                now,
                events = report.events.len(),
                player_damage = report.player_damage,
                "Tick resolved"
            );
        }
        report
    }

    fn decide<R: Rng + ?Sized>(
        &mut self,
        now: SimTime,
        player: &PlayerSnapshot,
        rng: &mut R,
    ) -> Vec<(ChunkCoord, EntityId, MobDecision)> {
        let config = self.config;
        let catalog = self.catalog;
        let chunk_size = config.world.chunk_world_size;
        let mut decisions = Vec::new();

        for (coord, chunk) in &self.map.chunks {
            let center = Vec2::new(
                (coord.x as f32 + 0.5) * chunk_size,
                (coord.y as f32 + 0.5) * chunk_size,
            );
            if center.distance(&player.position) > config.ai.simulation_radius {
                continue;
            }
            let allies = chunk.live_mob_count().saturating_sub(1);

            for mob in chunk.entities.iter().filter(|e| e.is_alive_mob()) {
                let Some(def) = catalog.mob(&mob.definition_id) else {
                    tracing::warn!(mob = %mob.definition_id, "Unknown mob definition, skipped");
                    continue;
                };
                let brain = self
                    .brains
                    .entry(mob.id)
                    .or_insert_with(|| MobBrain::new(mob.position));

                let surroundings = Surroundings {
                    home: brain.home,
                    territory_radius: chunk_size / 2.0,
                    nearby_allies: allies,
                    nearest_loot: nearest_drop(&self.ground_loot, mob.position),
                };
                let ctx = build_context(mob, def, player, &surroundings, &config.ai);

                let activation = check_activation(brain.state, &def.awareness, &ctx, &config.ai);
                if activation.new_state != brain.state {
                    tracing::debug!(
                        mob = %def.id,
                        from = ?brain.state,
                        to = ?activation.new_state,
                        trigger = ?activation.trigger,
                        "Mob state change"
                    );
                }
                brain.state = activation.new_state;

                let decision = match brain.state {
                    MobState::Dormant if def.awareness.is_industrial => industrial_action(
                        def.objective,
                        brain.last_spawn_at.map(|at| now - at),
                        &config.ai,
                    ),
                    MobState::Active | MobState::Fleeing => {
                        let profile = MobProfile {
                            objective: def.objective,
                            temperament: def.temperament,
                            genre: def.genre,
                            rarity: mob.rarity,
                            sequence_index: brain.sequence_index,
                        };
                        let decision = decide_action(&profile, &ctx, &config.ai, rng);
                        brain.sequence_index = brain.sequence_index.wrapping_add(1);
                        brain.state = if decision.action == BehaviorPrimitive::Flee {
                            MobState::Fleeing
                        } else {
                            MobState::Active
                        };
                        decision
                    }
                    MobState::Stalking => {
                        MobDecision::toward(BehaviorPrimitive::Approach, player.position)
                    }
                    MobState::Dormant | MobState::Victorious => {
                        MobDecision::new(BehaviorPrimitive::Idle)
                    }
                };
                decisions.push((*coord, mob.id, decision));
            }
        }
        decisions
    }

    #[allow(clippy::too_many_arguments)]
    fn apply<R: Rng + ?Sized>(
        &mut self,
        coord: ChunkCoord,
        id: EntityId,
        decision: &MobDecision,
        now: SimTime,
        dt: f32,
        player: &PlayerSnapshot,
        rng: &mut R,
        report: &mut TickReport,
    ) {
        let config = self.config;
        let catalog: &'a ContentCatalog = self.catalog;
        let Some((position, rarity, def)) = self
            .map
            .chunk(coord)
            .and_then(|chunk| chunk.entity(id))
            .and_then(|mob| {
                catalog
                    .mob(&mob.definition_id)
                    .map(|def| (mob.position, mob.rarity, def))
            })
        else {
            return;
        };

        let step = def.speed * dt;
        let target = decision.target_pos.unwrap_or(player.position);
        let moved = match decision.action {
            BehaviorPrimitive::Approach => Some(step_toward(position, target, step, 0.0)),
            BehaviorPrimitive::AttackMelee => Some(step_toward(
                position,
                player.position,
                step,
                config.ai.melee_stop_distance,
            )),
            BehaviorPrimitive::Flee => Some(position + (position - target).normalize() * step),
            BehaviorPrimitive::Strafe | BehaviorPrimitive::Flank => {
                Some(strafe(position, player.position, step))
            }
            BehaviorPrimitive::AttackRanged => {
                self.mob_fire(id, position, rarity, player.position, now);
                match decision.metadata {
                    Some(DecisionMetadata::Strafing) => {
                        Some(strafe(position, player.position, step))
                    }
                    _ => None,
                }
            }
            BehaviorPrimitive::Phase => {
                let angle = rng.gen_range(0.0..TAU);
                Some(player.position + Vec2::from_angle(angle) * config.ai.phase_distance)
            }
            BehaviorPrimitive::Spawn => {
                if self.spawn_clone(coord, id, def, rarity, position, now, rng) {
                    report.spawned += 1;
                }
                None
            }
            BehaviorPrimitive::CallAllies => {
                self.alert_chunk(coord);
                None
            }
            BehaviorPrimitive::Idle
            | BehaviorPrimitive::Telegraph
            | BehaviorPrimitive::Block
            | BehaviorPrimitive::Sacrifice => None,
        };

        if let Some(new_pos) = moved {
            self.relocate(coord, id, new_pos);
        }
    }

    /// Moves a mob and re-homes it when it crosses into another land chunk.
    /// Steps that would leave the land grid are dropped.
    fn relocate(&mut self, coord: ChunkCoord, id: EntityId, new_pos: Vec2) {
        let target = self.map.coord_at(new_pos, self.config.world.chunk_world_size);
        if target == coord {
            if let Some(mob) = self.map.chunk_mut(coord).and_then(|c| c.entity_mut(id)) {
                mob.position = new_pos;
            }
            return;
        }
        if self.map.chunk(target).is_none() {
            tracing::trace!(chunk = %coord, %target, "Mob step off land dropped");
            return;
        }
        let Some(mut mob) = self.map.chunk_mut(coord).and_then(|c| c.remove_entity(id)) else {
            return;
        };
        mob.position = new_pos;
        if let Some(chunk) = self.map.chunk_mut(target) {
            chunk.entities.push(mob);
        }
        tracing::debug!(from = %coord, to = %target, "Mob changed chunk");
    }

    fn mob_fire(&mut self, id: EntityId, origin: Vec2, rarity: Rarity, at: Vec2, now: SimTime) {
        let interval = self.config.ai.ranged_attack_interval;
        let Some(brain) = self.brains.get_mut(&id) else {
            return;
        };
        if brain.last_shot_at.map_or(false, |last| now - last < interval) {
            return;
        }
        brain.last_shot_at = Some(now);
        let pattern =
            ProjectilePattern::new(pattern_for_rarity(rarity), origin, now, origin.angle_to(&at));
        self.patterns.push(ActivePattern::new(PatternOwner::Mob(id), pattern));
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_clone<R: Rng + ?Sized>(
        &mut self,
        coord: ChunkCoord,
        parent: EntityId,
        def: &MobDefinition,
        rarity: Rarity,
        position: Vec2,
        now: SimTime,
        rng: &mut R,
    ) -> bool {
        if let Some(brain) = self.brains.get_mut(&parent) {
            brain.last_spawn_at = Some(now);
        }
        let cap = self.config.ai.max_mobs_per_chunk;
        let Some(chunk) = self.map.chunk_mut(coord) else {
            return false;
        };
        if chunk.live_mob_count() >= cap {
            tracing::debug!(chunk = %coord, cap, "Spawn skipped, chunk full");
            return false;
        }
        let offset = Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        chunk.entities.push(WorldEntity::mob(
            &def.id,
            position + offset,
            def.rank,
            rarity,
            def.base_health,
        ));
        tracing::debug!(chunk = %coord, mob = %def.id, "Mob spawned");
        true
    }

    fn alert_chunk(&mut self, coord: ChunkCoord) {
        let Some(chunk) = self.map.chunk(coord) else {
            return;
        };
        for mob in chunk.entities.iter().filter(|e| e.is_alive_mob()) {
            let brain = self
                .brains
                .entry(mob.id)
                .or_insert_with(|| MobBrain::new(mob.position));
            if !brain.state.is_engaged() {
                brain.state = MobState::Active;
            }
        }
    }
}

fn step_toward(from: Vec2, to: Vec2, step: f32, stop_at: f32) -> Vec2 {
    let distance = from.distance(&to);
    if distance <= stop_at {
        return from;
    }
    let travel = step.min(distance - stop_at);
    from + (to - from).normalize() * travel
}

fn strafe(position: Vec2, around: Vec2, step: f32) -> Vec2 {
    position + (around - position).normalize().perpendicular() * step
}

fn nearest_drop(drops: &[LootDrop], from: Vec2) -> Option<Vec2> {
    drops
        .iter()
        .map(|drop| drop.position)
        .min_by(|a, b| from.distance(a).total_cmp(&from.distance(b)))
}
