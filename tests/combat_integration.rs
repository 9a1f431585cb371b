//! Combat integration tests
//!
//! Pattern replay, collision boundaries and the kill/loot coupling through
//! the public API.

use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_4;

use extraction_core::catalog::ContentCatalog;
use extraction_core::combat::{
    get_projectiles_at_time, AttackCooldowns, CombatEvent, CombatInput, CombatSystem,
    MeleeSwingArc, PatternKind, Projectile, ProjectilePattern,
};
use extraction_core::core::{
    angle_delta, Biome, ChunkCoord, CombatConfig, CoreConfig, Genre, LootConfig, Rank, Rarity,
    ScanLevel, Vec2,
};
use extraction_core::world::{Chunk, WorldEntity};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn arena(entities: Vec<WorldEntity>) -> BTreeMap<ChunkCoord, Chunk> {
    let coord = ChunkCoord::new(0, 0);
    let mut chunks = BTreeMap::new();
    chunks.insert(
        coord,
        Chunk {
            id: Chunk::chunk_id(coord),
            coord,
            biome: Biome::Wasteland,
            genre: Genre::PostApoc,
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

fn bullet(position: Vec2) -> Projectile {
    Projectile {
        id: "p_0".to_string(),
        position,
        angle: 0.0,
        speed: 10.0,
        spawn_time: 0.0,
        lifespan: 2.0,
    }
}

fn input<'a>(
    bullets: &'a [Projectile],
    chunks: &'a BTreeMap<ChunkCoord, Chunk>,
) -> CombatInput<'a> {
    with_arcs(bullets, chunks, &[])
}

fn with_arcs<'a>(
    bullets: &'a [Projectile],
    chunks: &'a BTreeMap<ChunkCoord, Chunk>,
    melee_arcs: &'a [MeleeSwingArc],
) -> CombatInput<'a> {
    CombatInput {
        bullets,
        chunks,
        // Away from every mob so contact damage stays out of the picture
        player_pos: Vec2::new(95.0, 95.0),
        player_health: 100.0,
        melee_arcs,
        now: 1.0,
    }
}

fn guaranteed_loot() -> CoreConfig {
    CoreConfig {
        loot: LootConfig {
            gear_chance: 1.0,
            elite_gear_chance: 1.0,
            boss_gear_chance: 1.0,
            ..LootConfig::default()
        },
        ..CoreConfig::default()
    }
}

fn event_kinds(events: &[CombatEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|event| match event {
            CombatEvent::Hit { .. } => "hit",
            CombatEvent::Kill { .. } => "kill",
            CombatEvent::LootSpawn { .. } => "loot",
            CombatEvent::PlayerDamage { .. } => "player",
            CombatEvent::Deflect { .. } => "deflect",
        })
        .collect()
}

/// Shotgun from the origin at one second: three bullets ten units out
#[test]
fn test_shotgun_at_one_second() {
    let config = CombatConfig::default();
    let pattern = ProjectilePattern::new(PatternKind::Shotgun, Vec2::ZERO, 0.0, 0.0);
    let bullets = get_projectiles_at_time(&pattern, 1.0, &config);

    assert_eq!(bullets.len(), 3);
    for (bullet, angle) in bullets.iter().zip([-0.25f32, 0.0, 0.25]) {
        assert!((bullet.angle - angle).abs() < 1e-6);
        assert!((bullet.position.length() - 10.0).abs() < 1e-4);
        let expected = Vec2::from_angle(angle) * 10.0;
        assert!(bullet.position.distance(&expected) < 1e-4);
    }
}

#[test]
fn test_patterns_expire_after_lifespan() {
    let config = CombatConfig::default();
    let pattern = ProjectilePattern::new(PatternKind::Nova, Vec2::new(3.0, 4.0), 10.0, 1.0);
    assert_eq!(get_projectiles_at_time(&pattern, 12.0, &config).len(), 8);
    assert!(get_projectiles_at_time(&pattern, 12.01, &config).is_empty());
    assert!(get_projectiles_at_time(&pattern, 9.99, &config).is_empty());
    assert!(pattern.is_expired(12.01, &config));
}

proptest! {
    #[test]
    fn prop_pattern_cardinality(
        x in -500.0f32..500.0,
        y in -500.0f32..500.0,
        angle in -10.0f32..10.0,
        elapsed in 0.0f64..2.0,
    ) {
        let config = CombatConfig::default();
        let origin = Vec2::new(x, y);
        let expected = [
            (PatternKind::Single, 1),
            (PatternKind::Shotgun, 3),
            (PatternKind::Nova, 8),
        ];
        for (kind, count) in expected {
            let pattern = ProjectilePattern::new(kind, origin, 5.0, angle);
            let bullets = get_projectiles_at_time(&pattern, 5.0 + elapsed, &config);
            prop_assert_eq!(bullets.len(), count);
            if kind == PatternKind::Nova {
                for pair in bullets.windows(2) {
                    let step = angle_delta(pair[1].angle, pair[0].angle);
                    prop_assert!((step - FRAC_PI_4).abs() < 1e-3);
                }
            }
        }
    }

    #[test]
    fn prop_replay_is_idempotent(angle in -10.0f32..10.0, elapsed in 0.0f64..3.0) {
        let config = CombatConfig::default();
        let pattern = ProjectilePattern::new(PatternKind::Shotgun, Vec2::new(1.0, 2.0), 0.0, angle);
        let first = get_projectiles_at_time(&pattern, elapsed, &config);
        let second = get_projectiles_at_time(&pattern, elapsed, &config);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_collision_boundary() {
    let catalog = ContentCatalog::builtin();
    let config = CoreConfig::default();
    let system = CombatSystem::new(&catalog, &config);
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let chunks = arena(vec![WorldEntity::mob(
        "raider",
        Vec2::new(20.0, 20.0),
        Rank::F,
        Rarity::Common,
        500.0,
    )]);

    let close = [bullet(Vec2::new(21.0, 20.0))];
    let result = system.tick(input(&close, &chunks), &mut AttackCooldowns::new(), &mut rng);
    assert_eq!(result.events.hits(), 1);

    let wide = [bullet(Vec2::new(22.0, 20.0))];
    let result = system.tick(input(&wide, &chunks), &mut AttackCooldowns::new(), &mut rng);
    assert_eq!(result.events.hits(), 0);
    assert_eq!(result.surviving_bullets.len(), 1);
}

/// Every kill pairs with exactly one loot drop at the corpse when loot is guaranteed
#[test]
fn test_kill_and_loot_coupling() {
    let catalog = ContentCatalog::builtin();
    let config = guaranteed_loot();
    let system = CombatSystem::new(&catalog, &config);
    let mut rng = ChaCha8Rng::seed_from_u64(22);

    let positions = [Vec2::new(10.0, 10.0), Vec2::new(30.0, 10.0), Vec2::new(50.0, 10.0)];
    let mobs: Vec<WorldEntity> = positions
        .iter()
        .map(|&p| WorldEntity::mob("raider", p, Rank::F, Rarity::Common, 20.0))
        .collect();
    let chunks = arena(mobs);

    // Two bullets on the first mob: one kill, the second bullet passes on
    let bullets: Vec<Projectile> = positions
        .iter()
        .map(|&p| bullet(p))
        .chain(std::iter::once(bullet(positions[0])))
        .collect();
    let result = system.tick(input(&bullets, &chunks), &mut AttackCooldowns::new(), &mut rng);

    assert_eq!(result.events.kills(), 3);
    assert_eq!(result.spawned_loot.len(), 3);
    assert_eq!(result.surviving_bullets.len(), 1);
    for (drop, position) in result.spawned_loot.iter().zip(positions) {
        assert_eq!(drop.position, position);
        assert!(!drop.items.is_empty());
    }

    // Event order per mob: hit, kill, loot
    assert_eq!(event_kinds(&result.events.events), ["hit", "kill", "loot"].repeat(3));
    assert_eq!(result.updated_chunks[&ChunkCoord::new(0, 0)].live_mob_count(), 0);
}

#[test]
fn test_melee_kill_drops_loot_once() {
    let catalog = ContentCatalog::builtin();
    let config = guaranteed_loot();
    let system = CombatSystem::new(&catalog, &config);
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let position = Vec2::new(52.0, 50.0);
    let chunks = arena(vec![WorldEntity::mob(
        "raider",
        position,
        Rank::F,
        Rarity::Common,
        20.0,
    )]);
    let arcs = [MeleeSwingArc::new(Vec2::new(50.0, 50.0), 0.0, 3.0, 0.9)];

    let result = system.tick(
        with_arcs(&[], &chunks, &arcs),
        &mut AttackCooldowns::new(),
        &mut rng,
    );

    assert_eq!(event_kinds(&result.events.events), ["hit", "kill", "loot"]);
    assert_eq!(result.spawned_loot.len(), 1);
    assert_eq!(result.spawned_loot[0].position, position);
    assert_eq!(result.updated_chunks[&ChunkCoord::new(0, 0)].live_mob_count(), 0);
}

#[test]
fn test_melee_skips_mob_shot_dead_this_tick() {
    let catalog = ContentCatalog::builtin();
    let config = guaranteed_loot();
    let system = CombatSystem::new(&catalog, &config);
    let mut rng = ChaCha8Rng::seed_from_u64(24);
    let position = Vec2::new(52.0, 50.0);
    let chunks = arena(vec![WorldEntity::mob(
        "raider",
        position,
        Rank::F,
        Rarity::Common,
        20.0,
    )]);
    let bullets = [bullet(position)];
    let arcs = [MeleeSwingArc::new(Vec2::new(50.0, 50.0), 0.0, 3.0, 0.9)];

    let result = system.tick(
        with_arcs(&bullets, &chunks, &arcs),
        &mut AttackCooldowns::new(),
        &mut rng,
    );

    assert_eq!(result.events.hits(), 1);
    assert_eq!(result.events.kills(), 1);
    assert_eq!(result.spawned_loot.len(), 1);
    assert!(result.surviving_bullets.is_empty());
}
