//! Seeded world generation
//!
//! One `SeededRng` stream drives the whole map. Draw order per land cell:
//! land noise, biome noise, genre noise, rank roll, mob count, then per mob
//! (pick, x, y), then the resource roll and per resource (pick, x, y).
//! Extraction points are drawn only after every chunk is populated. Changing
//! that order changes every map for every seed.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::catalog::{ContentCatalog, MobDefinition, ResourceDefinition};
use crate::core::config::WorldGenConfig;
use crate::core::rng::{fold_seed, SeededRng};
use crate::core::types::{Biome, ChunkCoord, EntityId, Genre, Rank, Rarity, ScanLevel, Vec2};
use crate::world::chunk::{Chunk, WorldEntity, WorldMap};

/// Cumulative rank table on a 0..100 roll
const RANK_TABLE: [(f64, Rank, Rarity); 7] = [
    (45.0, Rank::F, Rarity::Common),
    (65.0, Rank::E, Rarity::Uncommon),
    (80.0, Rank::D, Rarity::Rare),
    (90.0, Rank::C, Rarity::Epic),
    (95.0, Rank::B, Rarity::Legendary),
    (99.0, Rank::A, Rarity::Legendary),
    (100.0, Rank::S, Rarity::Artifact),
];

/// Map a 0..100 roll to chunk rank and rarity
pub fn rank_for_roll(roll: f64) -> (Rank, Rarity) {
    RANK_TABLE
        .iter()
        .find(|(threshold, _, _)| roll < *threshold)
        .map(|&(_, rank, rarity)| (rank, rarity))
        .unwrap_or((Rank::S, Rarity::Artifact))
}

pub fn biome_for(distance: f64, noise: f64, config: &WorldGenConfig) -> Biome {
    if distance < config.industrial_radius {
        Biome::Industrial
    } else if distance < config.middle_radius {
        if noise > 0.5 {
            Biome::Ruins
        } else {
            Biome::Overgrowth
        }
    } else {
        Biome::Wasteland
    }
}

pub fn genre_for(noise: f64) -> Genre {
    if noise > 0.8 {
        Genre::Eldritch
    } else if noise > 0.6 {
        Genre::SciFi
    } else if noise < 0.2 {
        Genre::Fantasy
    } else {
        Genre::PostApoc
    }
}

/// Number of extraction chunks for a grid size
pub fn extraction_count(size: u32, config: &WorldGenConfig) -> usize {
    (size as usize / config.extraction_cell_ratio.max(1)).max(1)
}

/// Build the full map for `(seed, size)`
///
/// Identical arguments always give the same chunks, entities and extraction
/// points; only `generated_at_ms` differs between calls.
pub fn generate(
    seed: &str,
    size: u32,
    catalog: &ContentCatalog,
    config: &WorldGenConfig,
) -> WorldMap {
    let mut rng = SeededRng::new(seed);
    let seed_hash = fold_seed(seed);
    let center = (size / 2) as f64;
    let half = size as f64 / 2.0;
    let mut chunks = BTreeMap::new();

    for x in 0..size as i32 {
        for y in 0..size as i32 {
            let dx = x as f64 - center;
            let dy = y as f64 - center;
            let distance = (dx * dx + dy * dy).sqrt() / half;
            let land_noise = rng.next();
            if distance >= config.land_threshold + land_noise * config.land_noise {
                continue;
            }
            let coord = ChunkCoord::new(x, y);
            let chunk = build_chunk(coord, distance, seed_hash, &mut rng, catalog, config);
            chunks.insert(coord, chunk);
        }
    }

    let extraction_points = pick_extraction_points(&mut chunks, size, &mut rng, config);

    tracing::info!(
        seed,
        size,
        chunks = chunks.len(),
        extraction_points = extraction_points.len(),
        "World generated"
    );

    WorldMap {
        seed: seed.to_string(),
        width: size,
        height: size,
        chunks,
        extraction_points,
        generated_at_ms: now_ms(),
    }
}

fn build_chunk(
    coord: ChunkCoord,
    distance: f64,
    seed_hash: u32,
    rng: &mut SeededRng,
    catalog: &ContentCatalog,
    config: &WorldGenConfig,
) -> Chunk {
    let biome = biome_for(distance, rng.next(), config);
    let genre = genre_for(rng.next());
    let (rank, rarity) = rank_for_roll(rng.next() * 100.0);

    let mut entities = Vec::new();
    let mut next_index = 0u32;
    let mut next_id = || {
        let id = EntityId::derived(seed_hash, coord, next_index);
        next_index += 1;
        id
    };

    let pool = mob_pool(catalog, genre, rank);
    let mob_count = rng.range_usize(config.min_mobs, config.max_mobs + 1);
    for _ in 0..mob_count {
        let Some(def) = rng.pick(&pool).copied() else {
            break;
        };
        let position = entity_position(coord, rng, config);
        entities.push(
            WorldEntity::mob(&def.id, position, def.rank, Rarity::Common, def.base_health)
                .with_id(next_id()),
        );
    }

    if rng.chance(config.resource_chance) {
        let resources = resource_pool(catalog, genre);
        let count = rng.range_usize(config.min_resources, config.max_resources + 1);
        for _ in 0..count {
            let Some(def) = rng.pick(&resources).copied() else {
                break;
            };
            let position = entity_position(coord, rng, config);
            let resource = WorldEntity::resource(&def.id, position, def.rank, Rarity::Common);
            entities.push(resource.with_id(next_id()));
        }
    }

    tracing::debug!(
        chunk = %coord,
        ?biome,
        ?genre,
        ?rank,
        entities = entities.len(),
        "Chunk populated"
    );

    Chunk {
        id: Chunk::chunk_id(coord),
        coord,
        biome,
        genre,
        rank,
        rarity,
        entities,
        scan_level: ScanLevel::Unknown,
        traversable: true,
        is_extraction_point: false,
    }
}

/// Genre mobs no stronger than the chunk, else any genre mob, else any mob
fn mob_pool(catalog: &ContentCatalog, genre: Genre, rank: Rank) -> Vec<&MobDefinition> {
    let genre_mobs = catalog.mobs_for_genre(genre);
    let eligible: Vec<&MobDefinition> = genre_mobs
        .iter()
        .copied()
        .filter(|m| m.rank.at_most(rank))
        .collect();
    if !eligible.is_empty() {
        return eligible;
    }
    if !genre_mobs.is_empty() {
        tracing::warn!(?genre, ?rank, "No mob at or below chunk rank, using any genre mob");
        return genre_mobs;
    }
    tracing::warn!(?genre, "No mobs for genre, using full catalog");
    catalog.mobs.iter().collect()
}

fn resource_pool(catalog: &ContentCatalog, genre: Genre) -> Vec<&ResourceDefinition> {
    let genre_resources = catalog.resources_for_genre(genre);
    if genre_resources.is_empty() {
        catalog.resources.iter().collect()
    } else {
        genre_resources
    }
}

fn entity_position(coord: ChunkCoord, rng: &mut SeededRng, config: &WorldGenConfig) -> Vec2 {
    let min = f64::from(config.entity_offset_min);
    let max = f64::from(config.entity_offset_max);
    let origin_x = coord.x as f32 * config.chunk_world_size;
    let origin_y = coord.y as f32 * config.chunk_world_size;
    let offset_x = rng.range(min, max) as f32;
    let offset_y = rng.range(min, max) as f32;
    Vec2::new(origin_x + offset_x, origin_y + offset_y)
}

fn pick_extraction_points(
    chunks: &mut BTreeMap<ChunkCoord, Chunk>,
    size: u32,
    rng: &mut SeededRng,
    config: &WorldGenConfig,
) -> Vec<ChunkCoord> {
    let mut candidates: Vec<ChunkCoord> = chunks.keys().copied().collect();
    let wanted = extraction_count(size, config).min(candidates.len());
    let mut picked = Vec::with_capacity(wanted);
    for _ in 0..wanted {
        let idx = rng.range_usize(0, candidates.len());
        let coord = candidates.remove(idx);
        if let Some(chunk) = chunks.get_mut(&coord) {
            chunk.is_extraction_point = true;
        }
        picked.push(coord);
    }
    picked
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_table_bands() {
        assert_eq!(rank_for_roll(0.0), (Rank::F, Rarity::Common));
        assert_eq!(rank_for_roll(44.9), (Rank::F, Rarity::Common));
        assert_eq!(rank_for_roll(45.0), (Rank::E, Rarity::Uncommon));
        assert_eq!(rank_for_roll(94.0), (Rank::B, Rarity::Legendary));
        assert_eq!(rank_for_roll(97.0), (Rank::A, Rarity::Legendary));
        assert_eq!(rank_for_roll(99.5), (Rank::S, Rarity::Artifact));
    }

    #[test]
    fn test_genre_bands() {
        assert_eq!(genre_for(0.9), Genre::Eldritch);
        assert_eq!(genre_for(0.7), Genre::SciFi);
        assert_eq!(genre_for(0.1), Genre::Fantasy);
        assert_eq!(genre_for(0.5), Genre::PostApoc);
    }

    #[test]
    fn test_biome_bands() {
        let config = WorldGenConfig::default();
        assert_eq!(biome_for(0.1, 0.9, &config), Biome::Industrial);
        assert_eq!(biome_for(0.5, 0.9, &config), Biome::Ruins);
        assert_eq!(biome_for(0.5, 0.1, &config), Biome::Overgrowth);
        assert_eq!(biome_for(0.9, 0.5, &config), Biome::Wasteland);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let catalog = ContentCatalog::builtin();
        let config = WorldGenConfig::default();
        let a = generate("determinism", 16, &catalog, &config);
        let b = generate("determinism", 16, &catalog, &config);
        assert!(a.same_layout(&b));
        assert!(!a.chunks.is_empty());

        let c = generate("other-seed", 16, &catalog, &config);
        assert!(!a.same_layout(&c));
    }

    #[test]
    fn test_mobs_respect_chunk_rank_and_bounds() {
        let catalog = ContentCatalog::builtin();
        let config = WorldGenConfig::default();
        let map = generate("bounds", 24, &catalog, &config);
        for (coord, chunk) in &map.chunks {
            let mobs: Vec<_> = chunk.mobs().collect();
            assert!((1..=3).contains(&mobs.len()), "chunk {} has {} mobs", coord, mobs.len());
            for entity in &chunk.entities {
                let local_x = entity.position.x - coord.x as f32 * 100.0;
                let local_y = entity.position.y - coord.y as f32 * 100.0;
                assert!((10.0..=90.0).contains(&local_x));
                assert!((10.0..=90.0).contains(&local_y));
            }
            for mob in mobs {
                let def = catalog.mob(&mob.definition_id).expect("known mob");
                assert_eq!(def.genre, chunk.genre);
                assert_eq!(mob.health, Some(def.base_health));
            }
        }
    }

    #[test]
    fn test_extraction_points_scale_with_size() {
        let catalog = ContentCatalog::builtin();
        let config = WorldGenConfig::default();
        let map = generate("exits", 32, &catalog, &config);
        assert_eq!(map.extraction_points.len(), 3);
        for coord in &map.extraction_points {
            assert!(map.chunks[coord].is_extraction_point);
        }
        let flagged = map.chunks.values().filter(|c| c.is_extraction_point).count();
        assert_eq!(flagged, 3);
        assert_eq!(extraction_count(8, &config), 1);
    }
}
