//! Chunk grid and the entities living in it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{
    Biome, ChunkCoord, EntityId, EntityKind, Genre, Rank, Rarity, ScanLevel, Vec2,
};

/// A mob or resource node placed in a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Id into the content catalog
    pub definition_id: String,
    pub position: Vec2,
    pub rank: Rank,
    pub rarity: Rarity,
    pub hostile: bool,
    /// Mobs only
    pub health: Option<f32>,
}

impl WorldEntity {
    pub fn mob(
        definition_id: &str,
        position: Vec2,
        rank: Rank,
        rarity: Rarity,
        health: f32,
    ) -> Self {
        Self {
            id: EntityId::new(),
            kind: EntityKind::Mob,
            definition_id: definition_id.to_string(),
            position,
            rank,
            rarity,
            hostile: true,
            health: Some(health),
        }
    }

    pub fn resource(definition_id: &str, position: Vec2, rank: Rank, rarity: Rarity) -> Self {
        Self {
            id: EntityId::new(),
            kind: EntityKind::Resource,
            definition_id: definition_id.to_string(),
            position,
            rank,
            rarity,
            hostile: false,
            health: None,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    pub fn is_mob(&self) -> bool {
        self.kind == EntityKind::Mob
    }

    /// A mob with health left
    pub fn is_alive_mob(&self) -> bool {
        self.is_mob() && self.health.map_or(false, |h| h > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `chk_<x>_<y>`
    pub id: String,
    pub coord: ChunkCoord,
    pub biome: Biome,
    pub genre: Genre,
    pub rank: Rank,
    pub rarity: Rarity,
    pub entities: Vec<WorldEntity>,
    pub scan_level: ScanLevel,
    pub traversable: bool,
    pub is_extraction_point: bool,
}

impl Chunk {
    pub fn chunk_id(coord: ChunkCoord) -> String {
        format!("chk_{}_{}", coord.x, coord.y)
    }

    pub fn mobs(&self) -> impl Iterator<Item = &WorldEntity> {
        self.entities.iter().filter(|e| e.is_mob())
    }

    pub fn live_mob_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_alive_mob()).count()
    }

    pub fn entity(&self, id: EntityId) -> Option<&WorldEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut WorldEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Remove an entity, returning it if present
    pub fn remove_entity(&mut self, id: EntityId) -> Option<WorldEntity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }
}

/// The authoritative map of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldMap {
    pub seed: String,
    pub width: u32,
    pub height: u32,
    pub chunks: BTreeMap<ChunkCoord, Chunk>,
    pub extraction_points: Vec<ChunkCoord>,
    /// Wall-clock stamp, the only non-deterministic field
    pub generated_at_ms: u64,
}

impl WorldMap {
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Chunk containing a world position
    pub fn coord_at(&self, position: Vec2, chunk_world_size: f32) -> ChunkCoord {
        ChunkCoord::new(
            (position.x / chunk_world_size).floor() as i32,
            (position.y / chunk_world_size).floor() as i32,
        )
    }

    pub fn entity_count(&self) -> usize {
        self.chunks.values().map(|c| c.entities.len()).sum()
    }

    pub fn live_mob_count(&self) -> usize {
        self.chunks.values().map(|c| c.live_mob_count()).sum()
    }

    /// True if both maps hold the same content, ignoring the timestamp
    pub fn same_layout(&self, other: &WorldMap) -> bool {
        self.seed == other.seed
            && self.width == other.width
            && self.height == other.height
            && self.extraction_points == other.extraction_points
            && self.chunks == other.chunks
    }
}
