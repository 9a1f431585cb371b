//! Fog of war on top of deterministic generation
//!
//! Clients hold a blank manifest: the grid shape without biomes or entities.
//! Revealing a chunk regenerates the ground truth from `(seed, size)` rather
//! than shipping the whole map up front.

use ahash::AHashMap;
use std::sync::Arc;

use crate::catalog::ContentCatalog;
use crate::core::config::WorldGenConfig;
use crate::core::types::{Biome, ChunkCoord, ScanLevel};
use crate::world::chunk::WorldMap;
use crate::world::generation::generate;

/// Copy of `map` with every chunk's contents hidden
pub fn blank_manifest(map: &WorldMap) -> WorldMap {
    let mut manifest = map.clone();
    for chunk in manifest.chunks.values_mut() {
        chunk.biome = Biome::Unknown;
        chunk.scan_level = ScanLevel::Unknown;
        chunk.entities.clear();
    }
    manifest
}

/// Replace one manifest chunk with its regenerated ground truth
///
/// Returns `false` if the coordinate is not land in that world.
pub fn reveal_chunk(
    manifest: &mut WorldMap,
    seed: &str,
    size: u32,
    catalog: &ContentCatalog,
    config: &WorldGenConfig,
    coord: ChunkCoord,
) -> bool {
    let truth = generate(seed, size, catalog, config);
    reveal_from(manifest, &truth, coord)
}

fn reveal_from(manifest: &mut WorldMap, truth: &WorldMap, coord: ChunkCoord) -> bool {
    let Some(chunk) = truth.chunk(coord) else {
        tracing::debug!(chunk = %coord, "Reveal requested for non-land coordinate");
        return false;
    };
    let mut revealed = chunk.clone();
    revealed.scan_level = ScanLevel::Detailed;
    manifest.chunks.insert(coord, revealed);
    true
}

/// Memoised ground truth per `(seed, size)`
#[derive(Debug, Default)]
pub struct WorldCache {
    maps: AHashMap<(String, u32), Arc<WorldMap>>,
}

impl WorldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generated map for `(seed, size)`, built on first request
    pub fn get_or_generate(
        &mut self,
        seed: &str,
        size: u32,
        catalog: &ContentCatalog,
        config: &WorldGenConfig,
    ) -> Arc<WorldMap> {
        let key = (seed.to_string(), size);
        if let Some(map) = self.maps.get(&key) {
            return Arc::clone(map);
        }
        let map = Arc::new(generate(seed, size, catalog, config));
        self.maps.insert(key, Arc::clone(&map));
        map
    }

    /// `reveal_chunk` without regenerating on every call
    pub fn reveal(
        &mut self,
        manifest: &mut WorldMap,
        catalog: &ContentCatalog,
        config: &WorldGenConfig,
        coord: ChunkCoord,
    ) -> bool {
        let truth = self.get_or_generate(&manifest.seed, manifest.width, catalog, config);
        reveal_from(manifest, &truth, coord)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
