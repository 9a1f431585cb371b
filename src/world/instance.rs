//! Timed world instances and the persistence seam
//!
//! The core never touches storage. A `WorldRepository` is handed in by the
//! host; `InMemoryRepository` backs tests and the CLI.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::ContentCatalog;
use crate::core::config::WorldGenConfig;
use crate::core::error::Result;
use crate::items::Item;
use crate::world::chunk::WorldMap;
use crate::world::generation::generate;

const HOUR_MS: u64 = 60 * 60 * 1000;
const DAY_MS: u64 = 24 * HOUR_MS;

/// A generated map with a live window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldInstance {
    /// `inst_<seed>_<size>`
    pub id: String,
    pub seed: String,
    pub size: u32,
    pub map: WorldMap,
    pub started_at_ms: u64,
    pub ends_at_ms: u64,
}

impl WorldInstance {
    pub fn instance_id(seed: &str, size: u32) -> String {
        format!("inst_{}_{}", seed, size)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.ends_at_ms
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.ends_at_ms.saturating_sub(now_ms)
    }
}

/// Storage for instances and minted items, keyed by instance id
pub trait WorldRepository {
    fn load(&self, key: &str) -> Result<Option<WorldInstance>>;
    fn store(&mut self, instance: &WorldInstance) -> Result<()>;
    fn store_item(&mut self, item: &Item) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    instances: AHashMap<String, WorldInstance>,
    items: Vec<Item>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

impl WorldRepository for InMemoryRepository {
    fn load(&self, key: &str) -> Result<Option<WorldInstance>> {
        Ok(self.instances.get(key).cloned())
    }

    fn store(&mut self, instance: &WorldInstance) -> Result<()> {
        self.instances.insert(instance.id.clone(), instance.clone());
        Ok(())
    }

    fn store_item(&mut self, item: &Item) -> Result<()> {
        self.items.push(item.clone());
        Ok(())
    }
}

/// Live window for a world of `size`
///
/// Skirmish (16) runs an hour, standard (32) four hours, daily (64) until the
/// next UTC midnight. Anything else gets an hour.
pub fn session_duration_ms(size: u32, now_ms: u64) -> u64 {
    match size {
        16 => HOUR_MS,
        32 => 4 * HOUR_MS,
        64 => DAY_MS - now_ms % DAY_MS,
        _ => HOUR_MS,
    }
}

/// Resume the stored instance for `(seed, size)` or roll a new timeline
pub fn activate_world<R: WorldRepository + ?Sized>(
    repo: &mut R,
    seed: &str,
    size: u32,
    catalog: &ContentCatalog,
    config: &WorldGenConfig,
    now_ms: u64,
) -> Result<WorldInstance> {
    let id = WorldInstance::instance_id(seed, size);

    if let Some(existing) = repo.load(&id)? {
        if !existing.is_expired(now_ms) {
            tracing::info!(
                instance = %id,
                remaining_min = existing.remaining_ms(now_ms) / 60_000,
                "Resuming world"
            );
            return Ok(existing);
        }
        tracing::info!(instance = %id, "World expired, regenerating");
    }

    let map = generate(seed, size, catalog, config);
    let instance = WorldInstance {
        id,
        seed: seed.to_string(),
        size,
        map,
        started_at_ms: now_ms,
        ends_at_ms: now_ms + session_duration_ms(size, now_ms),
    };
    repo.store(&instance)?;
    tracing::info!(instance = %instance.id, ends_at_ms = instance.ends_at_ms, "World activated");
    Ok(instance)
}
