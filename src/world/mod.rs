//! World: chunk grid, seeded generation, fog of war and timed instances

pub mod chunk;
pub mod generation;
pub mod instance;
pub mod recon;

pub use chunk::{Chunk, WorldEntity, WorldMap};
pub use generation::{generate, rank_for_roll};
pub use instance::{
    activate_world, session_duration_ms, InMemoryRepository, WorldInstance, WorldRepository,
};
pub use recon::{blank_manifest, reveal_chunk, WorldCache};
