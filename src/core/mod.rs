pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::{AiConfig, CombatConfig, CoreConfig, LootConfig, WorldGenConfig};
pub use error::{CoreError, Result};
pub use rng::SeededRng;
pub use types::{
    angle_delta, Biome, ChunkCoord, EntityId, EntityKind, Genre, Rank, Rarity, ScanLevel,
    SimTime, Vec2,
};
