//! Session simulation: mob brains, fired patterns and loot on the ground,
//! advanced one authoritative tick at a time

pub mod context;
pub mod session;

pub use context::{build_context, PlayerSnapshot, Surroundings};
pub use session::{pattern_for_rarity, ActivePattern, MobBrain, PatternOwner, Session, TickReport};
