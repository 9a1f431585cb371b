//! Item minting and loot drops
//!
//! - `factory` turns a catalog template into a rolled `Item`
//! - `loot` decides what a defeated mob leaves behind

pub mod factory;
pub mod item;
pub mod loot;

pub use factory::{roll_affix_slots, roll_quality, roll_rarity, AffixSlots, ItemFactory};
pub use item::{item_power, Item, RolledAffix, MAX_QUALITY};
pub use loot::LootTable;
