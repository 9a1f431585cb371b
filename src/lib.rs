//! Extraction Core - seeded worlds, mob AI, projectile combat and loot

pub mod ai;
pub mod catalog;
pub mod combat;
pub mod core;
pub mod items;
pub mod simulation;
pub mod world;
