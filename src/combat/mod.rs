//! Real-time combat: projectile patterns, melee arcs, collision and kills

pub mod constants;
pub mod events;
pub mod projectile;
pub mod resolution;

pub use events::{CombatEvent, CombatEventLog, LootDrop};
pub use projectile::{
    check_deflection, get_projectiles_at_time, MeleeSwingArc, PatternKind, Projectile,
    ProjectilePattern,
};
pub use resolution::{
    check_loot_pickup, AttackCooldowns, CombatInput, CombatSystem, CombatTickResult, PickupResult,
};
