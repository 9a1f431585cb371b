//! Combat constants - default tunable values in one place
//!
//! `CombatConfig::default()` is built from these. Times are in seconds,
//! distances in world units, angles in radians.

// Projectiles
pub const PROJECTILE_SPEED: f32 = 10.0;
pub const PROJECTILE_LIFESPAN: f64 = 2.0;
pub const SHOTGUN_SPREAD: [f32; 3] = [-0.25, 0.0, 0.25];
pub const NOVA_BULLETS: usize = 8;

// Collision
pub const HIT_RADIUS: f32 = 1.5;
pub const CONTACT_RADIUS: f32 = 1.0;
pub const PICKUP_RADIUS: f32 = 2.0;

// Damage
pub const BULLET_DAMAGE: f32 = 25.0;
pub const MELEE_DAMAGE: f32 = 50.0;
pub const DEFAULT_CONTACT_DAMAGE: f32 = 10.0;
pub const MOB_BULLET_DAMAGE: f32 = 8.0;

// Melee
pub const MELEE_WINDOW: f64 = 0.2;
pub const MELEE_HALF_ANGLE: f32 = 0.75;

// Cadence
pub const CONTACT_ATTACK_INTERVAL: f64 = 1.0;
