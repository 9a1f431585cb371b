//! Stateless projectile patterns
//!
//! A pattern is stored once (origin, start time, angle, kind). Bullet positions
//! are recomputed from that record every call, never integrated frame to frame,
//! so replaying a timestamp always yields the same bullets.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;

use crate::combat::constants::{NOVA_BULLETS, SHOTGUN_SPREAD};
use crate::core::config::CombatConfig;
use crate::core::types::{angle_delta, SimTime, Vec2};

/// Emission shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternKind {
    Single,
    /// Three bullets at -0.25, 0, +0.25 rad
    Shotgun,
    /// Eight bullets spaced by PI/4
    Nova,
}

impl PatternKind {
    /// Angular offsets from the base angle, in emission order
    pub fn offsets(self) -> Vec<f32> {
        match self {
            PatternKind::Single => vec![0.0],
            PatternKind::Shotgun => SHOTGUN_SPREAD.to_vec(),
            PatternKind::Nova => (0..NOVA_BULLETS).map(|i| i as f32 * FRAC_PI_4).collect(),
        }
    }

    pub fn bullet_count(self) -> usize {
        match self {
            PatternKind::Single => 1,
            PatternKind::Shotgun => SHOTGUN_SPREAD.len(),
            PatternKind::Nova => NOVA_BULLETS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectilePattern {
    pub kind: PatternKind,
    pub origin: Vec2,
    pub start_time: SimTime,
    pub base_angle: f32,
}

impl ProjectilePattern {
    pub fn new(kind: PatternKind, origin: Vec2, start_time: SimTime, base_angle: f32) -> Self {
        Self { kind, origin, start_time, base_angle }
    }

    /// True once every bullet of the pattern has expired
    pub fn is_expired(&self, now: SimTime, config: &CombatConfig) -> bool {
        now - self.start_time > config.projectile_lifespan
    }
}

/// One bullet's position at a given instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// `p_<index>` within its pattern
    pub id: String,
    pub position: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub spawn_time: SimTime,
    pub lifespan: f64,
}

/// Every bullet of `pattern` alive at `now`
///
/// Empty when `now` is before the pattern started or past its lifespan.
pub fn get_projectiles_at_time(
    pattern: &ProjectilePattern,
    now: SimTime,
    config: &CombatConfig,
) -> Vec<Projectile> {
    let elapsed = now - pattern.start_time;
    if elapsed < 0.0 || elapsed > config.projectile_lifespan {
        return Vec::new();
    }

    let travelled = config.projectile_speed * elapsed as f32;
    pattern
        .kind
        .offsets()
        .into_iter()
        .enumerate()
        .map(|(idx, offset)| {
            let angle = pattern.base_angle + offset;
            Projectile {
                id: format!("p_{}", idx),
                position: pattern.origin + Vec2::from_angle(angle) * travelled,
                angle,
                speed: config.projectile_speed,
                spawn_time: pattern.start_time,
                lifespan: config.projectile_lifespan,
            }
        })
        .collect()
}

/// A melee swing, live for `melee_window` seconds after `start_time`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeleeSwingArc {
    pub origin: Vec2,
    pub angle: f32,
    pub range: f32,
    pub start_time: SimTime,
}

impl MeleeSwingArc {
    pub fn new(origin: Vec2, angle: f32, range: f32, start_time: SimTime) -> Self {
        Self { origin, angle, range, start_time }
    }

    pub fn is_active(&self, now: SimTime, config: &CombatConfig) -> bool {
        let age = now - self.start_time;
        (0.0..=config.melee_window).contains(&age)
    }

    /// True if `point` lies inside the arc's angular window
    pub fn covers_angle(&self, point: Vec2, config: &CombatConfig) -> bool {
        angle_delta(self.origin.angle_to(&point), self.angle) <= config.melee_half_angle
    }
}

/// True if a live melee arc blocks `bullet`
pub fn check_deflection(
    bullet: &Projectile,
    arc: &MeleeSwingArc,
    now: SimTime,
    config: &CombatConfig,
) -> bool {
    arc.is_active(now, config) && arc.covers_angle(bullet.position, config)
}
