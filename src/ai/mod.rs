//! Mob AI - per-tick decision engine
//!
//! Two stages per mob per tick:
//! - Activation decides whether the mob is aware of the player at all.
//! - Action selection turns an engaged mob's objective, genre and rarity into
//!   exactly one behavior primitive.
//!
//! Decisions read a `CombatContext` snapshot and never mutate the world;
//! turning a primitive into movement or projectiles is the caller's job.

pub mod activation;
pub mod behavior_vector;
pub mod decision;
pub mod industrial;
pub mod types;

pub use activation::{check_activation, effective_noise, vision_quality, ActivationResult};
pub use behavior_vector::{behavior_vector, BehaviorVector, BEHAVIOR_DIMENSIONS};
pub use decision::{decide_action, objective_goal};
pub use industrial::industrial_action;
pub use types::{
    ActivationTrigger, AwarenessProfile, BehaviorPrimitive, CombatContext, DecisionMetadata, Goal,
    MobDecision, MobObjective, MobProfile, MobState, Temperament,
};
