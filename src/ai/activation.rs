//! Activation: the cheap filter that decides whether a mob wakes up
//!
//! Evaluated in priority order, failing fast:
//! 1. Industrial mobs never sleep; they toggle ACTIVE/DORMANT on distance.
//! 2. Engaged mobs stay engaged until the player leaves de-aggro range.
//! 3. Sound wakes a mob into STALKING.
//! 4. Blind sense triggers ACTIVE even in darkness.
//! 5. Sight, scaled by light, triggers ACTIVE.

use crate::ai::types::{ActivationTrigger, AwarenessProfile, CombatContext, MobState};
use crate::core::config::AiConfig;

/// New state plus what caused the transition, if anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationResult {
    pub new_state: MobState,
    pub trigger: Option<ActivationTrigger>,
}

impl ActivationResult {
    fn new(new_state: MobState, trigger: Option<ActivationTrigger>) -> Self {
        Self { new_state, trigger }
    }
}

/// Vision quality from 1.0 (perfect) down to 0.0 (blind)
pub fn vision_quality(awareness: &AwarenessProfile, light_level: f32) -> f32 {
    1.0 - awareness.light_dependence * (1.0 - light_level.clamp(0.0, 1.0))
}

/// Player noise left after attenuation over distance
pub fn effective_noise(ctx: &CombatContext) -> f32 {
    ctx.player_noise_level - ctx.distance_to_player / 2.0
}

pub fn check_activation(
    current_state: MobState,
    awareness: &AwarenessProfile,
    ctx: &CombatContext,
    config: &AiConfig,
) -> ActivationResult {
    if awareness.is_industrial {
        if ctx.distance_to_player < awareness.sight_range {
            return ActivationResult::new(MobState::Active, Some(ActivationTrigger::Sight));
        }
        return ActivationResult::new(MobState::Dormant, Some(ActivationTrigger::Timer));
    }

    if current_state.is_engaged() {
        if ctx.player_hp_percent <= 0.0 {
            return ActivationResult::new(MobState::Victorious, None);
        }
        if ctx.distance_to_player > awareness.sight_range * config.deaggro_factor {
            return ActivationResult::new(MobState::Dormant, None);
        }
        return ActivationResult::new(MobState::Active, None);
    }

    if effective_noise(ctx) > 100.0 - awareness.hearing_range {
        return ActivationResult::new(MobState::Stalking, Some(ActivationTrigger::Sound));
    }

    if ctx.distance_to_player < awareness.proximity_sense {
        return ActivationResult::new(MobState::Active, Some(ActivationTrigger::Proximity));
    }

    let effective_range = awareness.sight_range * vision_quality(awareness, ctx.light_level_at_mob);
    if ctx.distance_to_player < effective_range {
        return ActivationResult::new(MobState::Active, Some(ActivationTrigger::Sight));
    }

    ActivationResult::new(MobState::Dormant, None)
}
