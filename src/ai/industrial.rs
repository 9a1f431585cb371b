//! Industrial ticking: mobs that keep working while dormant
//!
//! The player walks into a room and it is already full of enemies.

use crate::ai::types::{BehaviorPrimitive, DecisionMetadata, MobDecision, MobObjective};
use crate::core::config::AiConfig;
use crate::core::types::SimTime;

/// Background action for a dormant industrial mob
///
/// `since_last_spawn` is `None` when the mob has never spawned.
pub fn industrial_action(
    objective: MobObjective,
    since_last_spawn: Option<SimTime>,
    config: &AiConfig,
) -> MobDecision {
    match objective {
        MobObjective::Reproduce => match since_last_spawn {
            Some(elapsed) if elapsed < config.spawn_interval => {
                MobDecision::new(BehaviorPrimitive::Idle)
                    .with_metadata(DecisionMetadata::Status("Fabricating...".to_string()))
            }
            _ => MobDecision::new(BehaviorPrimitive::Spawn),
        },
        MobObjective::Hoard => MobDecision::new(BehaviorPrimitive::Idle)
            .with_metadata(DecisionMetadata::Status("Mining...".to_string())),
        _ => MobDecision::new(BehaviorPrimitive::Idle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproduce_spawns_on_interval() {
        let config = AiConfig::default();
        assert_eq!(
            industrial_action(MobObjective::Reproduce, None, &config).action,
            BehaviorPrimitive::Spawn
        );
        assert_eq!(
            industrial_action(MobObjective::Reproduce, Some(1.0), &config).action,
            BehaviorPrimitive::Idle
        );
        assert_eq!(
            industrial_action(MobObjective::Reproduce, Some(config.spawn_interval), &config).action,
            BehaviorPrimitive::Spawn
        );
    }

    #[test]
    fn test_hoard_idles_with_flavor_only() {
        let decision = industrial_action(MobObjective::Hoard, None, &AiConfig::default());
        assert_eq!(decision.action, BehaviorPrimitive::Idle);
        assert_eq!(decision.target_pos, None);
        assert!(matches!(decision.metadata, Some(DecisionMetadata::Status(_))));
    }

    #[test]
    fn test_other_objectives_idle() {
        let decision = industrial_action(MobObjective::KillPlayer, None, &AiConfig::default());
        assert_eq!(decision, MobDecision::new(BehaviorPrimitive::Idle));
    }
}
