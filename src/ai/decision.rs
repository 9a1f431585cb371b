//! Combat decisions: Objective -> Goal -> Genre culture -> Primitive

use rand::Rng;

use crate::ai::types::{
    BehaviorPrimitive, CombatContext, DecisionMetadata, Goal, MobDecision, MobObjective,
    MobProfile, Temperament,
};
use crate::core::config::AiConfig;
use crate::core::types::{Genre, Rarity, Vec2};

/// Pick exactly one behavior primitive for an engaged mob
///
/// 1. Survival override: a hurt coward always flees.
/// 2. The objective maps to a coarse goal.
/// 3. The goal, genre and rarity select the concrete primitive.
pub fn decide_action<R: Rng + ?Sized>(
    mob: &MobProfile,
    ctx: &CombatContext,
    config: &AiConfig,
    rng: &mut R,
) -> MobDecision {
    if mob.temperament == Temperament::Coward && ctx.mob_hp_percent < config.coward_flee_threshold
    {
        return MobDecision::toward(BehaviorPrimitive::Flee, ctx.player_pos);
    }

    let goal = objective_goal(mob.objective, ctx, config);

    // Retro mobs have no adaptive behavior at all
    if mob.genre == Genre::Retro {
        return MobDecision::toward(BehaviorPrimitive::Approach, ctx.player_pos);
    }

    match goal {
        Goal::Flee => MobDecision::toward(BehaviorPrimitive::Flee, ctx.player_pos),
        Goal::Position => match position_target(mob.objective, ctx) {
            Some(target) => MobDecision::toward(BehaviorPrimitive::Approach, target),
            None => MobDecision::new(BehaviorPrimitive::Idle),
        },
        Goal::Aggress | Goal::Defend => {
            genre_primitive(mob.genre, mob.rarity, goal, ctx, config, rng)
        }
    }
}

/// What the mob wants right now
pub fn objective_goal(objective: MobObjective, ctx: &CombatContext, config: &AiConfig) -> Goal {
    match objective {
        MobObjective::ProtectAsset if ctx.is_in_territory => Goal::Aggress,
        MobObjective::ProtectAsset => Goal::Position,
        MobObjective::Witness => Goal::Position,
        MobObjective::Hoard => match ctx.nearest_corpse_dist {
            Some(dist) if dist < config.hoard_loot_radius => Goal::Position,
            _ => Goal::Aggress,
        },
        MobObjective::Survive if ctx.mob_hp_percent < config.survive_flee_threshold => Goal::Flee,
        MobObjective::Survive => Goal::Defend,
        MobObjective::KillPlayer | MobObjective::Feed | MobObjective::Reproduce => Goal::Aggress,
    }
}

/// Where a POSITION goal moves to: loot for hoarders, home for guards
fn position_target(objective: MobObjective, ctx: &CombatContext) -> Option<Vec2> {
    match objective {
        MobObjective::Hoard => ctx.nearest_corpse_pos,
        MobObjective::ProtectAsset => ctx.home_pos,
        _ => None,
    }
}

fn genre_primitive<R: Rng + ?Sized>(
    genre: Genre,
    rarity: Rarity,
    goal: Goal,
    ctx: &CombatContext,
    config: &AiConfig,
    rng: &mut R,
) -> MobDecision {
    let player = ctx.player_pos;
    let distance = ctx.distance_to_player;

    match genre {
        Genre::Fantasy => {
            if goal == Goal::Defend {
                return MobDecision::toward(BehaviorPrimitive::Block, player);
            }
            if distance > config.fantasy_melee_range {
                return MobDecision::toward(BehaviorPrimitive::Approach, player);
            }
            if rarity.is_smart() && roll(rng, config.fantasy_block_chance) {
                return MobDecision::toward(BehaviorPrimitive::Block, player);
            }
            MobDecision::toward(BehaviorPrimitive::AttackMelee, player)
        }
        Genre::SciFi => {
            if distance < config.scifi_min_range {
                return MobDecision::toward(BehaviorPrimitive::Flee, player);
            }
            if distance > config.scifi_max_range {
                if goal == Goal::Defend {
                    return MobDecision::new(BehaviorPrimitive::Idle);
                }
                return MobDecision::toward(BehaviorPrimitive::Approach, player);
            }
            let shot = MobDecision::toward(BehaviorPrimitive::AttackRanged, player);
            if rarity.is_smart() {
                shot.with_metadata(DecisionMetadata::Strafing)
            } else {
                shot
            }
        }
        Genre::PostApoc => {
            if distance > config.postapoc_melee_range {
                if goal == Goal::Defend {
                    return MobDecision::new(BehaviorPrimitive::Idle);
                }
                return MobDecision::toward(BehaviorPrimitive::Approach, player);
            }
            MobDecision::toward(BehaviorPrimitive::AttackMelee, player)
        }
        Genre::Eldritch => {
            if roll(rng, config.eldritch_phase_chance) {
                return MobDecision::toward(BehaviorPrimitive::Phase, player);
            }
            if ctx.player_is_looking_at_mob {
                return MobDecision::new(BehaviorPrimitive::Idle);
            }
            MobDecision::toward(BehaviorPrimitive::Approach, player)
        }
        Genre::Retro => MobDecision::toward(BehaviorPrimitive::Approach, player),
    }
}

/// Bernoulli trial; chances outside `[0, 1]` saturate instead of panicking
fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.gen::<f64>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx(distance: f32, hp: f32) -> CombatContext {
        CombatContext {
            mob_pos: Vec2::ZERO,
            mob_hp_percent: hp,
            player_pos: Vec2::new(distance, 0.0),
            player_hp_percent: 1.0,
            player_noise_level: 20.0,
            player_is_looking_at_mob: false,
            light_level_at_mob: 1.0,
            nearby_allies_count: 0,
            distance_to_player: distance,
            is_in_territory: true,
            nearest_corpse_dist: None,
            nearest_corpse_pos: None,
            home_pos: None,
        }
    }

    fn profile(genre: Genre, objective: MobObjective, rarity: Rarity) -> MobProfile {
        MobProfile {
            objective,
            temperament: Temperament::Aggressive,
            genre,
            rarity,
            sequence_index: 0,
        }
    }

    #[test]
    fn test_coward_flees_regardless_of_objective_and_genre() {
        let config = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let objectives = [
            MobObjective::KillPlayer,
            MobObjective::ProtectAsset,
            MobObjective::Hoard,
            MobObjective::Survive,
            MobObjective::Witness,
        ];
        let genres = [Genre::Fantasy, Genre::SciFi, Genre::PostApoc, Genre::Eldritch, Genre::Retro];
        for objective in objectives {
            for genre in genres {
                let mut mob = profile(genre, objective, Rarity::Epic);
                mob.temperament = Temperament::Coward;
                let decision = decide_action(&mob, &ctx(3.0, 0.2), &config, &mut rng);
                assert_eq!(decision.action, BehaviorPrimitive::Flee);
            }
        }
    }

    #[test]
    fn test_fantasy_approaches_then_attacks() {
        let config = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mob = profile(Genre::Fantasy, MobObjective::KillPlayer, Rarity::Common);
        assert_eq!(
            decide_action(&mob, &ctx(6.0, 1.0), &config, &mut rng).action,
            BehaviorPrimitive::Approach
        );
        assert_eq!(
            decide_action(&mob, &ctx(1.0, 1.0), &config, &mut rng).action,
            BehaviorPrimitive::AttackMelee
        );
    }

    #[test]
    fn test_smart_fantasy_sometimes_blocks() {
        let config = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mob = profile(Genre::Fantasy, MobObjective::KillPlayer, Rarity::Rare);
        let blocks = (0..500)
            .filter(|_| {
                decide_action(&mob, &ctx(1.0, 1.0), &config, &mut rng).action
                    == BehaviorPrimitive::Block
            })
            .count();
        assert!(blocks > 50 && blocks < 150, "blocks = {}", blocks);
    }

    #[test]
    fn test_scifi_holds_band() {
        let config = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let grunt = profile(Genre::SciFi, MobObjective::KillPlayer, Rarity::Common);
        assert_eq!(
            decide_action(&grunt, &ctx(2.0, 1.0), &config, &mut rng).action,
            BehaviorPrimitive::Flee
        );
        assert_eq!(
            decide_action(&grunt, &ctx(20.0, 1.0), &config, &mut rng).action,
            BehaviorPrimitive::Approach
        );

        let shot = decide_action(&grunt, &ctx(8.0, 1.0), &config, &mut rng);
        assert_eq!(shot.action, BehaviorPrimitive::AttackRanged);
        assert_eq!(shot.metadata, None);

        let smart = profile(Genre::SciFi, MobObjective::KillPlayer, Rarity::Epic);
        let shot = decide_action(&smart, &ctx(8.0, 1.0), &config, &mut rng);
        assert_eq!(shot.metadata, Some(DecisionMetadata::Strafing));
    }

    #[test]
    fn test_postapoc_rushes() {
        let config = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mob = profile(Genre::PostApoc, MobObjective::KillPlayer, Rarity::Common);
        assert_eq!(
            decide_action(&mob, &ctx(1.6, 1.0), &config, &mut rng).action,
            BehaviorPrimitive::Approach
        );
        assert_eq!(
            decide_action(&mob, &ctx(1.5, 1.0), &config, &mut rng).action,
            BehaviorPrimitive::AttackMelee
        );
    }

    #[test]
    fn test_eldritch_freezes_when_watched() {
        let config = AiConfig { eldritch_phase_chance: 0.0, ..AiConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mob = profile(Genre::Eldritch, MobObjective::KillPlayer, Rarity::Common);
        let mut watched = ctx(5.0, 1.0);
        watched.player_is_looking_at_mob = true;
        assert_eq!(
            decide_action(&mob, &watched, &config, &mut rng).action,
            BehaviorPrimitive::Idle
        );
        assert_eq!(
            decide_action(&mob, &ctx(5.0, 1.0), &config, &mut rng).action,
            BehaviorPrimitive::Approach
        );
    }

    #[test]
    fn test_eldritch_phase_rate() {
        let config = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mob = profile(Genre::Eldritch, MobObjective::KillPlayer, Rarity::Common);
        let phases = (0..2000)
            .filter(|_| {
                let decision = decide_action(&mob, &ctx(5.0, 1.0), &config, &mut rng);
                decision.action == BehaviorPrimitive::Phase
            })
            .count();
        assert!(phases > 200 && phases < 400, "phases = {}", phases);
    }

    #[test]
    fn test_out_of_range_chances_saturate() {
        let config = AiConfig {
            eldritch_phase_chance: 1.5,
            fantasy_block_chance: -0.5,
            ..AiConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let eldritch = profile(Genre::Eldritch, MobObjective::KillPlayer, Rarity::Common);
        let fantasy = profile(Genre::Fantasy, MobObjective::KillPlayer, Rarity::Epic);
        for _ in 0..100 {
            let phased = decide_action(&eldritch, &ctx(5.0, 1.0), &config, &mut rng);
            assert_eq!(phased.action, BehaviorPrimitive::Phase);
            let swung = decide_action(&fantasy, &ctx(1.0, 1.0), &config, &mut rng);
            assert_eq!(swung.action, BehaviorPrimitive::AttackMelee);
        }
    }

    #[test]
    fn test_protect_asset_returns_home_outside_territory() {
        let config = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mob = profile(Genre::PostApoc, MobObjective::ProtectAsset, Rarity::Common);
        let mut lured = ctx(1.0, 1.0);
        lured.is_in_territory = false;
        lured.home_pos = Some(Vec2::new(-30.0, 0.0));
        let decision = decide_action(&mob, &lured, &config, &mut rng);
        assert_eq!(decision.action, BehaviorPrimitive::Approach);
        assert_eq!(decision.target_pos, Some(Vec2::new(-30.0, 0.0)));

        let home = decide_action(&mob, &ctx(1.0, 1.0), &config, &mut rng);
        assert_eq!(home.action, BehaviorPrimitive::AttackMelee);
    }

    #[test]
    fn test_hoarder_diverts_to_loot() {
        let config = AiConfig::default();
        let loot = Vec2::new(0.0, 3.0);
        let mut near_loot = ctx(6.0, 1.0);
        near_loot.nearest_corpse_dist = Some(3.0);
        near_loot.nearest_corpse_pos = Some(loot);
        assert_eq!(objective_goal(MobObjective::Hoard, &near_loot, &config), Goal::Position);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mob = profile(Genre::Fantasy, MobObjective::Hoard, Rarity::Common);
        let decision = decide_action(&mob, &near_loot, &config, &mut rng);
        assert_eq!(decision.target_pos, Some(loot));

        near_loot.nearest_corpse_dist = Some(9.0);
        assert_eq!(objective_goal(MobObjective::Hoard, &near_loot, &config), Goal::Aggress);
    }

    #[test]
    fn test_survive_objective() {
        let config = AiConfig::default();
        assert_eq!(objective_goal(MobObjective::Survive, &ctx(5.0, 0.4), &config), Goal::Flee);
        assert_eq!(objective_goal(MobObjective::Survive, &ctx(5.0, 0.9), &config), Goal::Defend);
    }

    #[test]
    fn test_retro_always_approaches() {
        let config = AiConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mob = profile(Genre::Retro, MobObjective::Survive, Rarity::Legendary);
        assert_eq!(
            decide_action(&mob, &ctx(0.5, 0.1), &config, &mut rng).action,
            BehaviorPrimitive::Approach
        );
    }
}
