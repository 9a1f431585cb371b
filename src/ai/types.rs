//! Mob AI vocabulary: objectives, temperaments, states, primitives and the
//! read-only per-tick context a decision is made against.

use serde::{Deserialize, Serialize};
use crate::core::types::{Genre, Rarity, Vec2};

/// What a mob wants out of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobObjective {
    /// Seek and destroy
    #[default]
    KillPlayer,
    /// Guard a chest, door or zone
    ProtectAsset,
    /// Collect items, ignore the player unless nothing to collect
    Hoard,
    /// Self-preservation first
    Survive,
    Feed,
    /// Observe to escalate danger
    Witness,
    /// Create more units
    Reproduce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Temperament {
    #[default]
    Aggressive,
    /// Flees at a health threshold regardless of objective
    Coward,
    Territorial,
    Passive,
    Berserker,
    Opportunist,
    Hivemind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationTrigger {
    Sight,
    Sound,
    /// Blind sense
    Proximity,
    Damage,
    Alert,
    /// Industrial background clock
    Timer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobState {
    #[default]
    Dormant,
    /// Moving but trying to stay hidden
    Stalking,
    /// Combat engaged
    Active,
    Fleeing,
    /// Player dead or gone
    Victorious,
}

impl MobState {
    /// States that run the combat decision pipeline
    pub fn is_engaged(self) -> bool {
        matches!(self, MobState::Active | MobState::Fleeing)
    }
}

/// The atomic action a mob takes in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BehaviorPrimitive {
    Idle,
    Approach,
    Flee,
    Strafe,
    Flank,
    Telegraph,
    AttackMelee,
    AttackRanged,
    Block,
    Phase,
    CallAllies,
    Sacrifice,
    Spawn,
}

/// Sensory profile of a mob definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwarenessProfile {
    pub sight_range: f32,
    /// 0-100, higher hears quieter noises
    pub hearing_range: f32,
    /// 0.0 (thermal/blind) to 1.0 (needs full light)
    pub light_dependence: f32,
    /// Radius of blind sense
    pub proximity_sense: f32,
    pub can_alert_others: bool,
    /// Ticks even while dormant
    pub is_industrial: bool,
}

impl Default for AwarenessProfile {
    fn default() -> Self {
        Self {
            sight_range: 15.0,
            hearing_range: 30.0,
            light_dependence: 0.5,
            proximity_sense: 2.0,
            can_alert_others: false,
            is_industrial: false,
        }
    }
}

/// Read-only snapshot handed to the AI for one mob in one tick
#[derive(Debug, Clone, PartialEq)]
pub struct CombatContext {
    pub mob_pos: Vec2,
    /// 0.0 to 1.0
    pub mob_hp_percent: f32,
    pub player_pos: Vec2,
    pub player_hp_percent: f32,
    /// 0 (sneaking) to 100 (sprinting)
    pub player_noise_level: f32,
    pub player_is_looking_at_mob: bool,
    /// 0.0 (dark) to 1.0 (bright)
    pub light_level_at_mob: f32,
    pub nearby_allies_count: usize,
    pub distance_to_player: f32,
    pub is_in_territory: bool,
    pub nearest_corpse_dist: Option<f32>,
    pub nearest_corpse_pos: Option<Vec2>,
    /// Where a territorial mob returns to when lured away
    pub home_pos: Option<Vec2>,
}

/// Per-mob identity fed into action selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobProfile {
    pub objective: MobObjective,
    pub temperament: Temperament,
    pub genre: Genre,
    pub rarity: Rarity,
    /// Position in a combo chain
    pub sequence_index: u32,
}

/// Extra information attached to a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionMetadata {
    /// Fire while moving perpendicular to the target
    Strafing,
    /// Background industrial activity, for speech bubbles and debug
    Status(String),
}

/// Output of the AI for one mob in one tick
#[derive(Debug, Clone, PartialEq)]
pub struct MobDecision {
    pub action: BehaviorPrimitive,
    pub target_pos: Option<Vec2>,
    pub metadata: Option<DecisionMetadata>,
}

impl MobDecision {
    pub fn new(action: BehaviorPrimitive) -> Self {
        Self { action, target_pos: None, metadata: None }
    }

    pub fn toward(action: BehaviorPrimitive, target: Vec2) -> Self {
        Self { action, target_pos: Some(target), metadata: None }
    }

    pub fn with_metadata(mut self, metadata: DecisionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Coarse goal an objective maps to before genre culture picks a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goal {
    Aggress,
    Defend,
    Position,
    Flee,
}
