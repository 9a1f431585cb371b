//! Behavior vectors for archetype search
//!
//! A fixed additive lookup, not a learned embedding. Layout:
//! `[aggression, social, range_preference, stealth, chaos]`.

use crate::ai::types::Temperament;
use crate::core::types::Genre;

pub const BEHAVIOR_DIMENSIONS: usize = 5;

pub type BehaviorVector = [f32; BEHAVIOR_DIMENSIONS];

const AGGRESSION: usize = 0;
const SOCIAL: usize = 1;
const RANGE: usize = 2;
const STEALTH: usize = 3;
const CHAOS: usize = 4;

fn temperament_contribution(temperament: Temperament) -> (usize, f32) {
    match temperament {
        Temperament::Aggressive => (AGGRESSION, 0.8),
        Temperament::Berserker => (AGGRESSION, 1.0),
        Temperament::Coward => (AGGRESSION, -0.5),
        Temperament::Passive => (AGGRESSION, -0.8),
        Temperament::Hivemind => (SOCIAL, 1.0),
        Temperament::Opportunist => (STEALTH, 0.6),
        Temperament::Territorial => (AGGRESSION, 0.3),
    }
}

fn genre_contribution(genre: Genre) -> Option<(usize, f32)> {
    match genre {
        Genre::SciFi => Some((RANGE, 0.8)),
        Genre::Eldritch => Some((CHAOS, 1.0)),
        Genre::PostApoc => Some((STEALTH, 0.4)),
        Genre::Fantasy | Genre::Retro => None,
    }
}

pub fn behavior_vector(temperament: Temperament, genre: Genre) -> BehaviorVector {
    let mut vector = [0.0; BEHAVIOR_DIMENSIONS];

    let (dim, weight) = temperament_contribution(temperament);
    vector[dim] += weight;

    if let Some((dim, weight)) = genre_contribution(genre) {
        vector[dim] += weight;
    }

    vector
}
