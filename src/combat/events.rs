//! Combat events returned to the caller for side effects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::{EntityId, Vec2};
use crate::items::Item;

/// Items lying on the ground at a mob's last position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootDrop {
    pub id: Uuid,
    pub position: Vec2,
    pub items: Vec<Item>,
}

impl LootDrop {
    pub fn new(position: Vec2, items: Vec<Item>) -> Self {
        Self { id: Uuid::new_v4(), position, items }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombatEvent {
    Hit {
        entity_id: EntityId,
        damage: f32,
        position: Vec2,
    },
    Kill {
        entity_id: EntityId,
    },
    LootSpawn {
        drop_id: Uuid,
        position: Vec2,
        item_count: usize,
    },
    PlayerDamage {
        entity_id: EntityId,
        damage: f32,
    },
    /// A mob bullet was blocked by a player melee swing
    Deflect {
        position: Vec2,
    },
}

/// Ordered events of one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatEventLog {
    pub events: Vec<CombatEvent>,
}

impl CombatEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, other: CombatEventLog) {
        self.events.extend(other.events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    pub fn kills(&self) -> usize {
        self.iter().filter(|e| matches!(e, CombatEvent::Kill { .. })).count()
    }

    pub fn hits(&self) -> usize {
        self.iter().filter(|e| matches!(e, CombatEvent::Hit { .. })).count()
    }
}
