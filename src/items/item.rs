//! Minted item instances

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::catalog::{AffixKind, ItemTemplate};
use crate::core::types::{Rank, Rarity};

/// Quality is rolled uniformly in `[-MAX_QUALITY, MAX_QUALITY]`
pub const MAX_QUALITY: f64 = 0.2;

/// An affix as it landed on a specific item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolledAffix {
    pub definition_id: String,
    pub name: String,
    pub kind: AffixKind,
    pub stats: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub template_id: String,
    pub name: String,
    pub description: String,
    pub rank: Rank,
    pub rarity: Rarity,
    pub quality: f64,
    /// Template base power the item was minted from
    pub base_item_power: f64,
    pub item_power: u32,
    pub affixes: Vec<RolledAffix>,
    pub stats: BTreeMap<String, f64>,
    pub identified: bool,
}

impl Item {
    /// Power recomputed from the stored inputs
    pub fn expected_power(&self) -> u32 {
        power_from_base(self.base_item_power, self.rank, self.rarity, self.quality)
    }

    /// True if the stored power agrees with the formula
    pub fn power_is_consistent(&self) -> bool {
        self.item_power == self.expected_power()
    }

    /// True if no two affixes share a definition
    pub fn has_unique_affixes(&self) -> bool {
        self.affixes
            .iter()
            .enumerate()
            .all(|(i, a)| self.affixes[..i].iter().all(|b| b.definition_id != a.definition_id))
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &RolledAffix> {
        self.affixes.iter().filter(|a| a.kind == AffixKind::Prefix)
    }

    pub fn suffixes(&self) -> impl Iterator<Item = &RolledAffix> {
        self.affixes.iter().filter(|a| a.kind == AffixKind::Suffix)
    }

    pub fn identify(&mut self) {
        self.identified = true;
    }
}

/// `floor(base * rank_mult * rarity_mult * (1 + quality))`
pub fn item_power(template: &ItemTemplate, rank: Rank, rarity: Rarity, quality: f64) -> u32 {
    power_from_base(template.base_item_power, rank, rarity, quality)
}

fn power_from_base(base: f64, rank: Rank, rarity: Rarity, quality: f64) -> u32 {
    let raw =
        base * rank.item_power_multiplier() * rarity.item_power_multiplier() * (1.0 + quality);
    raw.max(0.0).floor() as u32
}

/// Whole numbers above 1, two decimals below
pub(crate) fn round_stat(value: f64) -> f64 {
    if value.abs() > 1.0 {
        value.round()
    } else {
        (value * 100.0).round() / 100.0
    }
}
