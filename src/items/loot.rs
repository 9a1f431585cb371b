//! Drops from defeated mobs
//!
//! Each drop source is an independent trial; a boss can drop material, gear
//! and a tome from the same kill.

use rand::Rng;

use crate::catalog::{ContentCatalog, MobDefinition};
use crate::core::config::LootConfig;
use crate::core::types::{Rank, Rarity};
use crate::items::factory::ItemFactory;
use crate::items::item::Item;

pub const TOME_RANK: Rank = Rank::S;
pub const TOME_RARITY: Rarity = Rarity::Legendary;
pub const TOME_BASE_POWER: f64 = 500.0;

pub struct LootTable<'a> {
    factory: ItemFactory<'a>,
    config: &'a LootConfig,
}

impl<'a> LootTable<'a> {
    pub fn new(catalog: &'a ContentCatalog, config: &'a LootConfig) -> Self {
        Self {
            factory: ItemFactory::new(catalog),
            config,
        }
    }

    pub fn generate_loot<R: Rng + ?Sized>(
        &self,
        mob: &MobDefinition,
        magic_find: f64,
        rng: &mut R,
    ) -> Vec<Item> {
        let mut drops = Vec::new();

        if mob.has_tag("biological") && roll(rng, self.config.material_chance * magic_find) {
            drops.extend(self.factory.create_item(Some(Rank::F), false, rng));
        }

        let gear_chance = if mob.has_tag("boss") {
            self.config.boss_gear_chance
        } else if mob.has_tag("elite") {
            self.config.elite_gear_chance
        } else {
            self.config.gear_chance
        };
        if roll(rng, gear_chance * magic_find) {
            drops.extend(self.factory.create_item(Some(mob.rank), false, rng));
        }

        if (mob.has_tag("boss") || mob.has_tag("god")) && roll(rng, self.config.tome_chance) {
            drops.extend(self.tome(mob, rng));
        }

        if !drops.is_empty() {
            tracing::debug!(mob = %mob.id, count = drops.len(), "Loot rolled");
        }
        drops
    }

    /// An S-rank roll renamed and forced to the tome's rarity and power
    fn tome<R: Rng + ?Sized>(&self, mob: &MobDefinition, rng: &mut R) -> Option<Item> {
        let mut item = self.factory.create_item(Some(TOME_RANK), false, rng)?;
        item.template_id = "tome".to_string();
        item.name = format!("Tome of {}", mob.name);
        item.description = "Contains forbidden knowledge.".to_string();
        item.rank = TOME_RANK;
        item.rarity = TOME_RARITY;
        item.base_item_power = TOME_BASE_POWER;
        item.item_power = item.expected_power();
        Some(item)
    }
}

/// Bernoulli trial tolerant of chances outside `[0, 1]`
fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.gen::<f64>() < chance
}
