//! Item minting: template, rarity, quality, affixes, power, name
//!
//! Minting is a live gameplay event, so the factory draws from whatever
//! `Rng` the caller hands it rather than the world seed.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::catalog::{AffixDefinition, AffixKind, ContentCatalog, ItemTemplate};
use crate::core::types::{Rank, Rarity};
use crate::items::item::{item_power, round_stat, Item, RolledAffix, MAX_QUALITY};

/// Cumulative rarity thresholds: a roll above the value lands in the tier
pub const LEGENDARY_ROLL: f64 = 0.99;
pub const EPIC_ROLL: f64 = 0.95;
pub const RARE_ROLL: f64 = 0.85;
pub const UNCOMMON_ROLL: f64 = 0.60;

/// Chance an uncommon item carries both a prefix and a suffix
pub const UNCOMMON_DOUBLE_CHANCE: f64 = 0.2;

/// Quality beyond which the name gains "Broken"/"Superior"
pub const QUALITY_NAME_THRESHOLD: f64 = 0.15;
/// Quality beyond which the flavor text mentions condition
pub const QUALITY_FLAVOR_THRESHOLD: f64 = 0.10;

/// Prefix and suffix slot counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffixSlots {
    pub prefixes: usize,
    pub suffixes: usize,
}

impl AffixSlots {
    pub fn total(&self) -> usize {
        self.prefixes + self.suffixes
    }
}

pub fn roll_rarity<R: Rng + ?Sized>(rng: &mut R) -> Rarity {
    let roll: f64 = rng.gen();
    if roll > LEGENDARY_ROLL {
        Rarity::Legendary
    } else if roll > EPIC_ROLL {
        Rarity::Epic
    } else if roll > RARE_ROLL {
        Rarity::Rare
    } else if roll > UNCOMMON_ROLL {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

pub fn roll_quality<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(-MAX_QUALITY..=MAX_QUALITY)
}

/// Slot budget for a rarity tier
pub fn roll_affix_slots<R: Rng + ?Sized>(rarity: Rarity, rng: &mut R) -> AffixSlots {
    let (prefixes, suffixes) = match rarity {
        Rarity::Scrap | Rarity::Common => (0, 0),
        Rarity::Uncommon => {
            if rng.gen_bool(UNCOMMON_DOUBLE_CHANCE) {
                (1, 1)
            } else if rng.gen_bool(0.5) {
                (1, 0)
            } else {
                (0, 1)
            }
        }
        Rarity::Rare => (rng.gen_range(1..=2), rng.gen_range(1..=2)),
        Rarity::Epic => (2, 2),
        Rarity::Legendary | Rarity::Artifact => (3, 3),
    };
    AffixSlots { prefixes, suffixes }
}

pub struct ItemFactory<'a> {
    catalog: &'a ContentCatalog,
}

impl<'a> ItemFactory<'a> {
    pub fn new(catalog: &'a ContentCatalog) -> Self {
        Self { catalog }
    }

    /// Mint one item, optionally constrained to a template rank
    ///
    /// Falls back to the whole template list when no template has the
    /// requested rank. Returns `None` only for a catalog without templates.
    pub fn create_item<R: Rng + ?Sized>(
        &self,
        target_rank: Option<Rank>,
        identified: bool,
        rng: &mut R,
    ) -> Option<Item> {
        let template = self.pick_template(target_rank, rng)?;
        let rarity = roll_rarity(rng);
        let quality = roll_quality(rng);
        Some(self.build(template, rarity, quality, identified, rng))
    }

    /// Mint from a fixed template, rarity and quality
    pub fn build<R: Rng + ?Sized>(
        &self,
        template: &ItemTemplate,
        rarity: Rarity,
        quality: f64,
        identified: bool,
        rng: &mut R,
    ) -> Item {
        let mut stats = roll_implicits(template, quality, rng);

        let slots = roll_affix_slots(rarity, rng);
        let mut affixes: Vec<RolledAffix> = Vec::with_capacity(slots.total());
        for (kind, count) in [
            (AffixKind::Prefix, slots.prefixes),
            (AffixKind::Suffix, slots.suffixes),
        ] {
            for _ in 0..count {
                match self.pick_affix(template, kind, &affixes, rng) {
                    Some(def) => affixes.push(roll_affix(def, template.rank, rng)),
                    None => tracing::warn!(
                        template = %template.id,
                        kind = ?kind,
                        "No eligible affix left, slot skipped"
                    ),
                }
            }
        }

        for affix in &affixes {
            for (stat, value) in &affix.stats {
                *stats.entry(stat.clone()).or_insert(0.0) += value;
            }
        }
        stats.insert("durability".to_string(), 100.0);
        stats.insert("max_durability".to_string(), 100.0);
        stats.insert("weight".to_string(), 5.0);

        let name = compose_name(template, quality, &affixes);
        let item = Item {
            id: Uuid::new_v4(),
            template_id: template.id.clone(),
            description: flavor_text(rarity, quality),
            name,
            rank: template.rank,
            rarity,
            quality,
            base_item_power: template.base_item_power,
            item_power: item_power(template, template.rank, rarity, quality),
            affixes,
            stats,
            identified,
        };
        tracing::debug!(
            name = %item.name,
            rarity = item.rarity.label(),
            power = item.item_power,
            "Item minted"
        );
        item
    }

    fn pick_template<R: Rng + ?Sized>(
        &self,
        target_rank: Option<Rank>,
        rng: &mut R,
    ) -> Option<&'a ItemTemplate> {
        let catalog: &'a ContentCatalog = self.catalog;
        if let Some(rank) = target_rank {
            let ranked = catalog.templates_for_rank(rank);
            if let Some(template) = ranked.choose(rng) {
                return Some(*template);
            }
            tracing::warn!(rank = ?rank, "No template at rank, using full template list");
        }
        catalog.item_templates.choose(rng)
    }

    fn pick_affix<R: Rng + ?Sized>(
        &self,
        template: &ItemTemplate,
        kind: AffixKind,
        applied: &[RolledAffix],
        rng: &mut R,
    ) -> Option<&'a AffixDefinition> {
        let catalog: &'a ContentCatalog = self.catalog;
        let eligible: Vec<&AffixDefinition> = catalog
            .affixes
            .iter()
            .filter(|a| a.kind == kind && a.fits(template))
            .filter(|a| applied.iter().all(|r| r.definition_id != a.id))
            .collect();
        eligible.choose(rng).copied()
    }
}

fn roll_implicits<R: Rng + ?Sized>(
    template: &ItemTemplate,
    quality: f64,
    rng: &mut R,
) -> BTreeMap<String, f64> {
    template
        .implicits
        .iter()
        .map(|implicit| {
            let base = roll_between(implicit.min, implicit.max, rng);
            (implicit.stat.clone(), round_stat(base * (1.0 + quality)))
        })
        .collect()
}

fn roll_affix<R: Rng + ?Sized>(def: &AffixDefinition, rank: Rank, rng: &mut R) -> RolledAffix {
    let stats = def
        .stat_modifiers
        .iter()
        .map(|(stat, (lo, hi))| {
            let base = roll_between(*lo, *hi, rng);
            (stat.clone(), round_stat(base * rank.item_power_multiplier()))
        })
        .collect();
    RolledAffix {
        definition_id: def.id.clone(),
        name: def.name_template.clone(),
        kind: def.kind,
        stats,
    }
}

fn roll_between<R: Rng + ?Sized>(lo: f64, hi: f64, rng: &mut R) -> f64 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

fn compose_name(template: &ItemTemplate, quality: f64, affixes: &[RolledAffix]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(4);
    if quality < -QUALITY_NAME_THRESHOLD {
        parts.push("Broken");
    } else if quality > QUALITY_NAME_THRESHOLD {
        parts.push("Superior");
    }
    if let Some(prefix) = affixes.iter().find(|a| a.kind == AffixKind::Prefix) {
        parts.push(&prefix.name);
    }
    parts.push(&template.name);
    if let Some(suffix) = affixes.iter().find(|a| a.kind == AffixKind::Suffix) {
        parts.push(&suffix.name);
    }
    parts.join(" ")
}

fn flavor_text(rarity: Rarity, quality: f64) -> String {
    let mut text = String::new();
    if quality < -QUALITY_FLAVOR_THRESHOLD {
        text.push_str("This item has seen better days. Rust pits the surface. ");
    } else if quality > QUALITY_FLAVOR_THRESHOLD {
        text.push_str("The craftsmanship is exceptional. It hums with faint energy. ");
    }
    text.push_str(&format!(
        "A {} artifact recovered from the simulation layer.",
        rarity.label()
    ));
    text
}
