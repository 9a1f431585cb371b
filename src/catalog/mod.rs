//! Static content catalog: mob, resource, item template and affix definitions
//!
//! The catalog is the only long-lived state the core holds. It is loaded once
//! (from JSON, TOML or the built-in set) and then only read.

mod builtin;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::ai::{behavior_vector, AwarenessProfile, BehaviorVector, MobObjective, Temperament};
use crate::core::error::{CoreError, Result};
use crate::core::types::{Genre, Rank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobSize {
    Tiny,
    Medium,
    Large,
    Gigantic,
    Colossal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobDefinition {
    pub id: String,
    pub name: String,
    pub genre: Genre,
    #[serde(default)]
    pub tags: Vec<String>,
    pub rank: Rank,
    pub size: MobSize,
    pub base_health: f32,
    pub base_damage: f32,
    /// Movement speed in units per second
    pub speed: f32,
    pub view_range: f32,
    #[serde(default)]
    pub objective: MobObjective,
    #[serde(default)]
    pub temperament: Temperament,
    #[serde(default)]
    pub awareness: AwarenessProfile,
}

impl MobDefinition {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Archetype-search vector for this definition
    pub fn behavior_vector(&self) -> BehaviorVector {
        behavior_vector(self.temperament, self.genre)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub id: String,
    pub name: String,
    pub genre: Genre,
    pub rank: Rank,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemSlot {
    Head,
    Chest,
    MainHand,
    OffHand,
    Legs,
    Feet,
    Accessory,
    Bag,
}

/// A stat every instance of a template carries, rolled in `[min, max]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicitStat {
    pub stat: String,
    pub min: f64,
    pub max: f64,
}

impl ImplicitStat {
    pub fn new(stat: &str, min: f64, max: f64) -> Self {
        Self { stat: stat.to_string(), min, max }
    }

    pub fn fixed(stat: &str, value: f64) -> Self {
        Self::new(stat, value, value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: String,
    pub name: String,
    pub slot: ItemSlot,
    pub rank: Rank,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub implicits: Vec<ImplicitStat>,
    pub base_item_power: f64,
}

impl ItemTemplate {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffixKind {
    Prefix,
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixDefinition {
    pub id: String,
    /// Display fragment, e.g. "Sharp" or "of the Bear"
    pub name_template: String,
    pub kind: AffixKind,
    pub allowed_tags: Vec<String>,
    /// Stat id to base `(min, max)`, scaled by item rank when rolled
    pub stat_modifiers: BTreeMap<String, (f64, f64)>,
}

impl AffixDefinition {
    /// True if this affix shares at least one tag with the template
    pub fn fits(&self, template: &ItemTemplate) -> bool {
        self.allowed_tags.iter().any(|tag| template.has_tag(tag))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentCatalog {
    #[serde(default)]
    pub mobs: Vec<MobDefinition>,
    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
    #[serde(default)]
    pub item_templates: Vec<ItemTemplate>,
    #[serde(default)]
    pub affixes: Vec<AffixDefinition>,
    #[serde(skip)]
    mob_index: AHashMap<String, usize>,
}

impl ContentCatalog {
    pub fn new(
        mobs: Vec<MobDefinition>,
        resources: Vec<ResourceDefinition>,
        item_templates: Vec<ItemTemplate>,
        affixes: Vec<AffixDefinition>,
    ) -> Self {
        let mut catalog = Self {
            mobs,
            resources,
            item_templates,
            affixes,
            mob_index: AHashMap::new(),
        };
        catalog.reindex();
        catalog
    }

    /// The default content shipped with the core
    pub fn builtin() -> Self {
        Self::new(
            builtin::mobs(),
            builtin::resources(),
            builtin::item_templates(),
            builtin::affixes(),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: ContentCatalog = serde_json::from_str(json)?;
        catalog.finish()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let catalog: ContentCatalog = toml::from_str(contents)?;
        catalog.finish()
    }

    /// Load from disk; `.toml` files are parsed as TOML, anything else as JSON
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            _ => Self::from_json_str(&contents),
        }
    }

    fn finish(mut self) -> Result<Self> {
        self.reindex();
        self.validate()?;
        tracing::info!(
            mobs = self.mobs.len(),
            resources = self.resources.len(),
            templates = self.item_templates.len(),
            affixes = self.affixes.len(),
            "Content catalog loaded"
        );
        Ok(self)
    }

    fn reindex(&mut self) {
        self.mob_index = self
            .mobs
            .iter()
            .enumerate()
            .map(|(idx, mob)| (mob.id.clone(), idx))
            .collect();
    }

    /// Check ids are unique and ranges are ordered
    pub fn validate(&self) -> Result<()> {
        if self.mobs.is_empty() {
            return Err(CoreError::EmptyCatalog("mobs"));
        }
        if self.item_templates.is_empty() {
            return Err(CoreError::EmptyCatalog("item_templates"));
        }

        check_unique("mob", self.mobs.iter().map(|m| m.id.as_str()))?;
        check_unique("resource", self.resources.iter().map(|r| r.id.as_str()))?;
        check_unique("item template", self.item_templates.iter().map(|t| t.id.as_str()))?;
        check_unique("affix", self.affixes.iter().map(|a| a.id.as_str()))?;

        for template in &self.item_templates {
            if let Some(stat) = template.implicits.iter().find(|s| s.min > s.max) {
                return Err(CoreError::InvalidCatalog(format!(
                    "template {} has inverted range for {}",
                    template.id, stat.stat
                )));
            }
        }
        for affix in &self.affixes {
            if let Some((stat, _)) = affix.stat_modifiers.iter().find(|(_, (lo, hi))| lo > hi) {
                return Err(CoreError::InvalidCatalog(format!(
                    "affix {} has inverted range for {}",
                    affix.id, stat
                )));
            }
        }
        Ok(())
    }

    pub fn mob(&self, id: &str) -> Option<&MobDefinition> {
        self.mob_index.get(id).and_then(|&idx| self.mobs.get(idx))
    }

    pub fn mobs_for_genre(&self, genre: Genre) -> Vec<&MobDefinition> {
        self.mobs.iter().filter(|m| m.genre == genre).collect()
    }

    pub fn resources_for_genre(&self, genre: Genre) -> Vec<&ResourceDefinition> {
        self.resources.iter().filter(|r| r.genre == genre).collect()
    }

    pub fn templates_for_rank(&self, rank: Rank) -> Vec<&ItemTemplate> {
        self.item_templates.iter().filter(|t| t.rank == rank).collect()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &AffixDefinition> {
        self.affixes.iter().filter(|a| a.kind == AffixKind::Prefix)
    }

    pub fn suffixes(&self) -> impl Iterator<Item = &AffixDefinition> {
        self.affixes.iter().filter(|a| a.kind == AffixKind::Suffix)
    }
}

fn check_unique<'a>(section: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CoreError::InvalidCatalog(format!("duplicate {} id: {}", section, id)));
        }
    }
    Ok(())
}
