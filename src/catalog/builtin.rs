//! Built-in content set

use std::collections::BTreeMap;

use super::{
    AffixDefinition, AffixKind, ImplicitStat, ItemSlot, ItemTemplate, MobDefinition, MobSize,
    ResourceDefinition,
};
use crate::ai::{AwarenessProfile, MobObjective, Temperament};
use crate::core::types::{Genre, Rank};

struct MobSpec {
    id: &'static str,
    name: &'static str,
    genre: Genre,
    tags: &'static [&'static str],
    rank: Rank,
    size: MobSize,
    health: f32,
    damage: f32,
    speed: f32,
    objective: MobObjective,
    temperament: Temperament,
    awareness: AwarenessProfile,
}

impl MobSpec {
    fn build(self) -> MobDefinition {
        MobDefinition {
            id: self.id.to_string(),
            name: self.name.to_string(),
            genre: self.genre,
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            rank: self.rank,
            size: self.size,
            base_health: self.health,
            base_damage: self.damage,
            speed: self.speed,
            view_range: self.awareness.sight_range,
            objective: self.objective,
            temperament: self.temperament,
            awareness: self.awareness,
        }
    }
}

fn eyes(sight: f32, hearing: f32, light: f32, blind: f32) -> AwarenessProfile {
    AwarenessProfile {
        sight_range: sight,
        hearing_range: hearing,
        light_dependence: light,
        proximity_sense: blind,
        can_alert_others: false,
        is_industrial: false,
    }
}

fn industrial(sight: f32) -> AwarenessProfile {
    AwarenessProfile {
        is_industrial: true,
        ..eyes(sight, 30.0, 0.0, 2.0)
    }
}

pub(super) fn mobs() -> Vec<MobDefinition> {
    use Genre::*;
    use MobObjective::*;
    use Temperament::*;

    vec![
        // Fantasy
        MobSpec {
            id: "goblin_grunt", name: "Goblin Grunt", genre: Fantasy,
            tags: &["grunt", "biological"], rank: Rank::F, size: MobSize::Tiny,
            health: 40.0, damage: 6.0, speed: 4.0,
            objective: KillPlayer, temperament: Coward, awareness: eyes(15.0, 40.0, 0.6, 2.0),
        },
        MobSpec {
            id: "orc_warrior", name: "Orc Warrior", genre: Fantasy,
            tags: &["biological", "elite"], rank: Rank::D, size: MobSize::Medium,
            health: 120.0, damage: 14.0, speed: 3.5,
            objective: KillPlayer, temperament: Aggressive, awareness: eyes(18.0, 35.0, 0.5, 3.0),
        },
        MobSpec {
            id: "treasure_wyrm", name: "Treasure Wyrm", genre: Fantasy,
            tags: &["biological", "elite"], rank: Rank::B, size: MobSize::Large,
            health: 300.0, damage: 22.0, speed: 3.0,
            objective: Hoard, temperament: Territorial, awareness: eyes(20.0, 50.0, 0.2, 4.0),
        },
        MobSpec {
            id: "lich_king", name: "Lich King", genre: Fantasy,
            tags: &["boss", "undead"], rank: Rank::S, size: MobSize::Gigantic,
            health: 900.0, damage: 40.0, speed: 2.5,
            objective: ProtectAsset, temperament: Territorial,
            awareness: eyes(25.0, 60.0, 0.0, 5.0),
        },
        // Sci-fi
        MobSpec {
            id: "security_drone", name: "Security Drone", genre: SciFi,
            tags: &["grunt", "mechanical"], rank: Rank::F, size: MobSize::Tiny,
            health: 30.0, damage: 5.0, speed: 5.0,
            objective: KillPlayer, temperament: Aggressive, awareness: eyes(20.0, 20.0, 0.0, 1.5),
        },
        MobSpec {
            id: "plasma_trooper", name: "Plasma Trooper", genre: SciFi,
            tags: &["biological"], rank: Rank::D, size: MobSize::Medium,
            health: 90.0, damage: 12.0, speed: 4.0,
            objective: KillPlayer, temperament: Opportunist, awareness: eyes(22.0, 30.0, 0.3, 2.0),
        },
        MobSpec {
            id: "drone_fabricator", name: "Drone Fabricator", genre: SciFi,
            tags: &["mechanical", "elite"], rank: Rank::C, size: MobSize::Large,
            health: 250.0, damage: 8.0, speed: 0.0,
            objective: Reproduce, temperament: Hivemind, awareness: industrial(15.0),
        },
        MobSpec {
            id: "core_overmind", name: "Core Overmind", genre: SciFi,
            tags: &["boss", "god", "mechanical"], rank: Rank::S, size: MobSize::Colossal,
            health: 1200.0, damage: 35.0, speed: 1.0,
            objective: Survive, temperament: Hivemind, awareness: eyes(30.0, 40.0, 0.0, 6.0),
        },
        // Post-apocalyptic
        MobSpec {
            id: "raider", name: "Raider", genre: PostApoc,
            tags: &["grunt", "biological"], rank: Rank::F, size: MobSize::Medium,
            health: 50.0, damage: 8.0, speed: 4.5,
            objective: KillPlayer, temperament: Aggressive, awareness: eyes(16.0, 45.0, 0.7, 2.0),
        },
        MobSpec {
            id: "scrap_hoarder", name: "Scrap Hoarder", genre: PostApoc,
            tags: &["biological"], rank: Rank::E, size: MobSize::Medium,
            health: 70.0, damage: 7.0, speed: 3.5,
            objective: Hoard, temperament: Coward, awareness: industrial(10.0),
        },
        MobSpec {
            id: "mutant_hound", name: "Mutant Hound", genre: PostApoc,
            tags: &["biological", "elite"], rank: Rank::C, size: MobSize::Medium,
            health: 140.0, damage: 16.0, speed: 6.0,
            objective: KillPlayer, temperament: Berserker, awareness: eyes(14.0, 70.0, 0.1, 4.0),
        },
        MobSpec {
            id: "wasteland_warlord", name: "Wasteland Warlord", genre: PostApoc,
            tags: &["boss", "biological"], rank: Rank::A, size: MobSize::Large,
            health: 700.0, damage: 30.0, speed: 3.0,
            objective: KillPlayer, temperament: Aggressive, awareness: eyes(24.0, 50.0, 0.4, 3.0),
        },
        // Eldritch
        MobSpec {
            id: "whisperer", name: "Whisperer", genre: Eldritch,
            tags: &["grunt"], rank: Rank::F, size: MobSize::Tiny,
            health: 35.0, damage: 9.0, speed: 3.0,
            objective: Witness, temperament: Passive, awareness: eyes(12.0, 80.0, 0.0, 6.0),
        },
        MobSpec {
            id: "flesh_weaver", name: "Flesh Weaver", genre: Eldritch,
            tags: &["biological", "elite"], rank: Rank::D, size: MobSize::Large,
            health: 160.0, damage: 18.0, speed: 2.5,
            objective: Feed, temperament: Opportunist, awareness: eyes(10.0, 60.0, 0.0, 5.0),
        },
        MobSpec {
            id: "void_herald", name: "Void Herald", genre: Eldritch,
            tags: &["boss", "god"], rank: Rank::S, size: MobSize::Colossal,
            health: 1500.0, damage: 45.0, speed: 2.0,
            objective: KillPlayer, temperament: Berserker, awareness: eyes(30.0, 90.0, 0.0, 8.0),
        },
        // Retro
        MobSpec {
            id: "pixel_ghost", name: "Pixel Ghost", genre: Retro,
            tags: &["grunt"], rank: Rank::F, size: MobSize::Tiny,
            health: 25.0, damage: 5.0, speed: 4.0,
            objective: KillPlayer, temperament: Aggressive, awareness: eyes(18.0, 0.0, 0.0, 2.0),
        },
    ]
    .into_iter()
    .map(MobSpec::build)
    .collect()
}

pub(super) fn resources() -> Vec<ResourceDefinition> {
    let entries: [(&str, &str, Genre, Rank, &[&str]); 6] = [
        ("iron_vein", "Iron Vein", Genre::Fantasy, Rank::F, &["ore"]),
        ("moonpetal", "Moonpetal", Genre::Fantasy, Rank::D, &["herb"]),
        ("plasteel_cache", "Plasteel Cache", Genre::SciFi, Rank::E, &["salvage"]),
        ("scrap_heap", "Scrap Heap", Genre::PostApoc, Rank::F, &["salvage"]),
        ("fuel_drum", "Fuel Drum", Genre::PostApoc, Rank::E, &["volatile"]),
        ("void_crystal", "Void Crystal", Genre::Eldritch, Rank::C, &["crystal"]),
    ];

    entries
        .iter()
        .map(|(id, name, genre, rank, tags)| ResourceDefinition {
            id: id.to_string(),
            name: name.to_string(),
            genre: *genre,
            rank: *rank,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

fn template(
    id: &str,
    name: &str,
    slot: ItemSlot,
    rank: Rank,
    tags: &[&str],
    implicits: Vec<ImplicitStat>,
    base_item_power: f64,
) -> ItemTemplate {
    ItemTemplate {
        id: id.to_string(),
        name: name.to_string(),
        slot,
        rank,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        implicits,
        base_item_power,
    }
}

pub(super) fn item_templates() -> Vec<ItemTemplate> {
    use ItemSlot::*;

    vec![
        template(
            "rusty_blade", "Rusty Blade", MainHand, Rank::F,
            &["weapon", "blade", "melee", "physical"],
            vec![ImplicitStat::new("damage", 4.0, 8.0), ImplicitStat::fixed("attack_speed", 1.2)],
            50.0,
        ),
        template(
            "scrap_mail", "Scrap Mail", Chest, Rank::F,
            &["armor", "heavy", "defense"],
            vec![ImplicitStat::new("defense", 5.0, 10.0)],
            45.0,
        ),
        template(
            "hunting_bow", "Hunting Bow", MainHand, Rank::E,
            &["weapon", "ranged", "projectile"],
            vec![ImplicitStat::new("damage", 8.0, 14.0), ImplicitStat::fixed("attack_speed", 0.9)],
            120.0,
        ),
        template(
            "runner_boots", "Runner Boots", Feet, Rank::E,
            &["armor", "light", "boots", "rogue"],
            vec![ImplicitStat::new("evasion_rating", 10.0, 20.0)],
            110.0,
        ),
        template(
            "plasma_pistol", "Plasma Pistol", MainHand, Rank::D,
            &["weapon", "ranged", "energy"],
            vec![ImplicitStat::new("damage", 14.0, 22.0), ImplicitStat::fixed("attack_speed", 1.4)],
            200.0,
        ),
        template(
            "haul_pack", "Haul Pack", Bag, Rank::D,
            &["bag", "generic"],
            vec![ImplicitStat::new("carry_capacity", 10.0, 20.0)],
            150.0,
        ),
        template(
            "war_axe", "War Axe", MainHand, Rank::C,
            &["weapon", "axe", "melee", "physical", "heavy"],
            vec![ImplicitStat::new("damage", 24.0, 36.0), ImplicitStat::fixed("attack_speed", 0.8)],
            280.0,
        ),
        template(
            "warding_charm", "Warding Charm", Accessory, Rank::C,
            &["accessory", "magic"],
            vec![ImplicitStat::new("max_health", 15.0, 30.0)],
            240.0,
        ),
        template(
            "arcane_staff", "Arcane Staff", MainHand, Rank::B,
            &["weapon", "magic", "staff"],
            vec![
                ImplicitStat::new("damage", 30.0, 45.0),
                ImplicitStat::new("intelligence", 5.0, 10.0),
            ],
            360.0,
        ),
        template(
            "plate_cuirass", "Plate Cuirass", Chest, Rank::B,
            &["armor", "heavy", "defense"],
            vec![ImplicitStat::new("defense", 40.0, 60.0)],
            340.0,
        ),
        template(
            "exo_frame", "Exo Frame", Chest, Rank::A,
            &["armor", "heavy", "energy_shield", "energy"],
            vec![
                ImplicitStat::new("defense", 60.0, 80.0),
                ImplicitStat::new("energy_shield", 20.0, 40.0),
            ],
            450.0,
        ),
        template(
            "void_gauntlets", "Void Gauntlets", OffHand, Rank::A,
            &["armor", "gloves", "magic"],
            vec![ImplicitStat::new("accuracy_rating", 40.0, 60.0)],
            430.0,
        ),
        template(
            "singularity_edge", "Singularity Edge", MainHand, Rank::S,
            &["weapon", "blade", "melee", "energy"],
            vec![ImplicitStat::new("damage", 60.0, 90.0), ImplicitStat::fixed("attack_speed", 1.3)],
            550.0,
        ),
    ]
}

fn affix(
    id: &str,
    name_template: &str,
    kind: AffixKind,
    allowed_tags: &[&str],
    stats: &[(&str, f64, f64)],
) -> AffixDefinition {
    AffixDefinition {
        id: id.to_string(),
        name_template: name_template.to_string(),
        kind,
        allowed_tags: allowed_tags.iter().map(|t| t.to_string()).collect(),
        stat_modifiers: stats
            .iter()
            .map(|(stat, lo, hi)| (stat.to_string(), (*lo, *hi)))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub(super) fn affixes() -> Vec<AffixDefinition> {
    use AffixKind::*;

    vec![
        affix(
            "pre_phys_dmg",
            "Sharp",
            Prefix,
            &["blade", "axe", "projectile", "physical"],
            &[("damage", 5.0, 10.0)],
        ),
        affix(
            "pre_spell_dmg",
            "Arcane",
            Prefix,
            &["magic", "staff", "energy"],
            &[("damage", 5.0, 10.0)],
        ),
        affix(
            "pre_attack_speed",
            "Rapid",
            Prefix,
            &["weapon", "offense"],
            &[("attack_speed", 0.05, 0.10)],
        ),
        affix(
            "pre_armor_flat",
            "Reinforced",
            Prefix,
            &["armor", "defense", "heavy"],
            &[("defense", 10.0, 20.0)],
        ),
        affix(
            "pre_evasion",
            "Elusive",
            Prefix,
            &["light", "evasion"],
            &[("evasion_rating", 20.0, 40.0)],
        ),
        affix(
            "pre_capacity",
            "Hauling",
            Prefix,
            &["armor", "bag", "generic"],
            &[("carry_capacity", 5.0, 10.0)],
        ),
        affix(
            "pre_stealth",
            "Silent",
            Prefix,
            &["light", "armor", "boots", "rogue"],
            &[("noise_reduction", 2.0, 5.0)],
        ),
        affix(
            "suf_str",
            "of the Bear",
            Suffix,
            &["melee", "armor", "heavy", "physical"],
            &[("strength", 2.0, 5.0)],
        ),
        affix(
            "suf_dex",
            "of the Falcon",
            Suffix,
            &["ranged", "light", "blade", "projectile"],
            &[("dexterity", 2.0, 5.0)],
        ),
        affix(
            "suf_int",
            "of the Owl",
            Suffix,
            &["magic", "energy_shield", "energy"],
            &[("intelligence", 2.0, 5.0)],
        ),
        affix(
            "suf_vit",
            "of the Whale",
            Suffix,
            &["armor", "heavy", "defense"],
            &[("max_health", 10.0, 30.0)],
        ),
        affix(
            "suf_acc",
            "of True Sight",
            Suffix,
            &["weapon", "gloves", "ranged"],
            &[("accuracy_rating", 20.0, 50.0)],
        ),
        affix(
            "suf_light",
            "of Radiance",
            Suffix,
            &["magic", "energy", "heavy", "accessory"],
            &[("light_radius", 1.0, 2.0)],
        ),
        affix(
            "suf_vacuum",
            "of the Vortex",
            Suffix,
            &["magic", "accessory", "gloves"],
            &[("pickup_radius", 3.0, 6.0)],
        ),
    ]
}
