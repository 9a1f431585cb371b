//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for world entities (mobs and resources)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Stable id for an entity placed by world generation
    ///
    /// Regenerating the same chunk from the same seed yields the same ids.
    pub fn derived(seed_hash: u32, coord: ChunkCoord, index: u32) -> Self {
        let bits = (u128::from(seed_hash) << 96)
            | (u128::from(coord.x as u32) << 64)
            | (u128::from(coord.y as u32) << 32)
            | u128::from(index);
        Self(Uuid::from_u128(bits))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulation time in seconds
pub type SimTime = f64;

/// 2D position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians)
    pub fn from_angle(angle: f32) -> Self {
        Self { x: angle.cos(), y: angle.sin() }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Angle of the vector from `self` to `other`
    pub fn angle_to(&self, other: &Self) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Rotate 90 degrees counter-clockwise
    pub fn perpendicular(&self) -> Self {
        Self { x: -self.y, y: self.x }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

/// Smallest absolute difference between two angles, in [0, PI]
pub fn angle_delta(a: f32, b: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let diff = (a - b).rem_euclid(tau);
    if diff > std::f32::consts::PI {
        tau - diff
    } else {
        diff
    }
}

/// Grid coordinate of a chunk
///
/// Serializes as its `"x,y"` key so coordinate-keyed maps stay valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The `"x,y"` key used by storage and clients
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<ChunkCoord> for String {
    fn from(coord: ChunkCoord) -> String {
        coord.key()
    }
}

impl TryFrom<String> for ChunkCoord {
    type Error = String;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        let (x, y) = key
            .split_once(',')
            .ok_or_else(|| format!("chunk key {:?} is not \"x,y\"", key))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|e| format!("chunk key {:?}: {}", key, e))
        };
        Ok(Self::new(parse(x)?, parse(y)?))
    }
}

/// Universal power tier shared by mobs, items and chunk difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    F,
    E,
    D,
    C,
    B,
    A,
    S,
    SS,
    SSS,
}

impl Rank {
    /// All ranks, weakest first
    pub const ALL: [Rank; 9] = [
        Rank::F,
        Rank::E,
        Rank::D,
        Rank::C,
        Rank::B,
        Rank::A,
        Rank::S,
        Rank::SS,
        Rank::SSS,
    ];

    /// Power ordinal. Comparisons go through this table, not declaration order.
    pub fn ordinal(self) -> u8 {
        match self {
            Rank::F => 0,
            Rank::E => 1,
            Rank::D => 2,
            Rank::C => 3,
            Rank::B => 4,
            Rank::A => 5,
            Rank::S => 6,
            Rank::SS => 7,
            Rank::SSS => 8,
        }
    }

    /// Returns true if this rank is no stronger than `other`
    pub fn at_most(self, other: Rank) -> bool {
        self.ordinal() <= other.ordinal()
    }

    /// Item power and affix roll scaling
    pub fn item_power_multiplier(self) -> f64 {
        match self {
            Rank::F => 1.0,
            Rank::E => 1.25,
            Rank::D => 1.5,
            Rank::C => 2.0,
            Rank::B => 2.5,
            Rank::A => 3.0,
            Rank::S => 3.5,
            Rank::SS => 4.25,
            Rank::SSS => 5.0,
        }
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

/// Item (and chunk) rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    Scrap,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Artifact,
}

impl Rarity {
    pub fn item_power_multiplier(self) -> f64 {
        match self {
            Rarity::Scrap => 0.8,
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.1,
            Rarity::Rare => 1.25,
            Rarity::Epic => 1.45,
            Rarity::Legendary => 1.7,
            Rarity::Artifact => 2.0,
        }
    }

    /// Rare and above fight with extra options
    pub fn is_smart(self) -> bool {
        matches!(
            self,
            Rarity::Rare | Rarity::Epic | Rarity::Legendary | Rarity::Artifact
        )
    }

    pub fn is_boss(self) -> bool {
        matches!(self, Rarity::Legendary | Rarity::Artifact)
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Scrap => "scrap",
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
            Rarity::Artifact => "artifact",
        }
    }
}

/// Thematic style governing mob tactics and catalog filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Fantasy,
    SciFi,
    PostApoc,
    Eldritch,
    Retro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Biome {
    Industrial,
    Ruins,
    Overgrowth,
    Wasteland,
    /// Placeholder shown before a chunk has been scanned
    Unknown,
}

/// How much of a chunk the player has revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanLevel {
    Unknown,
    Basic,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Mob,
    Resource,
}
