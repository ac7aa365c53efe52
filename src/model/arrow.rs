use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoringError;

/// Round names containing this marker score on the five-zone face.
pub const FIVE_ZONE_ROUND_MARKER: &str = "worcester";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoringSystem {
    /// X, 10..1, M
    TenZone,
    /// 5..1, M
    FiveZone,
}

impl ScoringSystem {
    #[must_use]
    pub fn for_round(round_name: &str) -> Self {
        if round_name.to_lowercase().contains(FIVE_ZONE_ROUND_MARKER) {
            Self::FiveZone
        } else {
            Self::TenZone
        }
    }

    #[must_use]
    pub fn max_ring(self) -> u8 {
        match self {
            Self::TenZone => 10,
            Self::FiveZone => 5,
        }
    }
}

/// A single recorded score token. Serialized as `"X"`, `"10"`..`"1"` or `"M"`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum ArrowValue {
    InnerTen,
    Ring(u8),
    Miss,
}

impl ArrowValue {
    #[must_use]
    pub fn is_miss(self) -> bool {
        matches!(self, Self::Miss)
    }
}

impl fmt::Display for ArrowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InnerTen => write!(f, "X"),
            Self::Ring(v) => write!(f, "{v}"),
            Self::Miss => write!(f, "M"),
        }
    }
}

impl FromStr for ArrowValue {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Self::InnerTen),
            "M" | "m" => Ok(Self::Miss),
            other => match other.parse::<u8>() {
                Ok(v) if (1..=10).contains(&v) => Ok(Self::Ring(v)),
                _ => Err(ScoringError::Parse(format!("'{other}' is not an arrow value"))),
            },
        }
    }
}

impl TryFrom<String> for ArrowValue {
    type Error = ScoringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArrowValue> for String {
    fn from(value: ArrowValue) -> Self {
        value.to_string()
    }
}

/// Button order for the round: highest first, Miss last.
#[must_use]
pub fn legal_values(round_name: &str, _is_triple_spot: bool) -> Vec<ArrowValue> {
    legal_values_for(ScoringSystem::for_round(round_name))
}

#[must_use]
pub fn legal_values_for(system: ScoringSystem) -> Vec<ArrowValue> {
    let mut values = Vec::with_capacity(12);
    if system == ScoringSystem::TenZone {
        values.push(ArrowValue::InnerTen);
    }
    values.extend((1..=system.max_ring()).rev().map(ArrowValue::Ring));
    values.push(ArrowValue::Miss);
    values
}

#[must_use]
pub fn numeric_value(value: ArrowValue) -> u32 {
    match value {
        ArrowValue::InnerTen => 10,
        ArrowValue::Ring(v) => u32::from(v),
        ArrowValue::Miss => 0,
    }
}

#[must_use]
pub fn is_gold(value: ArrowValue, system: ScoringSystem) -> bool {
    match system {
        ScoringSystem::TenZone => matches!(value, ArrowValue::InnerTen | ArrowValue::Ring(10)),
        ScoringSystem::FiveZone => false,
    }
}

#[must_use]
pub fn is_legal(value: ArrowValue, system: ScoringSystem) -> bool {
    match value {
        ArrowValue::InnerTen => system == ScoringSystem::TenZone,
        ArrowValue::Ring(v) => (1..=system.max_ring()).contains(&v),
        ArrowValue::Miss => true,
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValueCategory {
    Gold,
    Red,
    Blue,
    Black,
    White,
    Miss,
}

impl ValueCategory {
    #[must_use]
    pub fn colour(self) -> [u8; 3] {
        match self {
            Self::Gold => [0xFF, 0xE5, 0x52],
            Self::Red => [0xF6, 0x50, 0x58],
            Self::Blue => [0x00, 0xB4, 0xE4],
            Self::Black => [0x22, 0x22, 0x22],
            Self::White => [0xFA, 0xFA, 0xFA],
            Self::Miss => [0x3C, 0x8D, 0x2F],
        }
    }

    #[must_use]
    pub fn css_hex(self) -> String {
        let [r, g, b] = self.colour();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Text colour that stays readable on top of `colour()`.
    #[must_use]
    pub fn ink(self) -> [u8; 3] {
        match self {
            Self::Gold | Self::White => [0x11, 0x11, 0x11],
            _ => [0xFF, 0xFF, 0xFF],
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Gold => "arrow-gold",
            Self::Red => "arrow-red",
            Self::Blue => "arrow-blue",
            Self::Black => "arrow-black",
            Self::White => "arrow-white",
            Self::Miss => "arrow-miss",
        }
    }
}

#[must_use]
pub fn category(value: ArrowValue, system: ScoringSystem) -> ValueCategory {
    match (system, value) {
        (_, ArrowValue::Miss) => ValueCategory::Miss,
        (ScoringSystem::FiveZone, ArrowValue::Ring(5)) => ValueCategory::White,
        (ScoringSystem::FiveZone, _) => ValueCategory::Black,
        (ScoringSystem::TenZone, ArrowValue::InnerTen | ArrowValue::Ring(9 | 10)) => {
            ValueCategory::Gold
        }
        (ScoringSystem::TenZone, ArrowValue::Ring(7 | 8)) => ValueCategory::Red,
        (ScoringSystem::TenZone, ArrowValue::Ring(5 | 6)) => ValueCategory::Blue,
        (ScoringSystem::TenZone, ArrowValue::Ring(3 | 4)) => ValueCategory::Black,
        (ScoringSystem::TenZone, ArrowValue::Ring(_)) => ValueCategory::White,
    }
}

/// Position of an impact inside the bounding box of the face it hit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub face: u8,
}

impl Placement {
    /// Returns `None` when a coordinate leaves 0..=100 or a single-spot placement names a face other than 0.
    #[must_use]
    pub fn new(x: f32, y: f32, face: u8, is_triple_spot: bool) -> Option<Self> {
        let max_face = if is_triple_spot { 2 } else { 0 };
        let in_range = |v: f32| (0.0..=100.0).contains(&v);
        if in_range(x) && in_range(y) && face <= max_face {
            Some(Self { x, y, face })
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PlacedArrow {
    pub value: ArrowValue,
    pub placement: Placement,
}

/// What an end stores: the score plus, when the face was used, where it landed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
    pub value: ArrowValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

impl Arrow {
    #[must_use]
    pub fn scored(value: ArrowValue) -> Self {
        Self {
            value,
            placement: None,
        }
    }
}

impl From<ArrowValue> for Arrow {
    fn from(value: ArrowValue) -> Self {
        Self::scored(value)
    }
}

impl From<PlacedArrow> for Arrow {
    fn from(placed: PlacedArrow) -> Self {
        Self {
            value: placed.value,
            placement: Some(placed.placement),
        }
    }
}
