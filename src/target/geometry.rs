use serde::{Deserialize, Serialize};

use crate::model::{ArrowValue, PlacedArrow, Placement, RoundConfig, ScoringSystem};

/// Faces are drawn in a local 0..100 square, centred, touching the edges.
pub const FACE_CENTRE: f32 = 50.0;
pub const OUTER_RADIUS: f32 = 50.0;

const STANDARD_RINGS: [ArrowValue; 11] = [
    ArrowValue::Ring(1),
    ArrowValue::Ring(2),
    ArrowValue::Ring(3),
    ArrowValue::Ring(4),
    ArrowValue::Ring(5),
    ArrowValue::Ring(6),
    ArrowValue::Ring(7),
    ArrowValue::Ring(8),
    ArrowValue::Ring(9),
    ArrowValue::Ring(10),
    ArrowValue::InnerTen,
];

const TRIPLE_SPOT_RINGS: [ArrowValue; 6] = [
    ArrowValue::Ring(6),
    ArrowValue::Ring(7),
    ArrowValue::Ring(8),
    ArrowValue::Ring(9),
    ArrowValue::Ring(10),
    ArrowValue::InnerTen,
];

const FIVE_ZONE_RINGS: [ArrowValue; 5] = [
    ArrowValue::Ring(1),
    ArrowValue::Ring(2),
    ArrowValue::Ring(3),
    ArrowValue::Ring(4),
    ArrowValue::Ring(5),
];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FaceKind {
    Standard,
    TripleSpot,
    FiveZone,
}

impl FaceKind {
    /// Ring values from the outermost ring inwards.
    #[must_use]
    pub fn rings(self) -> &'static [ArrowValue] {
        match self {
            Self::Standard => &STANDARD_RINGS,
            Self::TripleSpot => &TRIPLE_SPOT_RINGS,
            Self::FiveZone => &FIVE_ZONE_RINGS,
        }
    }

    #[must_use]
    pub fn face_count(self) -> u8 {
        match self {
            Self::TripleSpot => 3,
            Self::Standard | Self::FiveZone => 1,
        }
    }

    #[must_use]
    pub fn system(self) -> ScoringSystem {
        match self {
            Self::FiveZone => ScoringSystem::FiveZone,
            Self::Standard | Self::TripleSpot => ScoringSystem::TenZone,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetFace {
    pub kind: FaceKind,
}

impl TargetFace {
    #[must_use]
    pub fn new(kind: FaceKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub fn for_round(config: &RoundConfig) -> Self {
        let kind = match (config.scoring_system(), config.is_triple_spot) {
            (ScoringSystem::FiveZone, _) => FaceKind::FiveZone,
            (ScoringSystem::TenZone, true) => FaceKind::TripleSpot,
            (ScoringSystem::TenZone, false) => FaceKind::Standard,
        };
        Self { kind }
    }

    #[must_use]
    pub fn is_triple_spot(&self) -> bool {
        self.kind == FaceKind::TripleSpot
    }

    #[must_use]
    pub fn ring_count(&self) -> usize {
        self.kind.rings().len()
    }

    /// Outer radius of ring `ring_index`, where 0 is the outermost ring.
    #[must_use]
    pub fn ring_outer_radius(&self, ring_index: usize) -> f32 {
        let count = self.ring_count() as f32;
        OUTER_RADIUS - ring_index as f32 * (OUTER_RADIUS / count)
    }

    /// A distance equal to a ring's outer radius belongs to that ring (inclusive-inner).
    #[must_use]
    pub fn value_at_distance(&self, distance: f32) -> ArrowValue {
        let rings = self.kind.rings();
        (0..rings.len())
            .rev()
            .find(|&i| distance <= self.ring_outer_radius(i))
            .map_or(ArrowValue::Miss, |i| rings[i])
    }

    /// Maps a point in the whole face bounding box to the face it falls on and its face-local coordinates.
    ///
    /// Triple-spot faces are stacked vertically, so the bounding box is one face wide and three tall.
    #[must_use]
    pub fn locate(&self, x_pct: f32, y_pct: f32) -> Option<(u8, f32, f32)> {
        let in_box = |v: f32| (0.0..=100.0).contains(&v);
        if !in_box(x_pct) || !in_box(y_pct) {
            return None;
        }
        let faces = self.kind.face_count();
        if faces == 1 {
            return Some((0, x_pct, y_pct));
        }
        let band = 100.0 / f32::from(faces);
        let face = ((y_pct / band) as u8).min(faces - 1);
        let local_y = ((y_pct - f32::from(face) * band) * f32::from(faces)).clamp(0.0, 100.0);
        Some((face, x_pct, local_y))
    }

    /// Resolves a tap given relative to the whole target bounding box. `None` means the tap is ignored.
    #[must_use]
    pub fn resolve(&self, x_pct: f32, y_pct: f32) -> Option<PlacedArrow> {
        let (face, x, y) = self.locate(x_pct, y_pct)?;
        self.resolve_on_face(x, y, face)
    }

    /// Resolves face-local coordinates on an already known face.
    #[must_use]
    pub fn resolve_on_face(&self, x_pct: f32, y_pct: f32, face_index: u8) -> Option<PlacedArrow> {
        let placement = Placement::new(x_pct, y_pct, face_index, self.is_triple_spot())?;
        let distance = (x_pct - FACE_CENTRE).hypot(y_pct - FACE_CENTRE);
        Some(PlacedArrow {
            value: self.value_at_distance(distance),
            placement,
        })
    }
}
