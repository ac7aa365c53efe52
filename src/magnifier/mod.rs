//! Press-and-hold precision input. A quick tap scores where it lands; holding freezes a
//! snapshot of the target and pans it under a lens above the pointer until release.

pub mod loupe;

use serde::{Deserialize, Serialize};

use crate::model::{Arrow, PlacedArrow};
use crate::target::{TargetFace, render_target};
use loupe::{LoupeView, Snapshot, lens_centre, loupe_view};

pub const DEFAULT_HOLD_MS: u64 = 60;
pub const DEFAULT_LENS_PX: u32 = 160;
pub const DEFAULT_ZOOM: f32 = 2.5;
pub const DEFAULT_SNAPSHOT_FACE_PX: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnifierSettings {
    pub hold_ms: u64,
    pub lens_px: u32,
    pub zoom: f32,
    pub snapshot_face_px: u32,
}

impl Default for MagnifierSettings {
    fn default() -> Self {
        Self {
            hold_ms: DEFAULT_HOLD_MS,
            lens_px: DEFAULT_LENS_PX,
            zoom: DEFAULT_ZOOM,
            snapshot_face_px: DEFAULT_SNAPSHOT_FACE_PX,
        }
    }
}

/// Positions are percentages of the whole target bounding box.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f32, y: f32, at_ms: u64 },
    Move { x: f32, y: f32, at_ms: u64 },
    Up { x: f32, y: f32, at_ms: u64 },
    Leave { at_ms: u64 },
    Click { x: f32, y: f32, at_ms: u64 },
    /// Hold-timer poll.
    Tick { at_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum GesturePhase {
    Idle,
    Pressed { down_at: u64, x: f32, y: f32 },
    Magnified { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    None,
    Commit(PlacedArrow),
}

#[derive(Debug, Clone)]
pub struct MagnifierController {
    settings: MagnifierSettings,
    face: TargetFace,
    phase: GesturePhase,
    snapshot: Option<Snapshot>,
    suppress_click: bool,
}

impl MagnifierController {
    #[must_use]
    pub fn new(face: TargetFace, settings: MagnifierSettings) -> Self {
        Self {
            settings,
            face,
            phase: GesturePhase::Idle,
            snapshot: None,
            suppress_click: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[must_use]
    pub fn is_magnified(&self) -> bool {
        matches!(self.phase, GesturePhase::Magnified { .. })
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// `recorded` is what the frozen snapshot shows besides the rings.
    pub fn handle(&mut self, event: PointerEvent, recorded: &[Arrow]) -> GestureOutcome {
        match (self.phase, event) {
            (_, PointerEvent::Down { x, y, at_ms }) => {
                self.reset();
                self.phase = GesturePhase::Pressed {
                    down_at: at_ms,
                    x,
                    y,
                };
                GestureOutcome::None
            }
            (GesturePhase::Pressed { down_at, x, y }, PointerEvent::Tick { at_ms }) => {
                if self.held_long_enough(down_at, at_ms) {
                    self.magnify(x, y, recorded);
                }
                GestureOutcome::None
            }
            (GesturePhase::Pressed { down_at, .. }, PointerEvent::Move { x, y, at_ms }) => {
                if self.held_long_enough(down_at, at_ms) {
                    self.magnify(x, y, recorded);
                } else {
                    self.phase = GesturePhase::Pressed { down_at, x, y };
                }
                GestureOutcome::None
            }
            (GesturePhase::Magnified { .. }, PointerEvent::Move { x, y, .. }) => {
                self.phase = GesturePhase::Magnified { x, y };
                GestureOutcome::None
            }
            (GesturePhase::Pressed { down_at, .. }, PointerEvent::Up { x, y, at_ms }) => {
                if self.held_long_enough(down_at, at_ms) {
                    log::debug!("hold threshold passed without a tick, committing as magnified");
                }
                self.commit(x, y)
            }
            // the lens showed the last tracked point; the release position may have slipped
            (GesturePhase::Magnified { x, y }, PointerEvent::Up { .. }) => self.commit(x, y),
            (GesturePhase::Pressed { .. } | GesturePhase::Magnified { .. }, PointerEvent::Leave { .. }) => {
                log::debug!("pointer left the target, gesture cancelled");
                self.reset();
                GestureOutcome::None
            }
            (GesturePhase::Idle, PointerEvent::Click { x, y, .. }) => {
                if self.suppress_click {
                    self.suppress_click = false;
                    GestureOutcome::None
                } else {
                    self.face
                        .resolve(x, y)
                        .map_or(GestureOutcome::None, GestureOutcome::Commit)
                }
            }
            _ => GestureOutcome::None,
        }
    }

    /// The lens frame for the current tracked point, while magnified.
    #[must_use]
    pub fn loupe(&self) -> Option<LoupeView> {
        match (self.phase, self.snapshot.as_ref()) {
            (GesturePhase::Magnified { x, y }, Some(snapshot)) => Some(loupe_view(
                snapshot,
                x,
                y,
                self.settings.zoom,
                self.settings.lens_px,
            )),
            _ => None,
        }
    }

    /// Where the lens centre sits while magnified, as percentages of the target box.
    /// `y` goes negative when the lift carries the lens past the top edge.
    #[must_use]
    pub fn lens_position(&self) -> Option<(f32, f32)> {
        match (self.phase, self.snapshot.as_ref()) {
            (GesturePhase::Magnified { x, y }, Some(snapshot)) => {
                let (cx, cy) = lens_centre(snapshot, x, y, self.settings.lens_px);
                Some(snapshot.to_percent(cx, cy))
            }
            _ => None,
        }
    }

    fn held_long_enough(&self, down_at: u64, now: u64) -> bool {
        now.saturating_sub(down_at) >= self.settings.hold_ms
    }

    fn magnify(&mut self, x: f32, y: f32, recorded: &[Arrow]) {
        self.snapshot = Some(Snapshot {
            image: render_target(&self.face, recorded, self.settings.snapshot_face_px),
        });
        self.phase = GesturePhase::Magnified { x, y };
    }

    fn commit(&mut self, x: f32, y: f32) -> GestureOutcome {
        self.reset();
        // touch environments follow the release with a synthetic click at the same spot
        self.suppress_click = true;
        self.face
            .resolve(x, y)
            .map_or(GestureOutcome::None, GestureOutcome::Commit)
    }

    fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
        self.snapshot = None;
        self.suppress_click = false;
    }
}
