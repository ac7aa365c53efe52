use image::{Rgba, RgbaImage};

use super::geometry::{FACE_CENTRE, TargetFace};
use crate::model::{Arrow, ArrowValue, category};
use crate::raster::{fill_circle, rgba};

const BACKGROUND: Rgba<u8> = Rgba([0xE8, 0xE4, 0xD8, 255]);
const RING_LINE: Rgba<u8> = Rgba([0x55, 0x55, 0x55, 255]);
const IMPACT_FILL: Rgba<u8> = Rgba([0x39, 0xFF, 0x14, 255]);
const IMPACT_EDGE: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 255]);

/// Pixel size of the whole bounding box when each face is `face_px` square.
#[must_use]
pub fn target_dimensions(face: &TargetFace, face_px: u32) -> (u32, u32) {
    (face_px, face_px * u32::from(face.kind.face_count()))
}

/// Draws the face(s) and every placed arrow. Arrows without a placement are skipped.
#[must_use]
pub fn render_target(face: &TargetFace, arrows: &[Arrow], face_px: u32) -> RgbaImage {
    let (width, height) = target_dimensions(face, face_px);
    let mut image = RgbaImage::from_pixel(width, height, BACKGROUND);
    let scale = face_px as f32 / 100.0;
    let system = face.kind.system();
    let line_width = 100.0 / face_px as f32;

    for face_index in 0..face.kind.face_count() {
        let top = u32::from(face_index) * face_px;
        for py in 0..face_px {
            for px in 0..face_px {
                let lx = (px as f32 + 0.5) / scale;
                let ly = (py as f32 + 0.5) / scale;
                let distance = (lx - FACE_CENTRE).hypot(ly - FACE_CENTRE);
                let value = face.value_at_distance(distance);
                if value == ArrowValue::Miss {
                    continue;
                }
                let on_line = (0..face.ring_count())
                    .any(|i| (distance - face.ring_outer_radius(i)).abs() < line_width * 0.5);
                let colour = if on_line {
                    RING_LINE
                } else {
                    rgba(category(value, system).colour())
                };
                image.put_pixel(px, top + py, colour);
            }
        }
    }

    let impact_radius = (face_px as f32 / 60.0).max(2.0);
    for placement in arrows.iter().filter_map(|a| a.placement) {
        let cx = placement.x * scale;
        let cy = f32::from(placement.face) * face_px as f32 + placement.y * scale;
        fill_circle(&mut image, cx, cy, impact_radius + 1.0, IMPACT_EDGE);
        fill_circle(&mut image, cx, cy, impact_radius, IMPACT_FILL);
    }

    image
}
