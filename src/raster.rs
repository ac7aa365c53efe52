use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use crate::error::ScoringError;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const INK: Rgba<u8> = Rgba([17, 17, 17, 255]);

#[must_use]
pub fn rgba(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

/// # Errors
///
/// Returns `ScoringError::Raster` if PNG encoding fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ScoringError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone()).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// # Errors
///
/// Returns `ScoringError::Raster` if the bytes are not a decodable image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, ScoringError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

pub fn fill_rect(image: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, colour: Rgba<u8>) {
    let x_end = (x + w).min(image.width());
    let y_end = (y + h).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            image.put_pixel(px, py, colour);
        }
    }
}

pub fn stroke_rect(image: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, colour: Rgba<u8>) {
    if w == 0 || h == 0 {
        return;
    }
    fill_rect(image, x, y, w, 1, colour);
    fill_rect(image, x, y + h - 1, w, 1, colour);
    fill_rect(image, x, y, 1, h, colour);
    fill_rect(image, x + w - 1, y, 1, h, colour);
}

pub fn fill_circle(image: &mut RgbaImage, cx: f32, cy: f32, radius: f32, colour: Rgba<u8>) {
    let min_x = (cx - radius).floor().max(0.0) as u32;
    let min_y = (cy - radius).floor().max(0.0) as u32;
    let max_x = ((cx + radius).ceil() as u32).min(image.width());
    let max_y = ((cy + radius).ceil() as u32).min(image.height());
    for py in min_y..max_y {
        for px in min_x..max_x {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx.hypot(dy) <= radius {
                image.put_pixel(px, py, colour);
            }
        }
    }
}

/// Composites onto white and drops transparency.
#[must_use]
pub fn flatten_onto_white(image: &RgbaImage) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(image.width(), image.height(), WHITE);
    for (x, y, px) in image.enumerate_pixels() {
        let a = u16::from(px[3]);
        let blend = |c: u8| ((u16::from(c) * a + 255 * (255 - a)) / 255) as u8;
        out.put_pixel(x, y, Rgba([blend(px[0]), blend(px[1]), blend(px[2]), 255]));
    }
    out
}
