use image::{Rgba, RgbaImage};

const CROSSHAIR: Rgba<u8> = Rgba([0xD0, 0x00, 0x00, 255]);
const RIM: Rgba<u8> = Rgba([0x20, 0x20, 0x20, 255]);

/// How far above the pointer the lens centre sits, in lens diameters.
pub const LENS_LIFT: f32 = 0.75;

/// The target as it looked when the hold started. Moves pan this image; it is never redrawn.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub image: RgbaImage,
}

impl Snapshot {
    #[must_use]
    pub fn to_pixels(&self, x_pct: f32, y_pct: f32) -> (f32, f32) {
        (
            x_pct / 100.0 * self.image.width() as f32,
            y_pct / 100.0 * self.image.height() as f32,
        )
    }

    #[must_use]
    pub fn to_percent(&self, px: f32, py: f32) -> (f32, f32) {
        (
            px / self.image.width() as f32 * 100.0,
            py / self.image.height() as f32 * 100.0,
        )
    }
}

/// One frame of the magnifier: where the lens sits and what it shows.
#[derive(Debug, Clone)]
pub struct LoupeView {
    /// Lens centre in snapshot pixels, lifted above the pointer so the finger does not cover it.
    pub lens_centre: (f32, f32),
    /// Translation applied after scaling the snapshot by `zoom`, in lens pixels.
    pub offset: (f32, f32),
    pub zoom: f32,
    pub image: RgbaImage,
}

/// Lens-local pixel to snapshot pixel: the inverse of `lens = zoom * snapshot + offset`.
#[must_use]
pub fn lens_to_snapshot(u: f32, v: f32, zoom: f32, offset: (f32, f32)) -> (f32, f32) {
    ((u - offset.0) / zoom, (v - offset.1) / zoom)
}

/// Lens centre in snapshot pixels for a pointer at (`x_pct`, `y_pct`).
#[must_use]
pub fn lens_centre(snapshot: &Snapshot, x_pct: f32, y_pct: f32, lens_px: u32) -> (f32, f32) {
    let (sx, sy) = snapshot.to_pixels(x_pct, y_pct);
    (sx, sy - lens_px as f32 * LENS_LIFT)
}

#[must_use]
pub fn loupe_view(snapshot: &Snapshot, x_pct: f32, y_pct: f32, zoom: f32, lens_px: u32) -> LoupeView {
    let (sx, sy) = snapshot.to_pixels(x_pct, y_pct);
    let half = lens_px as f32 / 2.0;
    let offset = (half - zoom * sx, half - zoom * sy);
    let lens_centre = lens_centre(snapshot, x_pct, y_pct, lens_px);

    let mut image = RgbaImage::new(lens_px, lens_px);
    let (w, h) = (snapshot.image.width() as f32, snapshot.image.height() as f32);
    for v in 0..lens_px {
        for u in 0..lens_px {
            let (cu, cv) = (u as f32 + 0.5, v as f32 + 0.5);
            let r = (cu - half).hypot(cv - half);
            if r > half {
                continue;
            }
            if r > half - 2.0 {
                image.put_pixel(u, v, RIM);
                continue;
            }
            let (px, py) = lens_to_snapshot(cu, cv, zoom, offset);
            if px >= 0.0 && py >= 0.0 && px < w && py < h {
                image.put_pixel(u, v, *snapshot.image.get_pixel(px as u32, py as u32));
            }
        }
    }

    let centre = lens_px / 2;
    let arm = (lens_px / 16).max(3);
    for d in 0..=arm {
        for (x, y) in [
            (centre.saturating_sub(d), centre),
            (centre + d, centre),
            (centre, centre.saturating_sub(d)),
            (centre, centre + d),
        ] {
            if x < lens_px && y < lens_px {
                image.put_pixel(x, y, CROSSHAIR);
            }
        }
    }

    LoupeView {
        lens_centre,
        offset,
        zoom,
        image,
    }
}
