use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::raster::footer_rect;
use crate::error::ScoringError;
use crate::raster::flatten_onto_white;

/// Pixels with less alpha than this are capture noise and get cleared.
pub const INK_ALPHA_THRESHOLD: u8 = 16;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignatureRole {
    Archer,
    Witness,
}

impl SignatureRole {
    /// Fractions of the signature footer: (x, y, w, h).
    #[must_use]
    pub fn footer_box(self) -> (f32, f32, f32, f32) {
        match self {
            Self::Archer => (0.05, 0.05, 0.30, 0.70),
            Self::Witness => (0.55, 0.05, 0.30, 0.70),
        }
    }
}

impl fmt::Display for SignatureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archer => write!(f, "archer"),
            Self::Witness => write!(f, "witness"),
        }
    }
}

impl FromStr for SignatureRole {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "archer" => Ok(Self::Archer),
            "witness" | "scorer" => Ok(Self::Witness),
            other => Err(ScoringError::Parse(format!("unknown signature role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Signatures {
    pub archer: Option<RgbaImage>,
    pub witness: Option<RgbaImage>,
}

impl Signatures {
    pub fn set(&mut self, role: SignatureRole, image: RgbaImage) {
        match role {
            SignatureRole::Archer => self.archer = Some(image),
            SignatureRole::Witness => self.witness = Some(image),
        }
    }

    #[must_use]
    pub fn both(&self) -> Option<(&RgbaImage, &RgbaImage)> {
        self.archer.as_ref().zip(self.witness.as_ref())
    }

    #[must_use]
    pub fn missing(&self) -> Vec<SignatureRole> {
        let mut missing = Vec::new();
        if self.archer.is_none() {
            missing.push(SignatureRole::Archer);
        }
        if self.witness.is_none() {
            missing.push(SignatureRole::Witness);
        }
        missing
    }
}

/// Forces every inked pixel to black, keeping its alpha, so any pen colour stamps the same.
#[must_use]
pub fn normalize_ink(signature: &RgbaImage) -> RgbaImage {
    let mut out = signature.clone();
    for px in out.pixels_mut() {
        let alpha = px[3];
        *px = if alpha >= INK_ALPHA_THRESHOLD {
            Rgba([0, 0, 0, alpha])
        } else {
            Rgba([0, 0, 0, 0])
        };
    }
    out
}

fn stamp(sheet: &mut RgbaImage, signature: &RgbaImage, role: SignatureRole) {
    let (fx, fy, fw, fh) = footer_rect(sheet.width(), sheet.height());
    let (bx, by, bw, bh) = role.footer_box();
    let box_x = fx + (bx * fw as f32) as u32;
    let box_y = fy + (by * fh as f32) as u32;
    let box_w = (bw * fw as f32) as u32;
    let box_h = (bh * fh as f32) as u32;
    if signature.width() == 0 || signature.height() == 0 || box_w == 0 || box_h == 0 {
        return;
    }

    let fit = (box_w as f32 / signature.width() as f32).min(box_h as f32 / signature.height() as f32);
    let w = ((signature.width() as f32 * fit) as u32).max(1);
    let h = ((signature.height() as f32 * fit) as u32).max(1);
    let scaled = imageops::resize(&normalize_ink(signature), w, h, FilterType::Triangle);
    let x = box_x + (box_w - w) / 2;
    let y = box_y + (box_h - h) / 2;
    imageops::overlay(sheet, &scaled, i64::from(x), i64::from(y));
}

/// Stamps both signatures into the footer and flattens to an opaque image.
#[must_use]
pub fn stamp_signatures(sheet: &RgbaImage, archer: &RgbaImage, witness: &RgbaImage) -> RgbaImage {
    let mut signed = sheet.clone();
    stamp(&mut signed, archer, SignatureRole::Archer);
    stamp(&mut signed, witness, SignatureRole::Witness);
    flatten_onto_white(&signed)
}
