use image::{Rgba, RgbaImage};

use super::glyphs::{draw_text, draw_text_centred};
use super::layout::{ARROWS_PER_HALF, ARROWS_PER_ROW, ScoresheetLayout};
use crate::model::{ScoringSystem, category};
use crate::raster::{INK, WHITE, fill_rect, rgba, stroke_rect};

const MARGIN: u32 = 16;
const TITLE_H: u32 = 36;
const ROW_H: u32 = 30;
const ARROW_W: u32 = 30;
const HAND_W: u32 = 40;
const STAT_W: u32 = 48;
pub const FOOTER_H: u32 = 140;
const TEXT_SCALE: u32 = 3;
const HEADER_SCALE: u32 = 2;
const GRID: Rgba<u8> = Rgba([0x70, 0x70, 0x70, 255]);
const HEADER_FILL: Rgba<u8> = Rgba([0xE6, 0xE6, 0xE6, 255]);

#[derive(Debug, Clone, Copy)]
enum Column {
    Arrow(usize),
    Hand(usize),
    Score,
    Hits,
    Golds,
    RunningTotal,
}

fn columns() -> Vec<(Column, u32)> {
    let mut cols = Vec::with_capacity(ARROWS_PER_ROW + 6);
    for half in 0..2 {
        for i in 0..ARROWS_PER_HALF {
            cols.push((Column::Arrow(half * ARROWS_PER_HALF + i), ARROW_W));
        }
        cols.push((Column::Hand(half), HAND_W));
    }
    cols.extend([
        (Column::Score, STAT_W),
        (Column::Hits, STAT_W),
        (Column::Golds, STAT_W),
        (Column::RunningTotal, STAT_W),
    ]);
    cols
}

fn header_label(column: Column) -> String {
    match column {
        Column::Arrow(i) => (i + 1).to_string(),
        Column::Hand(_) => "H.D.".to_string(),
        Column::Score => "SCORE".to_string(),
        Column::Hits => "HITS".to_string(),
        Column::Golds => "GOLDS".to_string(),
        Column::RunningTotal => "R/T".to_string(),
    }
}

#[must_use]
pub fn sheet_dimensions(layout: &ScoresheetLayout) -> (u32, u32) {
    let table_w: u32 = columns().iter().map(|(_, w)| w).sum();
    // header row, one row per 12 arrows, totals row
    let table_rows = layout.rows.len() as u32 + 2;
    (
        table_w + 2 * MARGIN,
        MARGIN + TITLE_H + table_rows * ROW_H + FOOTER_H,
    )
}

/// The band at the bottom of the sheet reserved for signatures: (x, y, w, h).
#[must_use]
pub fn footer_rect(width: u32, height: u32) -> (u32, u32, u32, u32) {
    (0, height.saturating_sub(FOOTER_H), width, FOOTER_H)
}

/// Opaque table image with an empty signature footer.
#[must_use]
pub fn render_scoresheet(layout: &ScoresheetLayout, system: ScoringSystem) -> RgbaImage {
    let (width, height) = sheet_dimensions(layout);
    let mut image = RgbaImage::from_pixel(width, height, WHITE);
    let cols = columns();

    draw_text(&mut image, MARGIN, MARGIN + 4, &layout.round_name, TEXT_SCALE, INK);

    let mut y = MARGIN + TITLE_H;
    let mut x = MARGIN;
    for &(column, w) in &cols {
        fill_rect(&mut image, x, y, w, ROW_H, HEADER_FILL);
        stroke_rect(&mut image, x, y, w, ROW_H, GRID);
        draw_text_centred(&mut image, (x, y, w, ROW_H), &header_label(column), HEADER_SCALE, INK);
        x += w;
    }
    y += ROW_H;

    for row in &layout.rows {
        let mut x = MARGIN;
        for &(column, w) in &cols {
            let cell = (x, y, w, ROW_H);
            match column {
                Column::Arrow(i) => {
                    if let Some(value) = row.cells.get(i).copied().flatten() {
                        let cat = category(value, system);
                        fill_rect(&mut image, x, y, w, ROW_H, rgba(cat.colour()));
                        draw_text_centred(&mut image, cell, &value.to_string(), HEADER_SCALE, rgba(cat.ink()));
                    }
                }
                Column::Hand(h) => {
                    draw_text_centred(&mut image, cell, &row.hand_totals[h].to_string(), HEADER_SCALE, INK);
                }
                Column::Score => draw_text_centred(&mut image, cell, &row.score.to_string(), HEADER_SCALE, INK),
                Column::Hits => draw_text_centred(&mut image, cell, &row.hits.to_string(), HEADER_SCALE, INK),
                Column::Golds => draw_text_centred(&mut image, cell, &row.golds.to_string(), HEADER_SCALE, INK),
                Column::RunningTotal => {
                    draw_text_centred(&mut image, cell, &row.running_total.to_string(), HEADER_SCALE, INK);
                }
            }
            stroke_rect(&mut image, x, y, w, ROW_H, GRID);
            x += w;
        }
        y += ROW_H;
    }

    // totals row sits under the stat columns
    let mut x = MARGIN;
    for &(column, w) in &cols {
        let text = match column {
            Column::Score => Some(layout.totals.score.to_string()),
            Column::Hits => Some(layout.totals.hits.to_string()),
            Column::Golds => Some(layout.totals.golds.to_string()),
            Column::Hand(1) => Some("TOTAL".to_string()),
            _ => None,
        };
        if let Some(text) = text {
            fill_rect(&mut image, x, y, w, ROW_H, HEADER_FILL);
            stroke_rect(&mut image, x, y, w, ROW_H, GRID);
            draw_text_centred(&mut image, (x, y, w, ROW_H), &text, HEADER_SCALE, INK);
        }
        x += w;
    }

    let (fx, fy, fw, _) = footer_rect(width, height);
    let label_y = fy + FOOTER_H - 20;
    draw_text(&mut image, fx + fw / 20, label_y, "ARCHER", HEADER_SCALE, INK);
    draw_text(&mut image, fx + fw * 11 / 20, label_y, "WITNESS", HEADER_SCALE, INK);
    fill_rect(&mut image, fx + fw / 20, label_y - 6, fw * 6 / 20, 1, GRID);
    fill_rect(&mut image, fx + fw * 11 / 20, label_y - 6, fw * 6 / 20, 1, GRID);

    image
}
