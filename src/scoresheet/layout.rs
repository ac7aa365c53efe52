use serde::Serialize;

use crate::model::{Arrow, ArrowValue, End, ScoringSystem, tally};

pub const ARROWS_PER_ROW: usize = 12;
pub const ARROWS_PER_HALF: usize = ARROWS_PER_ROW / 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoresheetRow {
    /// Always `ARROWS_PER_ROW` long; `None` pads the final row.
    pub cells: Vec<Option<ArrowValue>>,
    pub hand_totals: [u32; 2],
    pub score: u32,
    pub hits: u32,
    pub golds: u32,
    pub running_total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ScoresheetTotals {
    pub score: u32,
    pub hits: u32,
    pub golds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoresheetLayout {
    pub round_name: String,
    pub rows: Vec<ScoresheetRow>,
    pub totals: ScoresheetTotals,
}

impl ScoresheetLayout {
    /// Rows of 12 regardless of how the arrows were grouped into ends.
    #[must_use]
    pub fn from_ends(round_name: &str, ends: &[End], system: ScoringSystem) -> Self {
        let arrows: Vec<Arrow> = ends.iter().flat_map(|e| e.arrows.iter().copied()).collect();
        Self::from_arrows(round_name, &arrows, system)
    }

    #[must_use]
    pub fn from_arrows(round_name: &str, arrows: &[Arrow], system: ScoringSystem) -> Self {
        let mut rows = Vec::with_capacity(arrows.len().div_ceil(ARROWS_PER_ROW));
        let mut totals = ScoresheetTotals::default();

        for chunk in arrows.chunks(ARROWS_PER_ROW) {
            let (score, hits, golds) = tally(chunk, system);
            let first = tally(chunk.iter().take(ARROWS_PER_HALF), system).0;
            let mut cells: Vec<Option<ArrowValue>> = chunk.iter().map(|a| Some(a.value)).collect();
            cells.resize(ARROWS_PER_ROW, None);

            totals.score += score;
            totals.hits += hits;
            totals.golds += golds;
            rows.push(ScoresheetRow {
                cells,
                hand_totals: [first, score - first],
                score,
                hits,
                golds,
                running_total: totals.score,
            });
        }

        Self {
            round_name: round_name.to_string(),
            rows,
            totals,
        }
    }
}
