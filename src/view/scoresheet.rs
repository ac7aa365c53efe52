use maud::{DOCTYPE, Markup, html};

use crate::model::{ArrowValue, ScoringSystem, category};
use crate::scoresheet::{ARROWS_PER_ROW, ScoresheetLayout};

fn value_cell(cell: Option<ArrowValue>, system: ScoringSystem) -> Markup {
    let Some(value) = cell else {
        return html! { td {} };
    };
    let cat = category(value, system);
    html! {
        td class=(cat.css_class()) style=(format!("background:{}", cat.css_hex())) { (value.to_string()) }
    }
}

#[must_use]
pub fn render_scoresheet_table(layout: &ScoresheetLayout, system: ScoringSystem) -> Markup {
    let half = ARROWS_PER_ROW / 2;
    html! {
        table class="styled-table scoresheet" {
            thead {
                tr {
                    @for _ in 0..half { th {} }
                    th { "H.D." }
                    @for _ in 0..half { th {} }
                    th { "H.D." }
                    th { "SCORE" }
                    th { "HITS" }
                    th { "GOLDS" }
                    th { "R/T" }
                }
            }
            tbody {
                @for row in &layout.rows {
                    tr {
                        @for (i, cell) in row.cells.iter().enumerate() {
                            (value_cell(*cell, system))
                            @if i + 1 == half { td class="hand-total" { (row.hand_totals[0]) } }
                        }
                        td class="hand-total" { (row.hand_totals[1]) }
                        td { (row.score) }
                        td { (row.hits) }
                        td { (row.golds) }
                        td { (row.running_total) }
                    }
                }
            }
            tfoot {
                tr {
                    td colspan=(ARROWS_PER_ROW + 2) { "TOTALS" }
                    td { (layout.totals.score) }
                    td { (layout.totals.hits) }
                    td { (layout.totals.golds) }
                    td { (layout.totals.score) }
                }
            }
        }
    }
}

#[must_use]
pub fn render_scoresheet_page(id: u64, layout: &ScoresheetLayout, system: ScoringSystem) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="UTF-8";
            title { (layout.round_name) " scoresheet" }
        }
        body {
            h1 { (layout.round_name) }
            (render_scoresheet_table(layout, system))
            img src=(format!("/sessions/{id}/scoresheet.png")) alt="scoresheet";
        }
    }
}
