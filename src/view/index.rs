use maud::{DOCTYPE, Markup, html};

use crate::HTMX_PATH;
use crate::model::RoundCatalog;

#[must_use]
pub fn render_index_template(catalog: &RoundCatalog) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { "Archery Scoring" }
            script src=(HTMX_PATH) {}
        }
        body {
            h1 { "Start a round" }
            table class="styled-table" {
                thead {
                    tr {
                        th { "ROUND" }
                        th { "ARROWS" }
                        th { "PER END" }
                        th { "FACE" }
                        th {}
                    }
                }
                tbody {
                    @for round in &catalog.rounds {
                        tr {
                            td { (round.round_name) }
                            td { (round.total_arrows) }
                            td { (round.arrows_per_end) }
                            td {
                                @if !round.use_target_face { "buttons" }
                                @else if round.is_triple_spot { "triple spot" }
                                @else { "single spot" }
                            }
                            td {
                                form method="post" action="/sessions/new" {
                                    input type="hidden" name="round" value=(round.round_name);
                                    button type="submit" { "Shoot" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
