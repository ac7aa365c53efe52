use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::HTMX_PATH;
use crate::controller::session::registry::SessionEntry;
use crate::model::{ArrowValue, ScoringSystem, category, legal_values_for};
use crate::mvu::session::EndState;

const JSON_ENC_PATH: &str = "https://unpkg.com/htmx.org@1.9.12/dist/ext/json-enc.js";

// Forwards pointer activity on the target image to the gesture endpoint as
// percentages of the image box. The lens is centred where the server places it
// and the session panel refreshes on commit.
const GESTURE_JS: &str = r#"
(function () {
  const img = document.getElementById('target-face');
  if (!img) return;
  const url = img.dataset.gesture;
  const send = (kind, e) => {
    const r = img.getBoundingClientRect();
    const body = { kind: kind, at_ms: Math.round(performance.now()) };
    if (e) {
      body.x = ((e.clientX - r.left) / r.width) * 100;
      body.y = ((e.clientY - r.top) / r.height) * 100;
    }
    return fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) })
      .then((res) => res.json())
      .then((out) => {
        const loupe = document.getElementById('loupe');
        if (out.phase && out.phase.phase === 'magnified') {
          loupe.src = img.dataset.loupe + '?t=' + Date.now();
          if (out.lens) {
            loupe.style.left = 'calc(' + out.lens.x + '% - ' + loupe.naturalWidth / 2 + 'px)';
            loupe.style.top = 'calc(' + out.lens.y + '% - ' + loupe.naturalHeight / 2 + 'px)';
          }
          loupe.hidden = false;
        } else {
          loupe.hidden = true;
        }
        if (out.committed) htmx.trigger('#session', 'refresh');
      });
  };
  let timer = null;
  img.addEventListener('pointerdown', (e) => {
    send('down', e);
    timer = setInterval(() => send('tick'), 30);
  });
  img.addEventListener('pointermove', (e) => { if (timer) send('move', e); });
  img.addEventListener('pointerup', (e) => { clearInterval(timer); timer = null; send('up', e); });
  img.addEventListener('pointerleave', () => { clearInterval(timer); timer = null; send('leave'); });
  img.addEventListener('click', (e) => send('click', e));
})();
"#;

fn value_button(id: u64, value: ArrowValue, system: ScoringSystem, enabled: bool) -> Markup {
    let cat = category(value, system);
    let [r, g, b] = cat.ink();
    html! {
        button class=(format!("arrow-button {}", cat.css_class()))
            style=(format!("background:{};color:#{r:02x}{g:02x}{b:02x}", cat.css_hex()))
            disabled[!enabled]
            hx-post=(format!("/sessions/{id}/arrows"))
            hx-ext="json-enc"
            hx-vals=(format!(r#"{{"value":"{value}"}}"#))
            hx-target="#session" hx-swap="outerHTML" {
            (value.to_string())
        }
    }
}

fn arrow_chip(value: ArrowValue, system: ScoringSystem) -> Markup {
    let cat = category(value, system);
    html! {
        span class=(format!("arrow-chip {}", cat.css_class()))
            style=(format!("background:{}", cat.css_hex())) { (value.to_string()) }
    }
}

/// The swappable panel: input, open end, closed ends and totals.
#[must_use]
pub fn render_session_fragment(id: u64, entry: &SessionEntry) -> Markup {
    let model = &entry.model;
    let summary = model.summary();
    let state = model.state();
    let end_full = model.open_end.len() >= model.config.arrows_per_end;
    let can_record = !end_full && (!model.complete || model.editing.is_some());
    let running = model.running_totals();
    let progress = match state {
        _ if model.complete => "(complete)".to_string(),
        EndState::EditingEnd(i) => format!("(editing end {})", i + 1),
        _ => format!(
            "end {} of {}",
            summary.current_end,
            model.config.total_ends()
        ),
    };

    html! {
        div id="session" hx-get=(format!("/sessions/{id}")) hx-trigger="refresh" hx-select="#session"
            hx-swap="outerHTML" {
            h2 { (summary.round_name) " " (progress) }
            @if let Some(err) = &model.error {
                p class="error" { (err.to_string()) }
            }

            @if model.config.use_target_face {
                div class="target" style="position:relative;display:inline-block" {
                    img id="target-face" src=(format!("/sessions/{id}/target.png?n={}", model.generation))
                        data-gesture=(format!("/sessions/{id}/gesture"))
                        data-loupe=(format!("/sessions/{id}/loupe.png"))
                        alt="target face" draggable="false";
                    img id="loupe" alt="" hidden
                        style="position:absolute;pointer-events:none;border-radius:50%";
                }
            } @else {
                div class="value-buttons" {
                    @for value in legal_values_for(model.system) {
                        (value_button(id, value, model.system, can_record))
                    }
                }
            }

            div class="open-end" {
                @for arrow in &model.open_end.arrows {
                    (arrow_chip(arrow.value, model.system))
                }
                span class="subtotal" { (model.open_end_subtotal()) }
                button hx-post=(format!("/sessions/{id}/undo")) hx-target="#session" hx-swap="outerHTML"
                    disabled[model.open_end.is_empty()] { "Undo" }
                button hx-post=(format!("/sessions/{id}/save")) hx-target="#session" hx-swap="outerHTML"
                    disabled[!end_full] { "Save end" }
            }

            table class="styled-table ends" {
                thead {
                    tr {
                        th { "END" }
                        th { "ARROWS" }
                        th { "SCORE" }
                        th { "R/T" }
                        th {}
                    }
                }
                tbody {
                    @for (i, end) in model.ends.iter().enumerate() {
                        tr class=[(model.editing == Some(i)).then_some("editing")] {
                            td { (i + 1) }
                            td {
                                @for arrow in &end.arrows { (arrow_chip(arrow.value, model.system)) }
                            }
                            td { (model.end_subtotal(i).unwrap_or(0)) }
                            td { (running.get(i).copied().unwrap_or(0)) }
                            td {
                                button hx-post=(format!("/sessions/{id}/ends/{i}/edit"))
                                    hx-target="#session" hx-swap="outerHTML"
                                    disabled[model.editing == Some(i)] { "Edit" }
                            }
                        }
                    }
                }
            }

            div class="totals" {
                span { "Score " (summary.total_score) }
                span { "Hits " (summary.hits) }
                span { "Golds " (summary.golds) }
                span { "Arrows " (summary.arrows_shot) "/" (summary.total_arrows) }
            }
            @if model.complete {
                a href=(format!("/sessions/{id}/scoresheet")) { "Scoresheet" }
            }
        }
    }
}

#[must_use]
pub fn render_session_page(id: u64, entry: &SessionEntry) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { (entry.model.config.round_name) }
            script src=(HTMX_PATH) {}
            script src=(JSON_ENC_PATH) {}
        }
        body {
            (render_session_fragment(id, entry))
            @if entry.model.config.use_target_face {
                script { (PreEscaped(GESTURE_JS)) }
            }
        }
    }
}
