use actix_web::http::header;
use actix_web::web::{self, Bytes, Data};
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

use super::dispatch;
use super::registry::{AppState, SessionEntry};
use super::submit::{TARGET_IMAGE_FACE_PX, submit_session};
use crate::error::ScoringError;
use crate::magnifier::{GestureOutcome, GesturePhase, PointerEvent};
use crate::model::{Arrow, ArrowValue, RoundConfig, legal_values_for};
use crate::mvu::session::{Msg, SessionSummary};
use crate::raster::{decode_image, encode_png};
use crate::scoresheet::{ScoresheetLayout, SignatureRole};
use crate::submission::SubmitRequest;
use crate::target::render_target;
use crate::view;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StartRequest {
    Named { round: String },
    Custom(RoundConfig),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArrowRequest {
    Value { value: ArrowValue },
    Position { x: f32, y: f32 },
}

#[derive(Debug, Serialize)]
struct SessionJson<'a> {
    id: u64,
    summary: SessionSummary,
    legal_values: Vec<ArrowValue>,
    ends: &'a [crate::model::End],
    open_end: &'a crate::model::End,
    end_subtotals: Vec<u32>,
    running_totals: Vec<u32>,
    last_error: Option<String>,
}

fn want_json(query: &HashMap<String, String>) -> bool {
    match query.get("json").map(String::as_str) {
        Some("1") => true,
        Some("0") | None => false,
        Some(other) => other.parse().unwrap_or(false),
    }
}

fn is_htmx(req: &HttpRequest) -> bool {
    req.headers().contains_key("HX-Request")
}

fn session_json(id: u64, entry: &SessionEntry) -> serde_json::Value {
    let model = &entry.model;
    let body = SessionJson {
        id,
        summary: model.summary(),
        legal_values: legal_values_for(model.system),
        ends: &model.ends,
        open_end: &model.open_end,
        end_subtotals: (0..model.ends.len())
            .filter_map(|i| model.end_subtotal(i))
            .collect(),
        running_totals: model.running_totals(),
        last_error: model.error.as_ref().map(ToString::to_string),
    };
    serde_json::to_value(body).unwrap_or_else(|e| json!({"error": e.to_string()}))
}

pub fn error_response(e: &ScoringError) -> HttpResponse {
    match e {
        ScoringError::NotFound(_) => HttpResponse::NotFound().json(json!({"error": e.to_string()})),
        ScoringError::Parse(_) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
        e if e.is_precondition() => {
            HttpResponse::UnprocessableEntity().json(json!({"error": e.to_string()}))
        }
        e => {
            log::error!("{e}");
            HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
        }
    }
}

fn png_response(bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok().content_type("image/png").body(bytes)
}

/// Session state after a mutation: the page fragment for htmx, JSON for everyone else.
fn respond(req: &HttpRequest, id: u64, entry: &SessionEntry) -> HttpResponse {
    if is_htmx(req) {
        HttpResponse::Ok()
            .content_type("text/html")
            .body(view::session::render_session_fragment(id, entry).into_string())
    } else {
        HttpResponse::Ok().json(session_json(id, entry))
    }
}

async fn mutate(req: &HttpRequest, state: &AppState, id: u64, msg: Msg) -> HttpResponse {
    let session = match state.session(id).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let mut entry = session.lock().await;
    match dispatch(&session, &mut entry, msg) {
        Ok(()) => respond(req, id, &entry),
        Err(e) => error_response(&e),
    }
}

pub async fn index(state: Data<AppState>) -> impl Responder {
    let markup = view::index::render_index_template(&state.settings.catalog);
    HttpResponse::Ok()
        .content_type("text/html")
        .body(markup.into_string())
}

pub async fn start_session(
    state: Data<AppState>,
    body: web::Json<StartRequest>,
) -> HttpResponse {
    let config = match body.into_inner() {
        StartRequest::Named { round } => match state.settings.catalog.find(&round) {
            Some(config) => config.clone(),
            None => {
                return error_response(&ScoringError::NotFound(format!("round '{round}'")));
            }
        },
        StartRequest::Custom(config) => config,
    };
    match state.start_session(config).await {
        Ok(id) => HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/sessions/{id}")))
            .json(json!({"id": id})),
        Err(e) => error_response(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct StartForm {
    pub round: String,
}

/// Form post from the index page; redirects to the scoring page.
pub async fn start_session_form(state: Data<AppState>, form: web::Form<StartForm>) -> HttpResponse {
    let Some(config) = state.settings.catalog.find(&form.round).cloned() else {
        return error_response(&ScoringError::NotFound(format!("round '{}'", form.round)));
    };
    match state.start_session(config).await {
        Ok(id) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, format!("/sessions/{id}")))
            .finish(),
        Err(e) => error_response(&e),
    }
}

pub async fn session_page(
    state: Data<AppState>,
    path: web::Path<u64>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let id = path.into_inner();
    let session = match state.session(id).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let entry = session.lock().await;
    if want_json(&query) {
        HttpResponse::Ok().json(session_json(id, &entry))
    } else {
        HttpResponse::Ok()
            .content_type("text/html")
            .body(view::session::render_session_page(id, &entry).into_string())
    }
}

pub async fn record_arrow(
    req: HttpRequest,
    state: Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<ArrowRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    let session = match state.session(id).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let mut entry = session.lock().await;
    let arrow = match body.into_inner() {
        ArrowRequest::Value { value } => Some(Arrow::scored(value)),
        ArrowRequest::Position { x, y } => {
            if entry.model.config.use_target_face {
                entry.face.resolve(x, y).map(Arrow::from)
            } else {
                return error_response(&ScoringError::Validation(
                    "this round is scored without a target face".into(),
                ));
            }
        }
    };
    // taps outside every face are dropped without complaint
    if let Some(arrow) = arrow
        && let Err(e) = dispatch(&session, &mut entry, Msg::RecordArrow(arrow))
    {
        return error_response(&e);
    }
    respond(&req, id, &entry)
}

pub async fn undo(req: HttpRequest, state: Data<AppState>, path: web::Path<u64>) -> HttpResponse {
    mutate(&req, &state, path.into_inner(), Msg::UndoLast).await
}

pub async fn save_end(req: HttpRequest, state: Data<AppState>, path: web::Path<u64>) -> HttpResponse {
    mutate(&req, &state, path.into_inner(), Msg::SaveEnd).await
}

pub async fn edit_end(
    req: HttpRequest,
    state: Data<AppState>,
    path: web::Path<(u64, usize)>,
) -> HttpResponse {
    let (id, index) = path.into_inner();
    mutate(&req, &state, id, Msg::EditEnd(index)).await
}

/// Lens centre as percentages of the target image box.
#[derive(Debug, Serialize)]
struct LensJson {
    x: f32,
    y: f32,
}

#[derive(Debug, Serialize)]
struct GestureJson {
    phase: GesturePhase,
    /// Only set when the arrow made it into the open end.
    committed: Option<crate::model::PlacedArrow>,
    lens: Option<LensJson>,
    summary: SessionSummary,
}

pub async fn gesture(
    state: Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<PointerEvent>,
) -> HttpResponse {
    let id = path.into_inner();
    let session = match state.session(id).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let mut entry = session.lock().await;
    if !entry.model.config.use_target_face {
        return error_response(&ScoringError::Validation(
            "this round is scored without a target face".into(),
        ));
    }
    let recorded = entry.model.all_arrows();
    let outcome = entry.gesture.handle(body.into_inner(), &recorded);
    let committed = match outcome {
        GestureOutcome::Commit(placed) => {
            let arrow = Arrow::from(placed);
            let accepted = entry.model.accepts(&arrow);
            if let Err(e) = dispatch(&session, &mut entry, Msg::RecordArrow(arrow)) {
                return error_response(&e);
            }
            accepted.then_some(placed)
        }
        GestureOutcome::None => None,
    };
    HttpResponse::Ok().json(GestureJson {
        phase: entry.gesture.phase(),
        committed,
        lens: entry.gesture.lens_position().map(|(x, y)| LensJson { x, y }),
        summary: entry.model.summary(),
    })
}

pub async fn loupe_png(state: Data<AppState>, path: web::Path<u64>) -> HttpResponse {
    let id = path.into_inner();
    let session = match state.session(id).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let entry = session.lock().await;
    let Some(view) = entry.gesture.loupe() else {
        return error_response(&ScoringError::NotFound("magnifier is not open".into()));
    };
    match encode_png(&view.image) {
        Ok(bytes) => png_response(bytes),
        Err(e) => error_response(&e),
    }
}

pub async fn put_signature(
    state: Data<AppState>,
    path: web::Path<(u64, String)>,
    body: Bytes,
) -> HttpResponse {
    let (id, role) = path.into_inner();
    let role: SignatureRole = match role.parse() {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };
    let image = match decode_image(&body) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("session {id}: unreadable {role} signature: {e}");
            return HttpResponse::BadRequest().json(json!({"error": e.to_string()}));
        }
    };
    let session = match state.session(id).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let mut entry = session.lock().await;
    entry.signatures.set(role, image);
    HttpResponse::Ok().json(json!({"role": role, "missing": entry.signatures.missing()}))
}

pub async fn scoresheet(
    state: Data<AppState>,
    path: web::Path<u64>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let id = path.into_inner();
    let session = match state.session(id).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let entry = session.lock().await;
    let model = &entry.model;
    let layout = ScoresheetLayout::from_ends(&model.config.round_name, &model.ends, model.system);
    if want_json(&query) {
        HttpResponse::Ok().json(layout)
    } else {
        HttpResponse::Ok()
            .content_type("text/html")
            .body(view::scoresheet::render_scoresheet_page(id, &layout, model.system).into_string())
    }
}

pub async fn scoresheet_png(state: Data<AppState>, path: web::Path<u64>) -> HttpResponse {
    let id = path.into_inner();
    let session = match state.session(id).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let entry = session.lock().await;
    let model = &entry.model;
    let result = crate::scoresheet::compose(
        &model.config.round_name,
        &model.ends,
        model.system,
        &crate::scoresheet::Signatures::default(),
    );
    match result {
        Ok(images) => png_response(images.unsigned),
        Err(e) => error_response(&e),
    }
}

pub async fn target_png(state: Data<AppState>, path: web::Path<u64>) -> HttpResponse {
    let id = path.into_inner();
    let session = match state.session(id).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let entry = session.lock().await;
    let image = render_target(&entry.face, &entry.model.all_arrows(), TARGET_IMAGE_FACE_PX);
    match encode_png(&image) {
        Ok(bytes) => png_response(bytes),
        Err(e) => error_response(&e),
    }
}

pub async fn submit(
    state: Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<SubmitRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    match submit_session(&state, id, body.into_inner()).await {
        Ok(submission_id) => HttpResponse::Created().json(json!({"submission_id": submission_id})),
        Err(e) => error_response(&e),
    }
}

pub async fn submissions(state: Data<AppState>) -> HttpResponse {
    match state.store.list_submissions().await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&ScoringError::from(e)),
    }
}

/// Mounts every route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(HttpResponse::Ok))
        .route("/sessions", web::post().to(start_session))
        .route("/sessions/new", web::post().to(start_session_form))
        .route("/sessions/{id}", web::get().to(session_page))
        .route("/sessions/{id}/arrows", web::post().to(record_arrow))
        .route("/sessions/{id}/undo", web::post().to(undo))
        .route("/sessions/{id}/save", web::post().to(save_end))
        .route("/sessions/{id}/ends/{index}/edit", web::post().to(edit_end))
        .route("/sessions/{id}/gesture", web::post().to(gesture))
        .route("/sessions/{id}/loupe.png", web::get().to(loupe_png))
        .route(
            "/sessions/{id}/signatures/{role}",
            web::put().to(put_signature),
        )
        .route("/sessions/{id}/scoresheet", web::get().to(scoresheet))
        .route("/sessions/{id}/scoresheet.png", web::get().to(scoresheet_png))
        .route("/sessions/{id}/target.png", web::get().to(target_png))
        .route("/sessions/{id}/submit", web::post().to(submit))
        .route("/submissions", web::get().to(submissions));
}
