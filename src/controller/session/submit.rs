use super::registry::AppState;
use crate::error::ScoringError;
use crate::mvu::session::EndState;
use crate::raster::encode_png;
use crate::scoresheet::compose;
use crate::storage::NewSubmission;
use crate::submission::SubmitRequest;
use crate::target::render_target;

pub const TARGET_IMAGE_FACE_PX: u32 = 600;

/// Validates, rasterizes and hands the finished round to the store, then discards the session.
/// Any failure leaves the session registered and unchanged.
///
/// # Errors
///
/// Returns `ScoringError::Validation` for unmet preconditions and the collaborator's error otherwise.
pub async fn submit_session(
    state: &AppState,
    session_id: u64,
    request: SubmitRequest,
) -> Result<u64, ScoringError> {
    let session = state.session(session_id).await?;
    let entry = session.lock().await;
    let model = &entry.model;

    if let EndState::EditingEnd(i) = model.state() {
        return Err(ScoringError::Validation(format!(
            "end {} is still being edited",
            i + 1
        )));
    }
    if !model.complete {
        return Err(ScoringError::Validation(format!(
            "round is not complete: {} of {} arrows",
            model.arrows_shot(),
            model.config.total_arrows
        )));
    }
    request.validate(&entry.signatures)?;

    let target_image = if model.config.use_target_face {
        let image = render_target(&entry.face, &model.all_arrows(), TARGET_IMAGE_FACE_PX);
        Some(encode_png(&image)?)
    } else {
        None
    };
    let scoresheet = compose(
        &model.config.round_name,
        &model.ends,
        model.system,
        &entry.signatures,
    )?;
    request.check_attachment(&scoresheet)?;

    let result = model.finish(target_image);
    let submission_id = state
        .store
        .store_submission(NewSubmission {
            result,
            scoresheet,
            formality: request.formality,
            competition_name: request.competition_name.clone(),
        })
        .await
        .inspect_err(|e| log::error!("session {session_id}: upload failed: {e}"))?;

    log::info!(
        "session {session_id}: submitted {} as submission {submission_id} ({:?})",
        model.config.round_name,
        request.formality
    );
    drop(entry);
    state.discard(session_id).await;
    Ok(submission_id)
}
