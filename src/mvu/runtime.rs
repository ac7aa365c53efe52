use serde_json::json;
use std::time::Duration;

use crate::error::ScoringError;
use crate::mvu::session::{Effect, Msg, SessionModel, update};

/// A message the caller must feed back into `run_session` once `after` has elapsed.
#[derive(Debug, Clone)]
pub struct Deferred {
    pub after: Duration,
    pub msg: Msg,
}

enum EffectResult {
    Msg(Msg),
    Deferred(Deferred),
    Done,
}

fn run_effect(effect: Effect, model: &SessionModel) -> EffectResult {
    match effect {
        Effect::ScheduleAutoSave {
            generation,
            delay_ms,
        } => EffectResult::Deferred(Deferred {
            after: Duration::from_millis(delay_ms),
            msg: Msg::AutoSaveElapsed { generation },
        }),
        Effect::AnnounceCompletion { total_score } => {
            log::info!(
                "{}: round complete, {} arrows for {total_score}",
                model.config.round_name,
                model.arrows_shot()
            );
            EffectResult::Done
        }
        Effect::Rejected(e) => EffectResult::Msg(Msg::Failed(e)),
    }
}

/// Runs the MVU loop for one session: seeds with `init_msg` and drains effects.
/// Timed effects are handed back instead of blocking the caller.
///
/// # Errors
///
/// Returns the `ScoringError` of the first rejected transition; the model keeps its prior state.
pub fn run_session(model: &mut SessionModel, init_msg: Msg) -> Result<Vec<Deferred>, ScoringError> {
    let mut effects = update(model, init_msg);
    let mut deferred = Vec::new();
    while let Some(effect) = effects.pop() {
        log::debug!("{}", json!({"mvu":"effect_start","effect": format!("{effect:?}")}));
        match run_effect(effect, model) {
            EffectResult::Msg(Msg::Failed(e)) => {
                update(model, Msg::Failed(e.clone()));
                return Err(e);
            }
            EffectResult::Msg(other) => {
                let next = update(model, other);
                log::debug!(
                    "{}",
                    json!({"mvu":"update","queued_effects": next.iter().map(|x| format!("{x:?}")).collect::<Vec<_>>()})
                );
                effects.extend(next);
            }
            EffectResult::Deferred(d) => {
                log::debug!(
                    "{}",
                    json!({"mvu":"deferred","after_ms": d.after.as_millis() as u64, "msg": format!("{:?}", d.msg)})
                );
                deferred.push(d);
            }
            EffectResult::Done => {}
        }
    }
    Ok(deferred)
}
