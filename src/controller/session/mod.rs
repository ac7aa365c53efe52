pub mod http_handlers;
pub mod registry;
pub mod submit;

use crate::error::ScoringError;
use crate::mvu::runtime::{Deferred, run_session};
use crate::mvu::session::Msg;
use registry::{SessionEntry, SharedSession};

/// Runs `msg` through the session and arms any timers it asked for.
///
/// # Errors
///
/// Returns the rejection from the state machine; the session keeps its prior state.
pub fn dispatch(
    session: &SharedSession,
    entry: &mut SessionEntry,
    msg: Msg,
) -> Result<(), ScoringError> {
    let deferred = run_session(&mut entry.model, msg)?;
    for d in deferred {
        spawn_deferred(session.clone(), d);
    }
    Ok(())
}

/// Fires `deferred.msg` after its delay. Stale auto-saves are discarded by the session itself,
/// so these tasks are never cancelled.
pub fn spawn_deferred(session: SharedSession, deferred: Deferred) {
    tokio::spawn(async move {
        tokio::time::sleep(deferred.after).await;
        let mut entry = session.lock().await;
        match run_session(&mut entry.model, deferred.msg) {
            Ok(more) => {
                for d in more {
                    spawn_deferred(session.clone(), d);
                }
            }
            Err(e) => log::warn!("deferred message rejected: {e}"),
        }
    });
}
