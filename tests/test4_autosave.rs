use rusty_archery::{AppState, ScoringError};
use rusty_archery::args::CleanArgs;
use rusty_archery::controller::session::dispatch;
use rusty_archery::model::{Arrow, ArrowValue, RoundConfig};
use rusty_archery::mvu::runtime::run_session;
use rusty_archery::mvu::session::{Effect, EndState, Msg, update};
use rusty_archery::storage::MemoryStore;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{arrows, session};

#[test]
fn test_full_end_schedules_autosave() {
    let mut model = session("Portsmouth", 60, 3);
    let mut effects = Vec::new();
    for arrow in arrows(&["10", "9", "8"]) {
        effects = update(&mut model, Msg::RecordArrow(arrow));
    }
    assert_eq!(
        effects,
        vec![Effect::ScheduleAutoSave {
            generation: model.generation,
            delay_ms: 10
        }]
    );
    let generation = model.generation;
    update(&mut model, Msg::AutoSaveElapsed { generation });
    assert_eq!(model.ends.len(), 1);
    assert_eq!(model.state(), EndState::Empty);
}

#[test]
fn test_stale_autosave_is_discarded() {
    let mut model = session("Portsmouth", 60, 3);
    for arrow in arrows(&["10", "9", "8"]) {
        update(&mut model, Msg::RecordArrow(arrow));
    }
    let stale = model.generation;
    update(&mut model, Msg::UndoLast);
    update(&mut model, Msg::RecordArrow(Arrow::scored(ArrowValue::Ring(7))));
    let fresh = model.generation;
    assert_ne!(stale, fresh);

    assert!(update(&mut model, Msg::AutoSaveElapsed { generation: stale }).is_empty());
    assert!(model.ends.is_empty());
    assert_eq!(model.open_end.arrows, arrows(&["10", "9", "7"]));

    update(&mut model, Msg::AutoSaveElapsed { generation: fresh });
    assert_eq!(model.ends.len(), 1);
    assert_eq!(model.ends[0].arrows, arrows(&["10", "9", "7"]));
}

#[test]
fn test_dispatch_is_pure() {
    let model = session("Portsmouth", 60, 3);
    let (next, effects) = model.dispatch(Msg::RecordArrow(Arrow::scored(ArrowValue::InnerTen)));
    assert!(effects.is_empty());
    assert!(model.open_end.is_empty());
    assert_eq!(next.open_end.len(), 1);
}

#[test]
fn test_runtime_defers_autosave_and_reports_rejection() {
    let mut model = session("Portsmouth", 6, 3);
    for arrow in arrows(&["10", "9"]) {
        assert!(run_session(&mut model, Msg::RecordArrow(arrow)).unwrap().is_empty());
    }
    let err = run_session(&mut model, Msg::SaveEnd).unwrap_err();
    assert!(err.is_precondition());
    assert_eq!(model.error, Some(err));
    assert_eq!(model.open_end.len(), 2);

    let deferred = run_session(&mut model, Msg::RecordArrow(Arrow::scored(ArrowValue::Ring(8))))
        .unwrap();
    assert_eq!(deferred.len(), 1);
    assert_eq!(deferred[0].after, Duration::from_millis(10));
    assert!(model.error.is_none());
}

async fn live_state() -> (AppState, u64) {
    let settings = CleanArgs {
        autosave_ms: 20,
        ..CleanArgs::default()
    };
    let state = AppState::new(settings, Arc::new(MemoryStore::new()));
    let id = state
        .start_session(RoundConfig::new("Portsmouth", 6, 3))
        .await
        .unwrap();
    (state, id)
}

#[tokio::test]
async fn test_timer_saves_full_end() -> Result<(), Box<dyn std::error::Error>> {
    let (state, id) = live_state().await;
    let session = state.session(id).await?;
    {
        let mut entry = session.lock().await;
        for arrow in arrows(&["X", "10", "9"]) {
            dispatch(&session, &mut entry, Msg::RecordArrow(arrow))?;
        }
        assert_eq!(entry.model.ends.len(), 0);
    }
    tokio::time::sleep(Duration::from_millis(120)).await;
    let entry = session.lock().await;
    assert_eq!(entry.model.ends.len(), 1);
    assert_eq!(entry.model.total_score(), 29);
    Ok(())
}

#[tokio::test]
async fn test_undo_before_timer_keeps_end_open() -> Result<(), Box<dyn std::error::Error>> {
    let (state, id) = live_state().await;
    let session = state.session(id).await?;
    {
        let mut entry = session.lock().await;
        for arrow in arrows(&["X", "10", "9"]) {
            dispatch(&session, &mut entry, Msg::RecordArrow(arrow))?;
        }
        dispatch(&session, &mut entry, Msg::UndoLast)?;
    }
    tokio::time::sleep(Duration::from_millis(120)).await;
    let entry = session.lock().await;
    assert!(entry.model.ends.is_empty());
    assert_eq!(entry.model.open_end.arrows, arrows(&["X", "10"]));
    Ok(())
}

#[tokio::test]
async fn test_idle_sessions_are_evicted() -> Result<(), Box<dyn std::error::Error>> {
    let settings = CleanArgs {
        session_idle: Duration::from_millis(200),
        ..CleanArgs::default()
    };
    let state = AppState::new(settings, Arc::new(MemoryStore::new()));
    let kept = state.start_session(RoundConfig::new("Portsmouth", 6, 3)).await?;
    let abandoned = state.start_session(RoundConfig::new("Portsmouth", 6, 3)).await?;

    tokio::time::sleep(Duration::from_millis(120)).await;
    state.session(kept).await?;
    tokio::time::sleep(Duration::from_millis(120)).await;

    // starting a session sweeps the idle ones first
    let fresh = state.start_session(RoundConfig::new("Portsmouth", 6, 3)).await?;
    assert!(state.session(kept).await.is_ok());
    assert!(state.session(fresh).await.is_ok());
    assert!(matches!(
        state.session(abandoned).await,
        Err(ScoringError::NotFound(_))
    ));
    assert_eq!(state.live_sessions().await, 2);

    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(state.evict_idle(Duration::ZERO).await, 2);
    assert_eq!(state.live_sessions().await, 0);
    Ok(())
}
