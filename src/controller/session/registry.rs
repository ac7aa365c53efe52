use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::args::CleanArgs;
use crate::error::ScoringError;
use crate::magnifier::MagnifierController;
use crate::model::RoundConfig;
use crate::mvu::session::SessionModel;
use crate::scoresheet::Signatures;
use crate::storage::SubmissionStore;
use crate::target::TargetFace;

/// One archer's live round plus the input surfaces attached to it.
#[derive(Debug)]
pub struct SessionEntry {
    pub model: SessionModel,
    pub face: TargetFace,
    pub gesture: MagnifierController,
    pub signatures: Signatures,
}

pub type SharedSession = Arc<Mutex<SessionEntry>>;

struct Slot {
    session: SharedSession,
    touched: Instant,
}

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashMap<u64, Slot>>>,
    next_id: Arc<AtomicU64>,
    pub store: Arc<dyn SubmissionStore>,
    pub settings: Arc<CleanArgs>,
}

impl AppState {
    #[must_use]
    pub fn new(settings: CleanArgs, store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            store,
            settings: Arc::new(settings),
        }
    }

    /// # Errors
    ///
    /// Returns `ScoringError::InvalidConfig` if the round configuration is unusable.
    pub async fn start_session(&self, config: RoundConfig) -> Result<u64, ScoringError> {
        self.evict_idle(self.settings.session_idle).await;
        let face = TargetFace::for_round(&config);
        let model = SessionModel::new(config, self.settings.autosave_ms)?;
        let entry = SessionEntry {
            gesture: MagnifierController::new(face, self.settings.magnifier),
            face,
            model,
            signatures: Signatures::default(),
        };
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        log::info!(
            "session {id}: started {} ({} arrows, {} per end)",
            entry.model.config.round_name,
            entry.model.config.total_arrows,
            entry.model.config.arrows_per_end
        );
        let slot = Slot {
            session: Arc::new(Mutex::new(entry)),
            touched: Instant::now(),
        };
        self.sessions.write().await.insert(id, slot);
        Ok(id)
    }

    /// Looks up a live session and marks it as used.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::NotFound` if no live session has this id.
    pub async fn session(&self, id: u64) -> Result<SharedSession, ScoringError> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .get_mut(&id)
            .ok_or_else(|| ScoringError::NotFound(format!("session {id}")))?;
        slot.touched = Instant::now();
        Ok(slot.session.clone())
    }

    /// Drops every session not looked up within `max_idle`. Returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, slot| {
            let keep = slot.touched.elapsed() <= max_idle;
            if !keep {
                log::info!("session {id}: evicted after {max_idle:?} idle");
            }
            keep
        });
        before - sessions.len()
    }

    pub async fn live_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn discard(&self, id: u64) {
        if self.sessions.write().await.remove(&id).is_some() {
            log::debug!("session {id}: discarded");
        }
    }
}
