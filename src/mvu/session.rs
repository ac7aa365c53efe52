use serde::Serialize;

use crate::error::ScoringError;
use crate::model::{
    Arrow, End, RoundConfig, RoundResult, ScoringSystem, is_legal, numeric_value, tally,
};

pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum EndState {
    Empty,
    Filling(usize),
    Ready,
    EditingEnd(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Appended { completed: bool },
    Replaced(usize),
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionModel {
    pub config: RoundConfig,
    pub system: ScoringSystem,
    pub ends: Vec<End>,
    pub open_end: End,
    pub editing: Option<usize>,
    /// 1-based number of the end being shot next.
    pub current_end: usize,
    /// Bumped on every change to the open end; auto-save timers compare against it.
    pub generation: u64,
    pub autosave_delay_ms: u64,
    pub complete: bool,
    #[serde(skip)]
    pub error: Option<ScoringError>,
}

impl SessionModel {
    /// # Errors
    ///
    /// Returns `ScoringError::InvalidConfig` if the round configuration is unusable.
    pub fn new(config: RoundConfig, autosave_delay_ms: u64) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self {
            system: config.scoring_system(),
            config,
            ends: Vec::new(),
            open_end: End::default(),
            editing: None,
            current_end: 1,
            generation: 0,
            autosave_delay_ms,
            complete: false,
            error: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> EndState {
        if let Some(i) = self.editing {
            return EndState::EditingEnd(i);
        }
        match self.open_end.len() {
            0 => EndState::Empty,
            n if n >= self.config.arrows_per_end => EndState::Ready,
            n => EndState::Filling(n),
        }
    }

    fn open_end_full(&self) -> bool {
        self.open_end.len() >= self.config.arrows_per_end
    }

    /// Whether `record_arrow` would keep `arrow` in the current state.
    #[must_use]
    pub fn accepts(&self, arrow: &Arrow) -> bool {
        !self.open_end_full()
            && (!self.complete || self.editing.is_some())
            && is_legal(arrow.value, self.system)
    }

    /// Appends to the open end. Full ends, finished rounds and values the round cannot score are dropped.
    pub fn record_arrow(&mut self, arrow: Arrow) -> bool {
        if !self.accepts(&arrow) {
            log::debug!(
                "{}: dropping {} ({} of {} in the open end)",
                self.config.round_name,
                arrow.value,
                self.open_end.len(),
                self.config.arrows_per_end
            );
            return false;
        }
        self.open_end.arrows.push(arrow);
        self.generation += 1;
        true
    }

    pub fn undo_last(&mut self) -> bool {
        if self.open_end.arrows.pop().is_some() {
            self.generation += 1;
            true
        } else {
            false
        }
    }

    /// # Errors
    ///
    /// Returns `ScoringError::IncompleteEnd` without touching any state if the open end is not full.
    pub fn save_end(&mut self) -> Result<SaveOutcome, ScoringError> {
        if !self.open_end_full() {
            return Err(ScoringError::IncompleteEnd {
                recorded: self.open_end.len(),
                required: self.config.arrows_per_end,
            });
        }
        let end = std::mem::take(&mut self.open_end);
        self.generation += 1;

        if let Some(i) = self.editing.take() {
            self.ends[i] = end;
            return Ok(SaveOutcome::Replaced(i));
        }

        self.ends.push(end);
        self.current_end += 1;
        let reached = self.ends.len() * self.config.arrows_per_end >= self.config.total_arrows;
        let completed = reached && !self.complete;
        if completed {
            self.complete = true;
        }
        Ok(SaveOutcome::Appended { completed })
    }

    /// Copies closed end `index` into the open slot. Whatever was in the open slot is discarded.
    /// The stored end keeps its place in the table until the edit is saved, but is left out of
    /// the totals and the drawn arrows so nothing counts twice.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::EndNotFound` if there is no closed end at `index`.
    pub fn edit_end(&mut self, index: usize) -> Result<(), ScoringError> {
        let end = self
            .ends
            .get(index)
            .cloned()
            .ok_or(ScoringError::EndNotFound(index))?;
        if !self.open_end.is_empty() && self.editing != Some(index) {
            log::info!(
                "{}: discarding {} unsaved arrows to edit end {}",
                self.config.round_name,
                self.open_end.len(),
                index + 1
            );
        }
        self.open_end = end;
        self.editing = Some(index);
        self.generation += 1;
        Ok(())
    }

    /// Closed ends, minus the one under edit.
    fn settled_ends(&self) -> impl Iterator<Item = &End> {
        self.ends
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.editing != Some(*i))
            .map(|(_, end)| end)
    }

    fn settled_tally(&self) -> (u32, u32, u32) {
        tally(self.settled_ends().flat_map(|e| &e.arrows), self.system)
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.settled_tally().0
    }

    #[must_use]
    pub fn hits(&self) -> u32 {
        self.settled_tally().1
    }

    #[must_use]
    pub fn golds(&self) -> u32 {
        self.settled_tally().2
    }

    #[must_use]
    pub fn end_subtotal(&self, index: usize) -> Option<u32> {
        self.ends
            .get(index)
            .map(|end| end.arrows.iter().map(|a| numeric_value(a.value)).sum())
    }

    #[must_use]
    pub fn open_end_subtotal(&self) -> u32 {
        self.open_end.arrows.iter().map(|a| numeric_value(a.value)).sum()
    }

    #[must_use]
    pub fn running_totals(&self) -> Vec<u32> {
        self.ends
            .iter()
            .scan(0, |running, end| {
                *running += end.arrows.iter().map(|a| numeric_value(a.value)).sum::<u32>();
                Some(*running)
            })
            .collect()
    }

    #[must_use]
    pub fn arrows_shot(&self) -> usize {
        self.ends.iter().map(End::len).sum()
    }

    /// Every arrow in closed ends, then the open end. An end under edit appears once, as the open end.
    #[must_use]
    pub fn all_arrows(&self) -> Vec<Arrow> {
        self.settled_ends()
            .flat_map(|e| e.arrows.iter().copied())
            .chain(self.open_end.arrows.iter().copied())
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let (total_score, hits, golds) = self.settled_tally();
        SessionSummary {
            round_name: self.config.round_name.clone(),
            state: self.state(),
            total_score,
            hits,
            golds,
            arrows_shot: self.arrows_shot(),
            total_arrows: self.config.total_arrows,
            current_end: self.current_end,
            complete: self.complete,
        }
    }

    #[must_use]
    pub fn finish(&self, target_image: Option<Vec<u8>>) -> RoundResult {
        let (total_score, hits, golds) = tally(self.ends.iter().flat_map(|e| &e.arrows), self.system);
        RoundResult {
            round_name: self.config.round_name.clone(),
            total_score,
            golds,
            hits,
            ends: self.ends.clone(),
            arrows_per_end: self.config.arrows_per_end,
            is_triple_spot: self.config.is_triple_spot,
            target_image,
        }
    }

    /// Pure transition: returns the next model and its effects, leaving `self` untouched.
    #[must_use]
    pub fn dispatch(&self, msg: Msg) -> (Self, Vec<Effect>) {
        let mut next = self.clone();
        let effects = update(&mut next, msg);
        (next, effects)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub round_name: String,
    pub state: EndState,
    pub total_score: u32,
    pub hits: u32,
    pub golds: u32,
    pub arrows_shot: usize,
    pub total_arrows: usize,
    pub current_end: usize,
    pub complete: bool,
}

#[derive(Debug, Clone)]
pub enum Msg {
    RecordArrow(Arrow),
    UndoLast,
    SaveEnd,
    EditEnd(usize),
    AutoSaveElapsed { generation: u64 },
    Failed(ScoringError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ScheduleAutoSave { generation: u64, delay_ms: u64 },
    AnnounceCompletion { total_score: u32 },
    Rejected(ScoringError),
}

fn save_effects(model: &mut SessionModel) -> Vec<Effect> {
    match model.save_end() {
        Ok(SaveOutcome::Appended { completed: true }) => vec![Effect::AnnounceCompletion {
            total_score: model.total_score(),
        }],
        Ok(_) => vec![],
        Err(e) => {
            model.error = Some(e.clone());
            vec![Effect::Rejected(e)]
        }
    }
}

pub fn update(model: &mut SessionModel, msg: Msg) -> Vec<Effect> {
    if !matches!(msg, Msg::Failed(_)) {
        model.error = None;
    }
    match msg {
        Msg::RecordArrow(arrow) => {
            if model.record_arrow(arrow)
                && model.state() == EndState::Ready
                && !model.complete
            {
                vec![Effect::ScheduleAutoSave {
                    generation: model.generation,
                    delay_ms: model.autosave_delay_ms,
                }]
            } else {
                vec![]
            }
        }
        Msg::UndoLast => {
            model.undo_last();
            vec![]
        }
        Msg::SaveEnd => save_effects(model),
        Msg::EditEnd(index) => match model.edit_end(index) {
            Ok(()) => vec![],
            Err(e) => {
                model.error = Some(e.clone());
                vec![Effect::Rejected(e)]
            }
        },
        Msg::AutoSaveElapsed { generation } => {
            if generation != model.generation {
                log::debug!(
                    "{}: stale auto-save (scheduled at generation {generation}, now {})",
                    model.config.round_name,
                    model.generation
                );
                vec![]
            } else if model.state() == EndState::Ready {
                save_effects(model)
            } else {
                vec![]
            }
        }
        Msg::Failed(e) => {
            model.error = Some(e);
            vec![]
        }
    }
}
