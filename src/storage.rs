use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::RoundResult;
use crate::scoresheet::ScoresheetImages;
use crate::submission::Formality;

#[derive(Debug, Clone)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StorageError {}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StorageError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Everything the upload collaborator receives for one finished round.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub result: RoundResult,
    pub scoresheet: ScoresheetImages,
    pub formality: Formality,
    pub competition_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredSubmission {
    pub id: u64,
    pub submitted_at: DateTime<Utc>,
    pub formality: Formality,
    pub competition_name: Option<String>,
    pub result: RoundResult,
    #[serde(skip)]
    pub scoresheet: ScoresheetImages,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionSummary {
    pub id: u64,
    pub submitted_at: DateTime<Utc>,
    pub round_name: String,
    pub total_score: u32,
    pub hits: u32,
    pub golds: u32,
    pub formality: Formality,
    pub competition_name: Option<String>,
    pub signed: bool,
}

impl From<&StoredSubmission> for SubmissionSummary {
    fn from(s: &StoredSubmission) -> Self {
        Self {
            id: s.id,
            submitted_at: s.submitted_at,
            round_name: s.result.round_name.clone(),
            total_score: s.result.total_score,
            hits: s.result.hits,
            golds: s.result.golds,
            formality: s.formality,
            competition_name: s.competition_name.clone(),
            signed: s.scoresheet.signed.is_some(),
        }
    }
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn store_submission(&self, submission: NewSubmission) -> Result<u64, StorageError>;
    async fn list_submissions(&self) -> Result<Vec<SubmissionSummary>, StorageError>;
    async fn get_submission(&self, id: u64) -> Result<StoredSubmission, StorageError>;
}

/// Stand-in for the hosted backend; keeps everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<Vec<StoredSubmission>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn store_submission(&self, submission: NewSubmission) -> Result<u64, StorageError> {
        let mut rows = self.rows.write().await;
        let id = rows.last().map_or(1, |r| r.id + 1);
        rows.push(StoredSubmission {
            id,
            submitted_at: Utc::now(),
            formality: submission.formality,
            competition_name: submission.competition_name,
            result: submission.result,
            scoresheet: submission.scoresheet,
        });
        Ok(id)
    }

    async fn list_submissions(&self) -> Result<Vec<SubmissionSummary>, StorageError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().map(SubmissionSummary::from).collect())
    }

    async fn get_submission(&self, id: u64) -> Result<StoredSubmission, StorageError> {
        let rows = self.rows.read().await;
        rows.iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StorageError::new(format!("submission {id} not found")))
    }
}
