use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::scoresheet::{ScoresheetImages, Signatures};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    #[default]
    Informal,
    Formal,
    Competition,
}

impl Formality {
    #[must_use]
    pub fn requires_signatures(self) -> bool {
        !matches!(self, Self::Informal)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SubmitRequest {
    #[serde(default)]
    pub formality: Formality,
    #[serde(default)]
    pub competition_name: Option<String>,
}

impl SubmitRequest {
    /// Checked before anything is rasterized or stored.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Validation` naming the first unmet requirement.
    pub fn validate(&self, signatures: &Signatures) -> Result<(), ScoringError> {
        if self.formality == Formality::Competition
            && self
                .competition_name
                .as_deref()
                .is_none_or(|name| name.trim().is_empty())
        {
            return Err(ScoringError::Validation(
                "a competition submission needs the competition name".into(),
            ));
        }
        if self.formality.requires_signatures() {
            let missing = signatures.missing();
            if !missing.is_empty() {
                let roles: Vec<String> = missing.iter().map(ToString::to_string).collect();
                return Err(ScoringError::Validation(format!(
                    "missing signature: {}",
                    roles.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ScoringError::Validation` if a formal submission has no signed scoresheet.
    pub fn check_attachment(&self, images: &ScoresheetImages) -> Result<(), ScoringError> {
        if self.formality.requires_signatures() && images.signed.is_none() {
            return Err(ScoringError::Validation(
                "a signed scoresheet is required for formal submissions".into(),
            ));
        }
        Ok(())
    }
}
