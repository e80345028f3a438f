//! Happy-hour submission form
//!
//! The draft is kept across failed attempts so the user can retry without
//! retyping; it is only reset after the server accepts it.

use crate::error::{FormError, SubmitError};
use crate::store::PlaceStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Whether the form adds a new place or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    New,
    Existing,
}

/// Day of the week a deal runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl std::str::FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sun" | "sunday" => Ok(Self::Sunday),
            "mon" | "monday" => Ok(Self::Monday),
            "tue" | "tuesday" => Ok(Self::Tuesday),
            "wed" | "wednesday" => Ok(Self::Wednesday),
            "thu" | "thursday" => Ok(Self::Thursday),
            "fri" | "friday" => Ok(Self::Friday),
            "sat" | "saturday" => Ok(Self::Saturday),
            other => Err(format!("unknown weekday '{other}'")),
        }
    }
}

/// Body of `POST /api/submit-happy-hour`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDraft {
    pub form_mode: FormMode,
    pub existing_place: String,
    pub place_name_he: String,
    pub place_name_en: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub category: String,
    pub days: Vec<Weekday>,
    pub instagram: String,
    pub reservation: String,
    pub notes: String,
}

impl SubmissionDraft {
    /// Draft for a new place
    #[must_use]
    pub fn new_place(name_he: impl Into<String>, name_en: impl Into<String>) -> Self {
        Self {
            form_mode: FormMode::New,
            place_name_he: name_he.into(),
            place_name_en: name_en.into(),
            ..Self::default()
        }
    }

    /// Draft updating a place already on the map
    #[must_use]
    pub fn update_of(existing: impl Into<String>) -> Self {
        Self {
            form_mode: FormMode::Existing,
            existing_place: existing.into(),
            ..Self::default()
        }
    }

    /// Check the draft before sending
    ///
    /// # Errors
    /// Returns the first missing or inconsistent field.
    pub fn validate(&self, store: &PlaceStore) -> Result<(), FormError> {
        match self.form_mode {
            FormMode::New => {
                if self.place_name_he.trim().is_empty() && self.place_name_en.trim().is_empty() {
                    return Err(FormError::MissingName);
                }
            }
            FormMode::Existing => {
                let existing = self.existing_place.trim();
                if existing.is_empty() {
                    return Err(FormError::MissingExistingPlace);
                }
                if store.is_loaded() && !store.contains(existing) {
                    return Err(FormError::UnknownExistingPlace(existing.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Answer of the submission endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
}

/// Destination for submissions
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Send a draft
    async fn submit(&self, draft: &SubmissionDraft) -> Result<SubmissionResponse, SubmitError>;
}

/// Holds the draft and guards against double submission
#[derive(Debug, Default)]
pub struct SubmissionControl {
    draft: SubmissionDraft,
    in_flight: bool,
}

impl SubmissionControl {
    /// Create control with an empty draft
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    /// Mutable access for form edits
    #[inline]
    pub fn draft_mut(&mut self) -> &mut SubmissionDraft {
        &mut self.draft
    }

    /// Replace the whole draft
    #[inline]
    pub fn set_draft(&mut self, draft: SubmissionDraft) {
        self.draft = draft;
    }

    /// Whether a submission is waiting for an answer
    #[inline]
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Validate and take a snapshot of the draft for sending
    ///
    /// # Errors
    /// [`SubmitError::InFlight`] while another submission is pending, or the
    /// form error that failed validation.
    pub fn begin(&mut self, store: &PlaceStore) -> Result<SubmissionDraft, crate::AppError> {
        if self.in_flight {
            return Err(SubmitError::InFlight.into());
        }
        self.draft.validate(store)?;
        self.in_flight = true;
        Ok(self.draft.clone())
    }

    /// Record the answer; an accepted draft is cleared, anything else kept
    pub fn finish(&mut self, accepted: bool) {
        self.in_flight = false;
        if accepted {
            self.draft = SubmissionDraft::default();
        }
    }
}
