//! Campaign-level errors.
//!
//! Per-job delivery failures never show up here; they are recorded in the
//! job's outcome instead.

use thiserror::Error;

pub type Result<T, E = CampaignError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CampaignError {
    /// Rejected before any network activity.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Defect in campaign composition itself; the remaining campaign is
    /// abandoned.
    #[error("Failed to send email")]
    Internal(String),
}

impl CampaignError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CampaignError::Validation(_))
    }
}

/// Pre-flight rejection, displayed verbatim to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter at least one recipient email address")]
    MissingRecipients,

    #[error("Please enter valid email addresses")]
    NoValidRecipients,

    #[error("Please enter at least one email subject")]
    MissingSubject,

    #[error("Please select a schedule time")]
    MissingScheduleTime,

    #[error("Schedule time must be in the future")]
    ScheduleTimeNotInFuture,

    /// `recipient` is the 1-based position in the parsed recipient list.
    #[error("Please provide email content for recipient {recipient}")]
    BlankPersonalizedBody { recipient: usize },
}
