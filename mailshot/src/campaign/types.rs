//! Campaign data model.
//!
//! `RawCampaignInput` is what the caller submits. Everything else here is
//! derived from it during one submission and dropped once the
//! `CampaignResult` has been returned.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::delivery::{
    local_time, DeliveryRequest, Operation, PersonalizedEmailRequest, TemplatedEmailRequest,
};

// =============================================================================
// Caller input
// =============================================================================

/// Campaign as submitted by the form layer.
///
/// Multi-value fields arrive as loosely delimited free text. The parsed
/// recipient list is the cardinality anchor: subjects, message blocks and
/// personalized bodies are all aligned to its length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCampaignInput {
    /// Recipients separated by commas, semicolons or newlines
    pub recipients: String,
    /// Single subject used when `subjects` yields nothing
    pub subject: String,
    /// Subjects separated by commas, semicolons or newlines
    pub subjects: String,
    /// Custom message blocks separated by blank lines
    pub bodies: String,
    /// One verbatim body slot per intended recipient
    pub personalized_bodies: Vec<String>,
    pub flags: CampaignFlags,
    /// Local wall-clock time, as a `datetime-local` field submits it
    #[serde(with = "local_time", skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<NaiveDateTime>,
    pub fallback_name: String,
    pub fallback_offer: String,
    pub fallback_message: String,
    /// Markup template rendered by the delivery service
    pub template: Option<String>,
}

/// User-selected campaign switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignFlags {
    pub is_bulk: bool,
    pub is_personalized: bool,
    pub is_scheduled: bool,
}

// =============================================================================
// Derived entities
// =============================================================================

/// How the content of every job in a campaign is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionMode {
    /// One templated job for the first recipient
    Single,
    /// One templated job per recipient, rendered remotely
    BulkTemplated,
    /// One verbatim body per recipient, no remote rendering
    BulkPersonalized,
}

impl CompositionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositionMode::Single => "single",
            CompositionMode::BulkTemplated => "bulk_templated",
            CompositionMode::BulkPersonalized => "bulk_personalized",
        }
    }
}

/// When the delivery service should send the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Immediate,
    Scheduled(NaiveDateTime),
}

impl Timing {
    pub fn schedule_time(&self) -> Option<NaiveDateTime> {
        match self {
            Timing::Immediate => None,
            Timing::Scheduled(at) => Some(*at),
        }
    }
}

/// Context handed to the remote template renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContext {
    pub name: String,
    pub offer: String,
    pub custom_message: String,
}

/// Content of a single job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobContent {
    Templated {
        context: EmailContext,
        template: String,
    },
    Personalized {
        email_body: String,
    },
}

/// One fully resolved, per-recipient unit of dispatch work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignJob {
    pub recipient: String,
    pub subject: String,
    pub content: JobContent,
    pub mode: CompositionMode,
    pub schedule_time: Option<NaiveDateTime>,
}

impl CampaignJob {
    /// The remote operation this job must be submitted to.
    pub fn operation(&self) -> Operation {
        match (&self.content, self.schedule_time.is_some()) {
            (JobContent::Templated { .. }, false) => Operation::SendTemplated,
            (JobContent::Templated { .. }, true) => Operation::ScheduleTemplated,
            (JobContent::Personalized { .. }, false) => Operation::SendPersonalized,
            (JobContent::Personalized { .. }, true) => Operation::SchedulePersonalized,
        }
    }

    /// Wire payload for the delivery service.
    pub fn to_request(&self) -> DeliveryRequest {
        match &self.content {
            JobContent::Templated { context, template } => {
                DeliveryRequest::Templated(TemplatedEmailRequest {
                    recipient: self.recipient.clone(),
                    subject: self.subject.clone(),
                    context: context.clone(),
                    template: template.clone(),
                    schedule_time: self.schedule_time,
                })
            }
            JobContent::Personalized { email_body } => {
                DeliveryRequest::Personalized(PersonalizedEmailRequest {
                    recipient: self.recipient.clone(),
                    subject: self.subject.clone(),
                    email_body: email_body.clone(),
                    schedule_time: self.schedule_time,
                })
            }
        }
    }
}

/// Jobs built for one submission, in recipient order.
#[derive(Debug, Clone)]
pub struct CampaignPlan {
    pub mode: CompositionMode,
    pub timing: Timing,
    pub jobs: Vec<CampaignJob>,
}

/// Recorded result of one dispatched job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub recipient: String,
    pub success: bool,
    pub message: String,
}

/// Campaign-level summary of every attempted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignResult {
    pub total_jobs: usize,
    pub succeeded_count: usize,
    /// "{succeeded}/{total} sent successfully"
    pub summary: String,
    pub outcomes: Vec<JobOutcome>,
}

impl CampaignResult {
    pub fn failed_count(&self) -> usize {
        self.total_jobs - self.succeeded_count
    }

    /// Outcomes that did not succeed, in dispatch order.
    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }
}

/// What the caller gets back for a dispatched campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignReport {
    pub mode: CompositionMode,
    #[serde(default, with = "local_time", skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<NaiveDateTime>,
    /// Operator-facing message
    pub message: String,
    pub result: CampaignResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn nine_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn templated_job(schedule_time: Option<NaiveDateTime>) -> CampaignJob {
        CampaignJob {
            recipient: "a@example.com".to_string(),
            subject: "Hello".to_string(),
            content: JobContent::Templated {
                context: EmailContext {
                    name: "Ann".to_string(),
                    offer: "10% off".to_string(),
                    custom_message: "See you".to_string(),
                },
                template: String::new(),
            },
            mode: CompositionMode::BulkTemplated,
            schedule_time,
        }
    }

    #[test]
    fn test_job_operation_routing() {
        let at = nine_am();

        assert_eq!(templated_job(None).operation(), Operation::SendTemplated);
        assert_eq!(templated_job(Some(at)).operation(), Operation::ScheduleTemplated);

        let personalized = CampaignJob {
            content: JobContent::Personalized {
                email_body: "Hi Ann".to_string(),
            },
            mode: CompositionMode::BulkPersonalized,
            ..templated_job(None)
        };
        assert_eq!(personalized.operation(), Operation::SendPersonalized);

        let scheduled = CampaignJob {
            schedule_time: Some(at),
            ..personalized
        };
        assert_eq!(scheduled.operation(), Operation::SchedulePersonalized);
    }

    #[test]
    fn test_raw_input_deserialization_minimal() {
        let json = r#"{"recipients": "a@example.com", "subjects": "Hi"}"#;

        let input: RawCampaignInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.recipients, "a@example.com");
        assert_eq!(input.flags, CampaignFlags::default());
        assert!(input.personalized_bodies.is_empty());
        assert!(input.schedule_time.is_none());
        assert!(input.template.is_none());
    }

    #[test]
    fn test_raw_input_deserialization_scheduled() {
        let json = r#"{
            "recipients": "a@example.com\nb@example.com",
            "flags": {"is_bulk": true, "is_scheduled": true},
            "schedule_time": "2030-01-01T09:00"
        }"#;

        let input: RawCampaignInput = serde_json::from_str(json).unwrap();
        assert!(input.flags.is_bulk);
        assert!(!input.flags.is_personalized);
        assert!(input.flags.is_scheduled);
        assert_eq!(input.schedule_time, Some(nine_am()));
    }

    #[test]
    fn test_raw_input_empty_schedule_time_is_unset() {
        let json = r#"{"recipients": "a@example.com", "schedule_time": ""}"#;

        let input: RawCampaignInput = serde_json::from_str(json).unwrap();
        assert!(input.schedule_time.is_none());
    }

    #[test]
    fn test_raw_input_rejects_unparseable_schedule_time() {
        let json = r#"{"recipients": "a@example.com", "schedule_time": "tomorrow"}"#;

        assert!(serde_json::from_str::<RawCampaignInput>(json).is_err());
    }

    #[test]
    fn test_report_schedule_time_serializes_without_offset() {
        let report = CampaignReport {
            mode: CompositionMode::Single,
            schedule_time: Some(nine_am()),
            message: "ok".to_string(),
            result: CampaignResult {
                total_jobs: 0,
                succeeded_count: 0,
                summary: "0/0 sent successfully".to_string(),
                outcomes: Vec::new(),
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["schedule_time"], "2030-01-01T09:00:00");
    }

    #[test]
    fn test_result_failures() {
        let result = CampaignResult {
            total_jobs: 2,
            succeeded_count: 1,
            summary: "1/2 sent successfully".to_string(),
            outcomes: vec![
                JobOutcome {
                    recipient: "a@example.com".to_string(),
                    success: true,
                    message: "ok".to_string(),
                },
                JobOutcome {
                    recipient: "b@example.com".to_string(),
                    success: false,
                    message: "boom".to_string(),
                },
            ],
        };

        assert_eq!(result.failed_count(), 1);
        let failed: Vec<_> = result.failures().map(|o| o.recipient.as_str()).collect();
        assert_eq!(failed, vec!["b@example.com"]);
    }
}
