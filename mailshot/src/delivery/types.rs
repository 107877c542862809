//! Wire types for the remote delivery service.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::campaign::EmailContext;

/// The four dispatch operations exposed by the delivery service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    SendTemplated,
    ScheduleTemplated,
    SendPersonalized,
    SchedulePersonalized,
}

impl Operation {
    /// Endpoint path relative to the service root.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::SendTemplated => "api/send-email",
            Operation::ScheduleTemplated => "api/schedule-email",
            Operation::SendPersonalized => "api/send-personalized-email",
            Operation::SchedulePersonalized => "api/schedule-personalized-email",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SendTemplated => "send-templated",
            Operation::ScheduleTemplated => "schedule-templated",
            Operation::SendPersonalized => "send-personalized",
            Operation::SchedulePersonalized => "schedule-personalized",
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(
            self,
            Operation::ScheduleTemplated | Operation::SchedulePersonalized
        )
    }
}

// =============================================================================
// Schedule timestamps
// =============================================================================

/// Schedule timestamps as the delivery service reads them: local wall-clock
/// time without an offset. The service compares them against its own naive
/// `now()`, so an offset on the wire breaks every scheduled request.
pub mod local_time {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Format written on the wire.
    pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    /// Accepted input formats. The second one is what an HTML
    /// `datetime-local` field submits.
    const INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

    /// Parse a schedule timestamp. Values carrying an offset are converted
    /// to local time.
    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();

        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Local).naive_local());
        }

        INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub fn format(at: &NaiveDateTime) -> String {
        at.format(WIRE_FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_str(&format(at)),
            None => serializer.serialize_none(),
        }
    }

    /// An empty string counts as no timestamp, as the form sends it.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;

        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse(value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid schedule time: {}", value))),
        }
    }
}

// =============================================================================
// Dispatch payloads
// =============================================================================

/// Context + template payload, rendered by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatedEmailRequest {
    pub recipient: String,
    pub subject: String,
    pub context: EmailContext,
    /// Empty string selects the service's default template
    #[serde(default)]
    pub template: String,
    #[serde(default, with = "local_time", skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<NaiveDateTime>,
}

/// Verbatim body payload, sent without any rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedEmailRequest {
    pub recipient: String,
    pub subject: String,
    pub email_body: String,
    #[serde(default, with = "local_time", skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeliveryRequest {
    Templated(TemplatedEmailRequest),
    Personalized(PersonalizedEmailRequest),
}

impl DeliveryRequest {
    pub fn recipient(&self) -> &str {
        match self {
            DeliveryRequest::Templated(r) => &r.recipient,
            DeliveryRequest::Personalized(r) => &r.recipient,
        }
    }
}

/// Success acknowledgement from any dispatch operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryAck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// Present for scheduled operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

/// Failure body. `detail` is usually a string but validation failures carry
/// a structured list.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

// =============================================================================
// Collaborator query records
// =============================================================================

/// A campaign job waiting in the service's scheduler.
///
/// Timestamps are passed through as the service formats them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduledEmail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
    pub subject: String,
    pub schedule_time: Option<String>,
    pub status: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ScheduledEmail {
    pub fn display_recipient(&self) -> String {
        display_recipient(&self.recipient, &self.recipients)
    }
}

/// One record of the service's send log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailLogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
    pub subject: String,
    pub sent_at: Option<String>,
    pub success: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl EmailLogEntry {
    pub fn display_recipient(&self) -> String {
        display_recipient(&self.recipient, &self.recipients)
    }

    /// Bulk records carry per-recipient results instead of a flag.
    pub fn status(&self) -> &'static str {
        match self.success {
            Some(true) => "Sent",
            Some(false) => "Failed",
            None => "Unknown",
        }
    }
}

fn display_recipient(recipient: &Option<String>, recipients: &[String]) -> String {
    match recipient {
        Some(r) if !r.is_empty() => r.clone(),
        _ => recipients.join(", "),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScheduledEmailsResponse {
    #[serde(default)]
    pub scheduled_emails: Vec<ScheduledEmail>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EmailLogsResponse {
    #[serde(default)]
    pub logs: Vec<EmailLogEntry>,
}
