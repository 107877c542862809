//! Mode selection and job construction.
//!
//! Two business rules here are deliberately permissive and must stay as they
//! are:
//! - Bulk mode with at least one non-blank body slot is personalized. The
//!   personalization flag only reflects what the form shows; filled slots
//!   win over it, and with every slot blank the campaign is templated.
//! - Only personalized mode rejects a blank resolved body. Templated mode
//!   tolerates blank fallbacks and sends whatever the renderer produces.

use chrono::NaiveDateTime;

use super::align::{align, align_slots};
use super::error::ValidationError;
use super::parser::{parse_list, parse_message_blocks, parse_recipients};
use super::types::{
    CampaignFlags, CampaignJob, CampaignPlan, CompositionMode, EmailContext, JobContent,
    RawCampaignInput, Timing,
};
use super::CampaignSettings;

/// Choose the composition mode from the flags and the personalized slots.
pub fn select_mode(flags: &CampaignFlags, personalized_bodies: &[String]) -> CompositionMode {
    if !flags.is_bulk {
        return CompositionMode::Single;
    }

    let any_personalized = personalized_bodies.iter().any(|b| !b.trim().is_empty());

    if any_personalized {
        CompositionMode::BulkPersonalized
    } else {
        CompositionMode::BulkTemplated
    }
}

/// Resolve the timing mode. A scheduled campaign needs a future timestamp.
///
/// `schedule_time` and `now` are both local wall-clock times.
pub fn resolve_timing(
    flags: &CampaignFlags,
    schedule_time: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Result<Timing, ValidationError> {
    if !flags.is_scheduled {
        return Ok(Timing::Immediate);
    }

    match schedule_time {
        None => Err(ValidationError::MissingScheduleTime),
        Some(at) if at <= now => Err(ValidationError::ScheduleTimeNotInFuture),
        Some(at) => Ok(Timing::Scheduled(at)),
    }
}

/// Validate a submission and build its job list.
///
/// Every check runs before a single job exists, so a rejected campaign never
/// reaches the network.
pub fn build_plan(
    input: RawCampaignInput,
    settings: &CampaignSettings,
    now: NaiveDateTime,
) -> Result<CampaignPlan, ValidationError> {
    if input.recipients.trim().is_empty() {
        return Err(ValidationError::MissingRecipients);
    }

    let subjects = parse_list(&input.subjects);
    let fallback_subject = input.subject.trim().to_string();
    if subjects.is_empty() && fallback_subject.is_empty() {
        return Err(ValidationError::MissingSubject);
    }

    let timing = resolve_timing(&input.flags, input.schedule_time, now)?;

    let recipients = parse_recipients(&input.recipients);
    if recipients.is_empty() {
        return Err(ValidationError::NoValidRecipients);
    }

    let mode = select_mode(&input.flags, &input.personalized_bodies);
    let subjects = align(&recipients, &subjects, fallback_subject);
    let schedule_time = timing.schedule_time();

    let jobs = match mode {
        CompositionMode::Single => {
            let custom_message = parse_message_blocks(&input.bodies)
                .into_iter()
                .next()
                .unwrap_or_else(|| input.fallback_message.clone());

            vec![CampaignJob {
                recipient: recipients[0].clone(),
                subject: subjects[0].clone(),
                content: templated_content(&input, settings, custom_message),
                mode,
                schedule_time,
            }]
        }
        CompositionMode::BulkTemplated => {
            let blocks = parse_message_blocks(&input.bodies);
            let messages = align(&recipients, &blocks, input.fallback_message.clone());

            recipients
                .iter()
                .zip(subjects)
                .zip(messages)
                .map(|((recipient, subject), custom_message)| CampaignJob {
                    recipient: recipient.clone(),
                    subject,
                    content: templated_content(&input, settings, custom_message),
                    mode,
                    schedule_time,
                })
                .collect()
        }
        CompositionMode::BulkPersonalized => {
            let bodies = align_slots(&recipients, &input.personalized_bodies);

            if let Some(index) = bodies.iter().position(|b| b.trim().is_empty()) {
                return Err(ValidationError::BlankPersonalizedBody {
                    recipient: index + 1,
                });
            }

            recipients
                .iter()
                .zip(subjects)
                .zip(bodies)
                .map(|((recipient, subject), email_body)| CampaignJob {
                    recipient: recipient.clone(),
                    subject,
                    content: JobContent::Personalized { email_body },
                    mode,
                    schedule_time,
                })
                .collect()
        }
    };

    Ok(CampaignPlan { mode, timing, jobs })
}

fn templated_content(
    input: &RawCampaignInput,
    settings: &CampaignSettings,
    custom_message: String,
) -> JobContent {
    JobContent::Templated {
        context: EmailContext {
            name: or_default(&input.fallback_name, &settings.default_name),
            offer: or_default(&input.fallback_offer, &settings.default_offer),
            custom_message,
        },
        template: input.template.clone().unwrap_or_default(),
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
