//! Campaign composition and dispatch.
//!
//! ## Flow
//!
//! ```text
//! RawCampaignInput → parse → align → build_plan → dispatch_all → aggregate → CampaignReport
//! ```
//!
//! Validation happens entirely inside `build_plan`, so a rejected campaign
//! makes zero delivery calls. Once dispatch starts every job is attempted.

pub mod align;
pub mod dispatch;
pub mod error;
pub mod mode;
pub mod parser;
pub mod result;
pub mod types;

use std::time::Duration;

use chrono::Local;
use tracing::{error, info, warn};

use crate::config::{DEFAULT_OFFER, DEFAULT_RECIPIENT_NAME};
use crate::delivery::DeliveryApi;

pub use align::{align, align_slots, sync_slots};
pub use dispatch::dispatch_all;
pub use error::{CampaignError, Result, ValidationError};
pub use mode::{build_plan, resolve_timing, select_mode};
pub use parser::{parse_list, parse_message_blocks, parse_recipients};
pub use result::{aggregate, campaign_message};
pub use types::{
    CampaignFlags, CampaignJob, CampaignPlan, CampaignReport, CampaignResult, CompositionMode,
    EmailContext, JobContent, JobOutcome, RawCampaignInput, Timing,
};

/// Settings that shape every campaign but are not part of the submission.
#[derive(Debug, Clone)]
pub struct CampaignSettings {
    pub default_name: String,
    pub default_offer: String,
    /// Pause between consecutive delivery calls
    pub send_interval: Duration,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_RECIPIENT_NAME.to_string(),
            default_offer: DEFAULT_OFFER.to_string(),
            send_interval: Duration::ZERO,
        }
    }
}

/// Run one campaign submission end to end.
///
/// Per-recipient delivery failures are reported in the result; only
/// pre-flight rejections and composition defects come back as `Err`.
pub async fn run_campaign<D: DeliveryApi>(
    api: &D,
    input: RawCampaignInput,
    settings: &CampaignSettings,
) -> Result<CampaignReport> {
    let plan = match build_plan(input, settings, Local::now().naive_local()) {
        Ok(plan) => plan,
        Err(e) => {
            warn!(reason = %e, "campaign_rejected");
            return Err(e.into());
        }
    };

    let job_count = plan.jobs.len();
    info!(
        mode = plan.mode.as_str(),
        scheduled = plan.timing.schedule_time().is_some(),
        jobs = job_count,
        "campaign_dispatch_start"
    );

    let outcomes = dispatch_all(api, plan.jobs, settings.send_interval).await;

    // dispatch_all yields one outcome per job; a mismatch is a dispatcher bug
    if outcomes.len() != job_count {
        error!(
            expected = job_count,
            actual = outcomes.len(),
            "campaign_outcome_count_mismatch"
        );
        return Err(CampaignError::Internal(format!(
            "expected {} outcomes, got {}",
            job_count,
            outcomes.len()
        )));
    }

    let result = aggregate(&outcomes);
    let message = campaign_message(plan.mode, &result);

    info!(
        mode = plan.mode.as_str(),
        succeeded = result.succeeded_count,
        total = result.total_jobs,
        "campaign_dispatch_complete"
    );

    Ok(CampaignReport {
        mode: plan.mode,
        schedule_time: plan.timing.schedule_time(),
        message,
        result,
    })
}
