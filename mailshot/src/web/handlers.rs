//! HTTP handlers for campaign submission and the collaborator queries.
//!
//! Submission runs the whole campaign inside the request: the response is
//! only sent once every job has been attempted.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::campaign::{
    parse_recipients, run_campaign, sync_slots, CampaignError, CampaignReport, CampaignSettings,
    RawCampaignInput,
};
use crate::delivery::{DeliveryClient, EmailLogEntry, ScheduledEmail};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub settings: Arc<CampaignSettings>,
    pub client: DeliveryClient,
}

impl AppState {
    pub fn new(config: Config, client: DeliveryClient) -> Self {
        let settings = config.campaign_settings();
        Self {
            config: Arc::new(config),
            settings: Arc::new(settings),
            client,
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            status: "error".to_string(),
            detail: detail.into(),
        }),
    )
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Campaign Submission
// =============================================================================

/// Campaign submission response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignResponse {
    /// "success", "partial" or "failed" depending on how many jobs succeeded
    pub status: String,
    #[serde(flatten)]
    pub report: CampaignReport,
}

/// Campaign submission endpoint.
///
/// Pre-flight rejections map to 400; per-recipient failures still return
/// 200 with the failures listed in the result.
pub async fn submit_campaign(
    State(state): State<AppState>,
    Json(input): Json<RawCampaignInput>,
) -> Result<Json<CampaignResponse>, ApiError> {
    info!(
        is_bulk = input.flags.is_bulk,
        is_personalized = input.flags.is_personalized,
        is_scheduled = input.flags.is_scheduled,
        personalized_slots = input.personalized_bodies.len(),
        "campaign_submission_received"
    );

    match run_campaign(&state.client, input, &state.settings).await {
        Ok(report) => {
            let status = if report.result.succeeded_count == report.result.total_jobs {
                "success"
            } else if report.result.succeeded_count == 0 {
                "failed"
            } else {
                "partial"
            };

            for failure in report.result.failures() {
                warn!(
                    recipient = %failure.recipient,
                    reason = %failure.message,
                    "campaign_recipient_failed"
                );
            }

            Ok(Json(CampaignResponse {
                status: status.to_string(),
                report,
            }))
        }
        Err(CampaignError::Validation(e)) => {
            warn!(reason = %e, "campaign_submission_rejected");
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e @ CampaignError::Internal(_)) => {
            error!(error = ?e, "campaign_submission_failed");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

// =============================================================================
// Personalized Slots
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotSyncRequest {
    pub recipients: String,
    pub personalized_bodies: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlotSyncResponse {
    pub recipient_count: usize,
    pub personalized_bodies: Vec<String>,
}

/// Resize the editable body slots after the recipient list changed.
pub async fn sync_personalized_slots(Json(req): Json<SlotSyncRequest>) -> Json<SlotSyncResponse> {
    let recipient_count = parse_recipients(&req.recipients).len();

    Json(SlotSyncResponse {
        recipient_count,
        personalized_bodies: sync_slots(recipient_count, &req.personalized_bodies),
    })
}

// =============================================================================
// Collaborator Queries
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduledEmailsResponse {
    pub scheduled_emails: Vec<ScheduledEmail>,
}

/// Proxy for the delivery service's scheduled campaigns.
pub async fn scheduled_emails(
    State(state): State<AppState>,
) -> Result<Json<ScheduledEmailsResponse>, ApiError> {
    match state.client.fetch_scheduled_emails().await {
        Ok(scheduled_emails) => Ok(Json(ScheduledEmailsResponse { scheduled_emails })),
        Err(e) => {
            error!(error = %e, "scheduled_emails_fetch_failed");
            Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailLogsResponse {
    pub logs: Vec<EmailLogEntry>,
}

/// Proxy for the delivery service's send log.
pub async fn email_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<EmailLogsResponse>, ApiError> {
    let limit = query.limit.unwrap_or(state.config.email_log_limit);

    match state.client.fetch_email_logs(limit).await {
        Ok(logs) => Ok(Json(EmailLogsResponse { logs })),
        Err(e) => {
            error!(error = %e, limit = limit, "email_logs_fetch_failed");
            Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}
