//! Web front door for campaign submission.
//!
//! This module provides a small axum router that:
//! - Accepts campaign submissions and runs them to completion
//! - Resizes the personalized body slots to match a recipient list
//! - Proxies the delivery service's scheduled-campaign and send-log queries

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{
    email_logs, health, scheduled_emails, submit_campaign, sync_personalized_slots, AppState,
    CampaignResponse, ErrorResponse, HealthResponse, SlotSyncRequest, SlotSyncResponse,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/campaigns", post(submit_campaign))
        .route("/campaigns/personalized-slots/sync", post(sync_personalized_slots))
        .route("/campaigns/scheduled", get(scheduled_emails))
        .route("/campaigns/logs", get(email_logs))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
