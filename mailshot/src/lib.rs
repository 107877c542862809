//! Mailshot - email campaign composition and dispatch.
//!
//! This library turns a loosely structured campaign description into one
//! delivery request per recipient and dispatches them, strictly in order,
//! against a remote delivery service. Two binaries sit on top of it:
//! - `mailshot`: web server accepting campaign submissions
//! - `mailshot-send`: one-shot submission of a campaign JSON file
//!
//! ## Architecture
//!
//! ```text
//! Caller → campaign::run_campaign → DeliveryApi (HTTP) → delivery service
//! ```

pub mod campaign;
pub mod config;
pub mod delivery;
pub mod web;

// Re-export commonly used types
pub use campaign::{
    run_campaign, CampaignError, CampaignReport, CampaignResult, CampaignSettings,
    RawCampaignInput,
};
pub use config::Config;
pub use delivery::{DeliveryApi, DeliveryClient, DeliveryError};
pub use web::AppState;
