//! Configuration module for environment variable parsing.
//!
//! Every setting has a default so the server and the one-shot sender both
//! start against a local delivery service without any environment at all.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::campaign::CampaignSettings;

/// Fallback recipient name used when a campaign leaves it blank.
pub const DEFAULT_RECIPIENT_NAME: &str = "Valued Customer";

/// Fallback offer line used when a campaign leaves it blank.
pub const DEFAULT_OFFER: &str = "Special Offer";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote delivery service
    pub delivery_api_url: String,

    /// Per-request timeout for calls to the delivery service
    pub request_timeout_ms: u64,

    /// Pause between consecutive dispatch calls of one campaign
    pub send_interval_ms: u64,

    /// Port for the web server to listen on
    pub port: u16,

    /// Recipient name substituted when the campaign leaves it blank
    pub default_recipient_name: String,

    /// Offer line substituted when the campaign leaves it blank
    pub default_offer: String,

    /// Number of log records requested when the caller gives no limit
    pub email_log_limit: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            delivery_api_url: env::var("DELIVERY_API_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),

            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 10_000),

            send_interval_ms: parse_or("SEND_INTERVAL_MS", 0),

            port: parse_or("PORT", 8080),

            default_recipient_name: non_blank("DEFAULT_RECIPIENT_NAME")
                .unwrap_or_else(|| DEFAULT_RECIPIENT_NAME.to_string()),

            default_offer: non_blank("DEFAULT_OFFER").unwrap_or_else(|| DEFAULT_OFFER.to_string()),

            email_log_limit: parse_or("EMAIL_LOG_LIMIT", 50),
        }
    }

    /// Timeout applied to every delivery service request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Campaign composition settings derived from this configuration.
    pub fn campaign_settings(&self) -> CampaignSettings {
        CampaignSettings {
            default_name: self.default_recipient_name.clone(),
            default_offer: self.default_offer.clone(),
            send_interval: Duration::from_millis(self.send_interval_ms),
        }
    }
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or malformed.
fn parse_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, default = ?default, "Invalid value, using default");
            default
        }
    }
}

/// Read an environment variable, treating an all-whitespace value as unset.
fn non_blank(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
