//! HTTP client for the delivery service.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};
use url::Url;

use super::types::{
    DeliveryAck, DeliveryRequest, EmailLogEntry, EmailLogsResponse, ErrorBody, Operation,
    ScheduledEmail, ScheduledEmailsResponse,
};
use super::{DeliveryApi, DeliveryError};

/// Message used when the service acknowledges without saying anything.
const DEFAULT_ACK_MESSAGE: &str = "Email sent successfully!";

/// Shared HTTP client bound to one delivery service.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    http: Client,
    base_url: Url,
}

impl DeliveryClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid delivery API url: {}", base_url))?;

        // Url::join replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, DeliveryError> {
        Ok(self.base_url.join(path)?)
    }

    /// Campaign jobs currently waiting in the service's scheduler.
    pub async fn fetch_scheduled_emails(&self) -> Result<Vec<ScheduledEmail>, DeliveryError> {
        let url = self.endpoint("api/scheduled-emails")?;
        let body: ScheduledEmailsResponse = self.get_json(url).await?;

        info!(count = body.scheduled_emails.len(), "delivery_scheduled_fetched");
        Ok(body.scheduled_emails)
    }

    /// The most recent `limit` send log records, newest first.
    pub async fn fetch_email_logs(&self, limit: u32) -> Result<Vec<EmailLogEntry>, DeliveryError> {
        let mut url = self.endpoint("api/email-logs")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let body: EmailLogsResponse = self.get_json(url).await?;

        info!(count = body.logs.len(), limit = limit, "delivery_logs_fetched");
        Ok(body.logs)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DeliveryError> {
        let resp = self.http.get(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "delivery_query_failed");
            DeliveryError::Transport(e)
        })?;

        read_json(resp).await
    }
}

impl DeliveryApi for DeliveryClient {
    async fn deliver(
        &self,
        operation: Operation,
        request: &DeliveryRequest,
    ) -> Result<String, DeliveryError> {
        let url = self.endpoint(operation.path())?;

        let resp = match self.http.post(url).json(request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                if e.is_timeout() {
                    error!(
                        operation = operation.as_str(),
                        recipient = %request.recipient(),
                        error = %e,
                        "delivery_request_timeout"
                    );
                } else {
                    error!(
                        operation = operation.as_str(),
                        recipient = %request.recipient(),
                        error = %e,
                        "delivery_request_error"
                    );
                }
                return Err(DeliveryError::Transport(e));
            }
        };

        let ack: DeliveryAck = read_json(resp).await?;

        info!(
            operation = operation.as_str(),
            scheduled = operation.is_scheduled(),
            recipient = %request.recipient(),
            ack_status = %ack.status,
            job_id = ?ack.job_id,
            "delivery_request_accepted"
        );

        if ack.message.is_empty() {
            Ok(DEFAULT_ACK_MESSAGE.to_string())
        } else {
            Ok(ack.message)
        }
    }
}

/// Decode a success body, or turn a failure status into `Rejected`.
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, DeliveryError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let detail = failure_detail(status, &body);
        warn!(status = status.as_u16(), detail = %detail, "delivery_request_rejected");
        return Err(DeliveryError::Rejected {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        warn!(
            error = %e,
            body_preview = %body.chars().take(200).collect::<String>(),
            "delivery_response_parse_failed"
        );
        DeliveryError::InvalidResponse(e.to_string())
    })
}

/// Extract the failure detail the service put in the body.
fn failure_detail(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) if !detail.is_null() => detail.to_string(),
        _ => format!("Request failed with status code {}", status.as_u16()),
    }
}
