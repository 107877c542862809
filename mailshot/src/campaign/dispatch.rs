//! Sequential job dispatch.
//!
//! Jobs go out strictly one at a time in recipient order. A failed call is
//! recorded and the next job is attempted anyway; nothing short-circuits a
//! campaign once dispatch has begun.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::sleep;
use tracing::{info, warn};

use super::types::{CampaignJob, JobOutcome};
use crate::delivery::DeliveryApi;

/// Dispatch every job in order and return one outcome per job.
///
/// `pacing` is slept between consecutive calls, never before the first or
/// after the last.
pub async fn dispatch_all<D: DeliveryApi>(
    api: &D,
    jobs: Vec<CampaignJob>,
    pacing: Duration,
) -> Vec<JobOutcome> {
    let total = jobs.len();

    stream::iter(jobs.into_iter().enumerate())
        .then(|(index, job)| async move {
            if index > 0 && !pacing.is_zero() {
                sleep(pacing).await;
            }
            dispatch_one(api, &job, index, total).await
        })
        .collect::<Vec<_>>()
        .await
}

/// Submit one job, converting any failure into an unsuccessful outcome.
async fn dispatch_one<D: DeliveryApi>(
    api: &D,
    job: &CampaignJob,
    index: usize,
    total: usize,
) -> JobOutcome {
    let operation = job.operation();
    let request = job.to_request();

    info!(
        recipient = %job.recipient,
        operation = operation.as_str(),
        position = index + 1,
        total = total,
        "dispatch_job_start"
    );

    match api.deliver(operation, &request).await {
        Ok(message) => {
            info!(
                recipient = %job.recipient,
                operation = operation.as_str(),
                message = %message,
                "dispatch_job_succeeded"
            );
            JobOutcome {
                recipient: job.recipient.clone(),
                success: true,
                message,
            }
        }
        Err(e) => {
            warn!(
                recipient = %job.recipient,
                operation = operation.as_str(),
                error = %e,
                "dispatch_job_failed"
            );
            JobOutcome {
                recipient: job.recipient.clone(),
                success: false,
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::campaign::types::{CompositionMode, JobContent};
    use crate::delivery::{DeliveryError, DeliveryRequest, Operation};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// In-memory delivery service that records every call and fails the
    /// recipients it was told to fail.
    #[derive(Default)]
    pub(crate) struct RecordingApi {
        pub calls: Mutex<Vec<(Operation, DeliveryRequest)>>,
        pub failing: Vec<String>,
    }

    impl RecordingApi {
        pub fn failing(recipients: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: recipients.iter().map(|r| r.to_string()).collect(),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn recipients(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, r)| r.recipient().to_string())
                .collect()
        }
    }

    impl DeliveryApi for RecordingApi {
        async fn deliver(
            &self,
            operation: Operation,
            request: &DeliveryRequest,
        ) -> Result<String, DeliveryError> {
            self.calls.lock().unwrap().push((operation, request.clone()));

            if self.failing.iter().any(|r| r == request.recipient()) {
                Err(DeliveryError::Rejected {
                    status: 500,
                    detail: "Failed to send personalized email".to_string(),
                })
            } else {
                Ok(format!("Email sent successfully to {}", request.recipient()))
            }
        }
    }

    fn job(recipient: &str) -> CampaignJob {
        CampaignJob {
            recipient: recipient.to_string(),
            subject: "Hi".to_string(),
            content: JobContent::Personalized {
                email_body: format!("Hello {}", recipient),
            },
            mode: CompositionMode::BulkPersonalized,
            schedule_time: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_continues_after_failure() {
        let api = RecordingApi::failing(&["b@example.com"]);
        let jobs = vec![job("a@example.com"), job("b@example.com"), job("c@example.com")];

        let outcomes = dispatch_all(&api, jobs, Duration::ZERO).await;

        assert_eq!(api.call_count(), 3);
        assert_eq!(
            api.recipients(),
            vec!["a@example.com", "b@example.com", "c@example.com"]
        );

        let flags: Vec<_> = outcomes.iter().map(|o| o.success).collect();
        assert_eq!(flags, vec![true, false, true]);
        assert_eq!(outcomes[1].recipient, "b@example.com");
        assert_eq!(outcomes[1].message, "Failed to send personalized email");
        assert_eq!(outcomes[2].message, "Email sent successfully to c@example.com");
    }

    #[tokio::test]
    async fn test_dispatch_routes_operation() {
        let api = RecordingApi::default();

        dispatch_all(&api, vec![job("a@example.com")], Duration::ZERO).await;

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls[0].0, Operation::SendPersonalized);
        assert!(matches!(calls[0].1, DeliveryRequest::Personalized(_)));
    }

    #[tokio::test]
    async fn test_dispatch_empty() {
        let api = RecordingApi::default();
        let outcomes = dispatch_all(&api, Vec::new(), Duration::from_secs(10)).await;

        assert!(outcomes.is_empty());
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_pacing_between_jobs_only() {
        let api = RecordingApi::default();
        let jobs = vec![job("a@example.com"), job("b@example.com"), job("c@example.com")];

        let started = Instant::now();
        dispatch_all(&api, jobs, Duration::from_millis(500)).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1500));
    }
}
