//! Remote delivery service access.
//!
//! The orchestrator only ever talks to the service through [`DeliveryApi`].
//! [`DeliveryClient`] is the HTTP implementation; tests substitute their own.

pub mod client;
pub mod types;

use std::future::Future;

use thiserror::Error;

pub use client::DeliveryClient;
pub use types::{
    local_time, DeliveryAck, DeliveryRequest, EmailLogEntry, Operation, PersonalizedEmailRequest,
    ScheduledEmail, TemplatedEmailRequest,
};

/// Failure of a single delivery service call.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a failure status.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("invalid response from delivery service: {0}")]
    InvalidResponse(String),

    #[error("invalid delivery service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The dispatch capability of the remote delivery service.
pub trait DeliveryApi {
    /// Submit one request to `operation`, returning the service's
    /// human-readable acknowledgement.
    fn deliver(
        &self,
        operation: Operation,
        request: &DeliveryRequest,
    ) -> impl Future<Output = Result<String, DeliveryError>> + Send;
}
