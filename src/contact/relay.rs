//! Remote form relay (Web3Forms compatible).
//!
//! One JSON POST per submission:
//!
//! ```json
//! {
//!   "access_key": "...",
//!   "name": "Jane",
//!   "email": "jane@example.com",
//!   "subject": "Portfolio Contact: Hi",
//!   "message": "Hello",
//!   "from_name": "Portfolio Contact Form",
//!   "botcheck": ""
//! }
//! ```
//!
//! The reply carries a `success` flag and an optional `message`. It is read
//! whatever the HTTP status, since rejections come back as 4xx with a body.

use super::ContactFields;
use crate::log;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::{future::Future, time::Duration};
use thiserror::Error;

/// Upper bound for one relay round-trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum RelayError {
    /// Unreachable host or aborted request.
    #[error("relay request failed")]
    Transport(#[from] reqwest::Error),

    #[error("relay reply is not valid JSON")]
    Decode(#[from] serde_json::Error),
}

/// Payload posted to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub access_key: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub from_name: String,
    /// Honeypot: the relay discards submissions where it is non-empty.
    botcheck: String,
}

impl Submission {
    pub fn new(
        access_key: &str,
        fields: &ContactFields,
        subject_prefix: &str,
        from_name: &str,
    ) -> Self {
        Self {
            access_key: access_key.to_owned(),
            name: fields.name.clone(),
            email: fields.email.clone(),
            subject: format!("{subject_prefix}{}", fields.subject),
            message: fields.message.clone(),
            from_name: from_name.to_owned(),
            botcheck: String::new(),
        }
    }
}

/// Relay reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Delivers a submission to the remote relay.
pub trait FormRelay {
    fn submit(
        &self,
        submission: &Submission,
    ) -> impl Future<Output = Result<RelayResponse, RelayError>>;
}

/// `reqwest` backed relay client.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl FormRelay for HttpRelay {
    async fn submit(&self, submission: &Submission) -> Result<RelayResponse, RelayError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(submission)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        let reply: RelayResponse = serde_json::from_slice(&body)?;
        if !status.is_success() {
            log!("contact"; "relay answered {status}");
        }
        Ok(reply)
    }
}
