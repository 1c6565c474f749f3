use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::form::{Draft, Outcome};

// Formspree-style relay; replace with your own form id.
pub const DEFAULT_FORM_ENDPOINT: &str = "https://formspree.io/f/your-form-id";

/// Delivers one contact message. Implementations make exactly one attempt.
#[async_trait]
pub trait FormRelay: Send + Sync {
    async fn deliver(&self, draft: &Draft) -> Outcome;
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("relay rejected the submission with status {status}: {message:?}")]
    Rejected { status: u16, message: Option<String> },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<RelayError> for Outcome {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Rejected { message, .. } => Outcome::Rejected(message.unwrap_or_default()),
            RelayError::Transport(_) => Outcome::TransportFailed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    error: Option<String>,
}

/// Pulls the `error` field out of a rejection body, if there is one.
pub fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<RelayErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

pub fn classify(status: reqwest::StatusCode, body: &str) -> Result<(), RelayError> {
    if status.is_success() {
        return Ok(());
    }
    Err(RelayError::Rejected {
        status: status.as_u16(),
        message: rejection_message(body),
    })
}

#[derive(Debug, Clone)]
pub struct HttpRelay {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, draft: &Draft) -> Result<(), RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(draft)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // An unreadable body still counts as a rejection, just without a message.
        let body = response.text().await.unwrap_or_default();
        classify(status, &body)
    }
}

#[async_trait]
impl FormRelay for HttpRelay {
    async fn deliver(&self, draft: &Draft) -> Outcome {
        log::debug!("Posting contact form to {}", self.endpoint);
        match self.post(draft).await {
            Ok(()) => {
                log::info!("Contact form accepted by relay");
                Outcome::Accepted
            }
            Err(err) => {
                log::debug!("Contact form delivery failed: {}", err);
                err.into()
            }
        }
    }
}
