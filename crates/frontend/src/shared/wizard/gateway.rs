//! Hands a mapped payload to the API client, once per attempt.

use super::form_state::FormState;
use crate::shared::api::SharedApiClient;
use contracts::shared::ApiFailure;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Turns a completed form into the wire payload of one wizard.
pub type PayloadMapper = fn(&FormState) -> Result<Value, MappingError>;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("{0} is missing")]
    Missing(String),
    #[error("{field} is not a valid number: {value}")]
    InvalidNumber { field: String, value: String },
    #[error("{field} has an unknown option: {value}")]
    InvalidOption { field: String, value: String },
    #[error("failed to build payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Submitted { data: Value },
    Failed(ApiFailure),
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Submitted { .. })
    }
}

/// Issued when the review step starts a submission. The generation ties the
/// eventual result to the session that asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTicket {
    pub generation: u64,
    pub resource: &'static str,
    pub payload: Value,
}

type RefreshCallback = Arc<dyn Fn(&Value) + Send + Sync>;

#[derive(Clone)]
pub struct SubmissionGateway {
    client: SharedApiClient,
    on_success: Option<RefreshCallback>,
}

impl SubmissionGateway {
    pub fn new(client: SharedApiClient) -> Self {
        Self {
            client,
            on_success: None,
        }
    }

    /// Run `refresh` after every accepted submission (list re-fetch).
    pub fn with_refresh(mut self, refresh: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(refresh));
        self
    }

    /// Exactly one `create_record` call; no retry.
    pub async fn submit(&self, ticket: &SubmissionTicket) -> SubmissionResult {
        log::info!(
            "Submitting {} (generation {})",
            ticket.resource,
            ticket.generation
        );
        match self
            .client
            .create_record(ticket.resource, ticket.payload.clone())
            .await
        {
            Ok(data) => {
                log::info!("{} accepted", ticket.resource);
                if let Some(refresh) = &self.on_success {
                    refresh(&data);
                }
                SubmissionResult::Submitted { data }
            }
            Err(failure) => {
                log::warn!(
                    "{} rejected ({}): {}",
                    ticket.resource,
                    failure.kind.as_str(),
                    failure.message
                );
                SubmissionResult::Failed(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api::mock::MockApiClient;
    use contracts::shared::{ApiEnvelope, FailureKind};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ticket() -> SubmissionTicket {
        SubmissionTicket {
            generation: 0,
            resource: "incidents",
            payload: json!({"incidentType": "theft"}),
        }
    }

    #[tokio::test]
    async fn test_submit_issues_single_create_call_and_refreshes() {
        let client = Arc::new(MockApiClient::new());
        let refreshed = Arc::new(AtomicUsize::new(0));
        let counter = refreshed.clone();
        let gateway = SubmissionGateway::new(client.clone()).with_refresh(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let result = gateway.submit(&ticket()).await;

        assert!(result.is_success());
        assert_eq!(refreshed.load(Ordering::SeqCst), 1);
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/api/incidents");
        assert_eq!(calls[0].payload, Some(json!({"incidentType": "theft"})));
    }

    #[tokio::test]
    async fn test_rejected_submission_skips_refresh() {
        let client = Arc::new(MockApiClient::new().respond_with(ApiEnvelope::err("Duplicate")));
        let refreshed = Arc::new(AtomicUsize::new(0));
        let counter = refreshed.clone();
        let gateway = SubmissionGateway::new(client.clone()).with_refresh(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        match gateway.submit(&ticket()).await {
            SubmissionResult::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Rejected);
                assert_eq!(failure.message, "Duplicate");
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(refreshed.load(Ordering::SeqCst), 0);
        assert_eq!(client.calls().len(), 1);
    }
}
