use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::domain::{ApplicationDraft, FieldErrors};
use super::payload::MultipartPayload;
use crate::workflows::enrollment::gateway::IntakeGateway;

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    ValidationRejected(FieldErrors),
    /// The exchange never produced a usable answer. `reason` is diagnostic text for logs.
    TransportFailure { reason: String },
}

impl SubmissionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Success => "success",
            SubmissionOutcome::ValidationRejected(_) => "validation_rejected",
            SubmissionOutcome::TransportFailure { .. } => "transport_failure",
        }
    }
}

/// Sends drafts to the intake endpoint and classifies what comes back.
pub struct SubmissionCoordinator<G: ?Sized> {
    gateway: Arc<G>,
}

impl<G> SubmissionCoordinator<G>
where
    G: IntakeGateway + ?Sized,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Serialize `draft` and send it once. Callers run validation first.
    pub async fn submit(&self, draft: &ApplicationDraft) -> SubmissionOutcome {
        self.dispatch(MultipartPayload::from_draft(draft)).await
    }

    pub async fn dispatch(&self, payload: MultipartPayload) -> SubmissionOutcome {
        let part_count = payload.len();
        let response = match self.gateway.create_application(payload).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "application submission failed");
                return SubmissionOutcome::TransportFailure {
                    reason: err.to_string(),
                };
            }
        };

        if response.is_success() {
            info!(status = response.status, parts = part_count, "application accepted");
            return SubmissionOutcome::Success;
        }

        match rejection_errors(&response.body) {
            Some(errors) => {
                let fields: Vec<&str> = errors.keys().collect();
                info!(
                    status = response.status,
                    ?fields,
                    "application rejected by intake service"
                );
                SubmissionOutcome::ValidationRejected(errors)
            }
            None => {
                warn!(
                    status = response.status,
                    "intake service rejected the application with an unreadable body"
                );
                SubmissionOutcome::TransportFailure {
                    reason: format!(
                        "status {} without a field error object in the body",
                        response.status
                    ),
                }
            }
        }
    }
}

/// Read a rejection body of the form `{"field": "message" | ["message", ...]}`.
pub fn rejection_errors(body: &[u8]) -> Option<FieldErrors> {
    let Value::Object(entries) = serde_json::from_slice::<Value>(body).ok()? else {
        return None;
    };

    Some(
        entries
            .into_iter()
            .map(|(field, value)| (field, render_message(value)))
            .collect(),
    )
}

fn render_message(value: Value) -> String {
    match value {
        Value::String(message) => message,
        Value::Array(items) => items
            .into_iter()
            .map(render_message)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_errors_accepts_strings_and_lists() {
        let errors = rejection_errors(
            br#"{"email": "already used", "id_number": ["Too short.", "Digits only."]}"#,
        )
        .expect("object body");

        assert_eq!(errors.get("email"), Some("already used"));
        assert_eq!(errors.get("id_number"), Some("Too short. Digits only."));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rejection_errors_keeps_unknown_keys() {
        let errors = rejection_errors(br#"{"non_field_errors": ["Duplicate application."]}"#)
            .expect("object body");

        assert_eq!(errors.get("non_field_errors"), Some("Duplicate application."));
    }

    #[test]
    fn rejection_errors_refuses_non_objects() {
        assert!(rejection_errors(b"<html>502 Bad Gateway</html>").is_none());
        assert!(rejection_errors(br#"["email"]"#).is_none());
        assert!(rejection_errors(b"").is_none());
    }
}
