use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::applications::domain::CourseOption;
use super::gateway::IntakeGateway;

/// Fetches the public course offerings shown by the course selector.
pub struct CourseCatalogLoader<G: ?Sized> {
    gateway: Arc<G>,
}

impl<G> CourseCatalogLoader<G>
where
    G: IntakeGateway + ?Sized,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// One request, no retry. Any failure degrades to an empty catalog; the required-field check
    /// on `course` catches the gap at submit time.
    pub async fn load(&self) -> Vec<CourseOption> {
        let response = match self.gateway.list_courses().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "course catalog unavailable");
                return Vec::new();
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "course catalog request was not successful");
            return Vec::new();
        }

        match normalize_courses(&response.body) {
            Some(courses) => {
                debug!(count = courses.len(), "course catalog loaded");
                courses
            }
            None => {
                warn!("course catalog body was not a course listing");
                Vec::new()
            }
        }
    }
}

/// Accept either a bare array of `{id, name}` or an envelope carrying it under `results`.
pub fn normalize_courses(body: &[u8]) -> Option<Vec<CourseOption>> {
    let listing = match serde_json::from_slice::<Value>(body).ok()? {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut envelope) => match envelope.remove("results")? {
            Value::Array(items) => Value::Array(items),
            _ => return None,
        },
        _ => return None,
    };

    serde_json::from_value(listing).ok()
}
