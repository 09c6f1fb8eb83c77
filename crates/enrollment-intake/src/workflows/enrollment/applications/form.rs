use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{
    ApplicationDraft, CourseId, CourseOption, DraftError, FieldErrors, FieldName, FieldValue,
};
use super::notice::Notice;
use super::payload::MultipartPayload;
use super::submission::{SubmissionCoordinator, SubmissionOutcome};
use super::validation::validate;
use crate::config::FormSettings;
use crate::workflows::enrollment::catalog::CourseCatalogLoader;
use crate::workflows::enrollment::gateway::IntakeGateway;

/// Whether any submission is awaiting its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting { in_flight: usize },
}

/// Payload snapshot taken when a submission passes local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSubmission {
    payload: MultipartPayload,
}

impl PreparedSubmission {
    pub fn payload(&self) -> &MultipartPayload {
        &self.payload
    }

    pub fn into_payload(self) -> MultipartPayload {
        self.payload
    }
}

/// What `begin_submit` decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Local validation failed; the errors are now installed on the form.
    Blocked(FieldErrors),
    /// An earlier submission is still in flight and the double-submit guard is on.
    Busy,
    Ready(PreparedSubmission),
}

/// End state of `ApplicationForm::submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReport {
    Blocked(FieldErrors),
    Busy,
    Completed(SubmissionOutcome),
}

/// State behind the public application form: course options, the applicant draft, per-field
/// errors, the notice area and in-flight bookkeeping. All mutation goes through `&mut self`.
#[derive(Debug, Clone)]
pub struct ApplicationForm {
    courses: Vec<CourseOption>,
    draft: ApplicationDraft,
    errors: FieldErrors,
    notice: Option<Notice>,
    phase: SubmissionPhase,
    settings: FormSettings,
}

impl ApplicationForm {
    pub fn new(courses: Vec<CourseOption>, settings: FormSettings) -> Self {
        Self {
            courses,
            draft: ApplicationDraft::empty(),
            errors: FieldErrors::new(),
            notice: None,
            phase: SubmissionPhase::Idle,
            settings,
        }
    }

    /// Load the catalog (once, for the lifetime of this form) and open an empty draft.
    pub async fn mount<G>(catalog: &CourseCatalogLoader<G>, settings: FormSettings) -> Self
    where
        G: IntakeGateway + ?Sized,
    {
        let courses = catalog.load().await;
        debug!(courses = courses.len(), "application form mounted");
        Self::new(courses, settings)
    }

    pub fn courses(&self) -> &[CourseOption] {
        &self.courses
    }

    pub fn course_name(&self, id: &CourseId) -> Option<&str> {
        self.courses
            .iter()
            .find(|course| &course.id == id)
            .map(|course| course.name.as_str())
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.errors.for_field(field)
    }

    /// Error for `field` if there is one, otherwise its standing helper text.
    pub fn helper_text(&self, field: FieldName) -> Option<&str> {
        self.error(field).or(field.helper_text())
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Drop the field's current error and store the edited value. The error is cleared even when
    /// the value itself is rejected. Errors come back only from the next validation or server response.
    pub fn set_field(&mut self, field: FieldName, value: FieldValue) -> Result<(), DraftError> {
        self.errors.clear_field(field);
        self.draft.set(field, value)
    }

    /// Fresh draft, no errors. File selections are cleared with it.
    pub fn reset(&mut self) {
        self.draft = ApplicationDraft::empty();
        self.errors = FieldErrors::new();
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn visible_notice_at(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|notice| notice.is_visible_at(now))
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Validate eagerly and, when clean, snapshot the payload and count the attempt as in flight.
    pub fn begin_submit(&mut self) -> SubmitAttempt {
        if self.settings.guard_double_submit && self.phase != SubmissionPhase::Idle {
            debug!("submission ignored while another is in flight");
            return SubmitAttempt::Busy;
        }

        let errors = validate(&self.draft);
        if !errors.is_empty() {
            debug!(fields = errors.len(), "submission blocked by local validation");
            self.errors = errors.clone();
            return SubmitAttempt::Blocked(errors);
        }

        self.phase = match self.phase {
            SubmissionPhase::Idle => SubmissionPhase::Submitting { in_flight: 1 },
            SubmissionPhase::Submitting { in_flight } => SubmissionPhase::Submitting {
                in_flight: in_flight + 1,
            },
        };

        SubmitAttempt::Ready(PreparedSubmission {
            payload: MultipartPayload::from_draft(&self.draft),
        })
    }

    pub fn apply_outcome(&mut self, outcome: &SubmissionOutcome) {
        self.apply_outcome_at(outcome, Utc::now());
    }

    /// Fold one outcome into the form. Outcomes are applied in the order they resolve, so the
    /// last one to arrive decides the final errors and notice.
    pub fn apply_outcome_at(&mut self, outcome: &SubmissionOutcome, now: DateTime<Utc>) {
        debug!(outcome = outcome.label(), "applying submission outcome");
        self.phase = match self.phase {
            SubmissionPhase::Submitting { in_flight } if in_flight > 1 => {
                SubmissionPhase::Submitting {
                    in_flight: in_flight - 1,
                }
            }
            _ => SubmissionPhase::Idle,
        };

        match outcome {
            SubmissionOutcome::Success => {
                self.reset();
                self.notice = Some(Notice::success(now, self.settings.notice_duration));
                info!("application form reset after successful submission");
            }
            SubmissionOutcome::ValidationRejected(errors) => {
                self.errors = errors.clone();
            }
            SubmissionOutcome::TransportFailure { .. } => {
                if self.settings.surface_transport_errors {
                    self.notice = Some(Notice::transport_error(now));
                }
            }
        }
    }

    /// Validate, send, and apply the outcome in one step.
    pub async fn submit<G>(&mut self, coordinator: &SubmissionCoordinator<G>) -> SubmitReport
    where
        G: IntakeGateway + ?Sized,
    {
        let prepared = match self.begin_submit() {
            SubmitAttempt::Ready(prepared) => prepared,
            SubmitAttempt::Blocked(errors) => return SubmitReport::Blocked(errors),
            SubmitAttempt::Busy => return SubmitReport::Busy,
        };

        let outcome = coordinator.dispatch(prepared.into_payload()).await;
        self.apply_outcome(&outcome);
        SubmitReport::Completed(outcome)
    }
}
