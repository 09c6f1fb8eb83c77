//! Public application form: applicant draft, local validation, multipart submission and outcome
//! reconciliation.

pub mod domain;
pub mod form;
pub mod notice;
pub mod payload;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationDraft, CourseId, CourseOption, DocumentUpload, DraftError, FieldErrors, FieldName,
    FieldValue, Gender, Qualification, UploadSource,
};
pub use form::{ApplicationForm, PreparedSubmission, SubmissionPhase, SubmitAttempt, SubmitReport};
pub use notice::{Notice, NoticeKind};
pub use payload::{MultipartPayload, PartValue, PayloadPart};
pub use submission::{SubmissionCoordinator, SubmissionOutcome};
pub use validation::validate;
