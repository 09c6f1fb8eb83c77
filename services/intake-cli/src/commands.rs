use crate::cli::DraftArgs;
use crate::draft_file::load_entries;
use enrollment_intake::config::AppConfig;
use enrollment_intake::error::AppError;
use enrollment_intake::workflows::enrollment::applications::{
    validate, ApplicationForm, FieldErrors, FieldName, FieldValue, SubmissionCoordinator,
    SubmissionOutcome, SubmitReport,
};
use enrollment_intake::workflows::enrollment::{CourseCatalogLoader, HttpIntakeGateway};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn list_courses(config: &AppConfig) -> Result<(), AppError> {
    let gateway = Arc::new(HttpIntakeGateway::new(&config.endpoints)?);
    let courses = CourseCatalogLoader::new(gateway).load().await;

    if courses.is_empty() {
        println!("No courses are currently open for applications.");
        return Ok(());
    }

    println!("Open courses");
    for course in &courses {
        println!("- [{}] {}", course.id, course.name);
    }
    Ok(())
}

pub(crate) fn validate_draft(config: &AppConfig, args: DraftArgs) -> Result<(), AppError> {
    let mut form = ApplicationForm::new(Vec::new(), config.form.clone());
    fill_form(&mut form, &args)?;

    let errors = validate(form.draft());
    if errors.is_empty() {
        println!("Draft is complete and ready to submit.");
    } else {
        render_errors(&errors);
    }
    Ok(())
}

pub(crate) async fn submit_draft(config: &AppConfig, args: DraftArgs) -> Result<(), AppError> {
    let gateway = Arc::new(HttpIntakeGateway::new(&config.endpoints)?);
    let catalog = CourseCatalogLoader::new(gateway.clone());
    let coordinator = SubmissionCoordinator::new(gateway);

    let mut form = ApplicationForm::mount(&catalog, config.form.clone()).await;
    fill_form(&mut form, &args)?;

    if let Some(course) = form.draft().course() {
        match form.course_name(course) {
            Some(name) => info!(%course, name, "applying for course"),
            None => warn!(%course, "selected course is not in the published catalog"),
        }
    }

    match form.submit(&coordinator).await {
        SubmitReport::Blocked(errors) => {
            println!("The application was not sent.");
            render_errors(&errors);
        }
        SubmitReport::Busy => println!("A submission is already in progress."),
        SubmitReport::Completed(SubmissionOutcome::ValidationRejected(errors)) => {
            println!("The intake service returned corrections.");
            render_errors(&errors);
        }
        SubmitReport::Completed(SubmissionOutcome::Success)
        | SubmitReport::Completed(SubmissionOutcome::TransportFailure { .. }) => {}
    }

    if let Some(notice) = form.notice() {
        println!("{}", notice.message());
    }
    Ok(())
}

fn fill_form(form: &mut ApplicationForm, args: &DraftArgs) -> Result<(), AppError> {
    for (field, value) in load_entries(&args.draft)? {
        if let Some(hint) = unaccepted_format(field, &value) {
            warn!(
                %field,
                accepted = hint.join(","),
                "attachment type is outside the picker's accepted formats"
            );
        }
        form.set_field(field, value)?;
    }
    Ok(())
}

/// The accept hint an attached file falls outside of. Advisory; the value is still stored.
fn unaccepted_format(field: FieldName, value: &FieldValue) -> Option<&'static [&'static str]> {
    match (value, field.accept_hint()) {
        (FieldValue::File(Some(upload)), Some(hint)) if !upload.matches_accept(hint) => Some(hint),
        _ => None,
    }
}

fn render_errors(errors: &FieldErrors) {
    for (key, message) in errors.iter() {
        let label = match key.parse::<FieldName>() {
            Ok(field) => field.label(),
            Err(_) => key,
        };
        println!("- {label}: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrollment_intake::workflows::enrollment::applications::DocumentUpload;

    fn attached(name: &str) -> FieldValue {
        FieldValue::file(DocumentUpload::from_bytes(name, b"bytes".to_vec()))
    }

    #[test]
    fn flags_attachments_outside_the_accept_hint() {
        assert_eq!(
            unaccepted_format(FieldName::Cv, &attached("cv.png")),
            FieldName::Cv.accept_hint()
        );
        assert_eq!(
            unaccepted_format(FieldName::IdDoc, &attached("id.txt")),
            FieldName::IdDoc.accept_hint()
        );
    }

    #[test]
    fn accepts_listed_formats_and_non_file_values() {
        assert!(unaccepted_format(FieldName::Cv, &attached("CV.DOCX")).is_none());
        assert!(unaccepted_format(FieldName::IdDoc, &attached("scan.jpeg")).is_none());
        assert!(unaccepted_format(FieldName::IdDoc, &FieldValue::no_file()).is_none());
        assert!(unaccepted_format(FieldName::Phone, &FieldValue::text("0831234567")).is_none());
    }
}
