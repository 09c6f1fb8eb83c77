use std::sync::OnceLock;

use regex::Regex;

use super::domain::{ApplicationDraft, FieldErrors, FieldName};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address";
pub const ID_NUMBER_LENGTH_MESSAGE: &str = "ID number must be exactly 13 digits";

pub const ID_NUMBER_LENGTH: usize = 13;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"))
}

/// Check a draft against the form rules. Every violated rule is reported; an empty map means the
/// draft may be submitted.
pub fn validate(draft: &ApplicationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in FieldName::REQUIRED {
        if draft.is_blank(field) {
            errors.record(field, REQUIRED_MESSAGE);
        }
    }

    if let Some(email) = draft.text(FieldName::Email).filter(|email| !email.is_empty()) {
        if !email_pattern().is_match(email) {
            errors.record(FieldName::Email, INVALID_EMAIL_MESSAGE);
        }
    }

    if let Some(id_number) = draft
        .text(FieldName::IdNumber)
        .filter(|id_number| !id_number.is_empty())
    {
        if id_number.chars().count() != ID_NUMBER_LENGTH {
            errors.record(FieldName::IdNumber, ID_NUMBER_LENGTH_MESSAGE);
        }
    }

    errors
}
