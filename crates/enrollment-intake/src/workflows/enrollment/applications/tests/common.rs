use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::FormSettings;
use crate::workflows::enrollment::applications::domain::{
    ApplicationDraft, CourseId, CourseOption, DocumentUpload, FieldName, FieldValue, Gender,
    Qualification,
};
use crate::workflows::enrollment::applications::form::ApplicationForm;
use crate::workflows::enrollment::applications::payload::MultipartPayload;
use crate::workflows::enrollment::applications::submission::SubmissionCoordinator;
use crate::workflows::enrollment::gateway::{GatewayError, GatewayResponse, IntakeGateway};

pub(super) const VALID_ID_NUMBER: &str = "9001015800087";

pub(super) fn courses() -> Vec<CourseOption> {
    vec![
        CourseOption {
            id: CourseId::from(1_u64),
            name: "Welding".to_string(),
        },
        CourseOption {
            id: CourseId::from(2_u64),
            name: "Boilermaking".to_string(),
        },
    ]
}

pub(super) fn id_document() -> DocumentUpload {
    DocumentUpload::from_bytes("identity.pdf", b"%PDF-1.7 id".to_vec())
}

pub(super) fn valid_entries() -> Vec<(FieldName, FieldValue)> {
    vec![
        (FieldName::FirstName, FieldValue::text("Lerato")),
        (FieldName::LastName, FieldValue::text("Mokoena")),
        (FieldName::Gender, Gender::Female.into()),
        (FieldName::Email, FieldValue::text("lerato@example.co.za")),
        (FieldName::Phone, FieldValue::text("083 555 0101")),
        (FieldName::IdNumber, FieldValue::text(VALID_ID_NUMBER)),
        (FieldName::Course, (&CourseId::from(1_u64)).into()),
        (FieldName::Qualification, Qualification::Grade12.into()),
        (FieldName::IdDoc, FieldValue::file(id_document())),
    ]
}

pub(super) fn valid_draft() -> ApplicationDraft {
    let mut draft = ApplicationDraft::empty();
    for (field, value) in valid_entries() {
        draft.set(field, value).expect("fixture value fits field");
    }
    draft
}

pub(super) fn draft_without(missing: FieldName) -> ApplicationDraft {
    let mut draft = ApplicationDraft::empty();
    for (field, value) in valid_entries() {
        if field != missing {
            draft.set(field, value).expect("fixture value fits field");
        }
    }
    draft
}

pub(super) fn form_with(settings: FormSettings) -> ApplicationForm {
    ApplicationForm::new(courses(), settings)
}

pub(super) fn filled_form(settings: FormSettings) -> ApplicationForm {
    let mut form = form_with(settings);
    for (field, value) in valid_entries() {
        form.set_field(field, value).expect("fixture value fits field");
    }
    form
}

/// Replays queued intake responses and records every payload it receives.
#[derive(Default)]
pub(super) struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<GatewayResponse, String>>>,
    received: Mutex<Vec<MultipartPayload>>,
}

impl ScriptedGateway {
    pub(super) fn replying(responses: Vec<Result<GatewayResponse, String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            received: Mutex::new(Vec::new()),
        })
    }

    pub(super) fn received(&self) -> Vec<MultipartPayload> {
        self.received.lock().expect("payload mutex poisoned").clone()
    }
}

#[async_trait]
impl IntakeGateway for ScriptedGateway {
    async fn list_courses(&self) -> Result<GatewayResponse, GatewayError> {
        let body = serde_json::to_vec(&courses()).expect("courses serialize");
        Ok(GatewayResponse::new(200, body))
    }

    async fn create_application(
        &self,
        payload: MultipartPayload,
    ) -> Result<GatewayResponse, GatewayError> {
        self.received
            .lock()
            .expect("payload mutex poisoned")
            .push(payload);
        let next = self
            .responses
            .lock()
            .expect("response mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err("no scripted response".to_string()));
        next.map_err(GatewayError::Transport)
    }
}

pub(super) fn coordinator(gateway: &Arc<ScriptedGateway>) -> SubmissionCoordinator<ScriptedGateway> {
    SubmissionCoordinator::new(Arc::clone(gateway))
}
