use super::domain::{ApplicationDraft, DocumentUpload, FieldName};

/// One named part of the outgoing multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadPart {
    pub name: FieldName,
    pub value: PartValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File(DocumentUpload),
}

/// Snapshot of a draft ready to be sent. Blank fields are left out entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    parts: Vec<PayloadPart>,
}

impl MultipartPayload {
    pub fn from_draft(draft: &ApplicationDraft) -> Self {
        let parts = FieldName::ALL
            .into_iter()
            .filter_map(|name| {
                let value = match draft.file(name) {
                    Some(upload) => PartValue::File(upload.clone()),
                    None => match draft.text(name) {
                        Some(text) if !text.is_empty() => PartValue::Text(text.to_string()),
                        _ => return None,
                    },
                };
                Some(PayloadPart { name, value })
            })
            .collect();

        Self { parts }
    }

    pub fn parts(&self) -> &[PayloadPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<PayloadPart> {
        self.parts
    }

    pub fn names(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.parts.iter().map(|part| part.name)
    }

    pub fn text(&self, name: FieldName) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::Text(text) if part.name == name => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn file(&self, name: FieldName) -> Option<&DocumentUpload> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::File(upload) if part.name == name => Some(upload),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::enrollment::applications::domain::{FieldValue, Gender};

    #[test]
    fn blank_fields_are_left_out() {
        let mut draft = ApplicationDraft::empty();
        draft
            .set(FieldName::FirstName, FieldValue::text("Thandi"))
            .expect("text field");
        draft
            .set(FieldName::MiddleName, FieldValue::text(""))
            .expect("text field");
        draft
            .set(FieldName::Gender, Gender::Female.into())
            .expect("known option");
        draft
            .set(
                FieldName::IdDoc,
                FieldValue::file(DocumentUpload::from_bytes("id.pdf", b"%PDF".to_vec())),
            )
            .expect("file field");

        let payload = MultipartPayload::from_draft(&draft);

        let names: Vec<_> = payload.names().collect();
        assert_eq!(
            names,
            vec![FieldName::FirstName, FieldName::Gender, FieldName::IdDoc]
        );
        assert_eq!(payload.text(FieldName::Gender), Some("Female"));
        assert_eq!(
            payload.file(FieldName::IdDoc).map(DocumentUpload::file_name),
            Some("id.pdf")
        );
        assert!(payload.file(FieldName::Cv).is_none());
    }

    #[test]
    fn whitespace_text_is_still_sent() {
        let mut draft = ApplicationDraft::empty();
        draft
            .set(FieldName::Motivation, FieldValue::text("  "))
            .expect("text field");

        let payload = MultipartPayload::from_draft(&draft);

        assert_eq!(payload.text(FieldName::Motivation), Some("  "));
    }
}
