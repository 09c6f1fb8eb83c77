use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Every field the public application form collects, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    FirstName,
    MiddleName,
    LastName,
    Gender,
    Email,
    Phone,
    IdNumber,
    Course,
    Qualification,
    IdDoc,
    QualificationDoc,
    Cv,
    Motivation,
}

const IMAGE_OR_PDF: &[&str] = &[".pdf", ".jpg", ".jpeg", ".png"];
const RESUME_FORMATS: &[&str] = &[".pdf", ".doc", ".docx"];

impl FieldName {
    pub const ALL: [Self; 13] = [
        Self::FirstName,
        Self::MiddleName,
        Self::LastName,
        Self::Gender,
        Self::Email,
        Self::Phone,
        Self::IdNumber,
        Self::Course,
        Self::Qualification,
        Self::IdDoc,
        Self::QualificationDoc,
        Self::Cv,
        Self::Motivation,
    ];

    pub const REQUIRED: [Self; 9] = [
        Self::FirstName,
        Self::LastName,
        Self::Gender,
        Self::Email,
        Self::Phone,
        Self::IdNumber,
        Self::Course,
        Self::Qualification,
        Self::IdDoc,
    ];

    /// Name used both as the error key and as the multipart part name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::MiddleName => "middle_name",
            Self::LastName => "last_name",
            Self::Gender => "gender",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::IdNumber => "id_number",
            Self::Course => "course",
            Self::Qualification => "qualification",
            Self::IdDoc => "id_doc",
            Self::QualificationDoc => "qualification_doc",
            Self::Cv => "cv",
            Self::Motivation => "motivation",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::MiddleName => "Middle Name",
            Self::LastName => "Last Name",
            Self::Gender => "Gender",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::IdNumber => "ID Number",
            Self::Course => "Select Course",
            Self::Qualification => "Highest Qualification",
            Self::IdDoc => "Upload ID",
            Self::QualificationDoc => "Upload Qualification (optional)",
            Self::Cv => "Upload CV (optional)",
            Self::Motivation => "Motivation",
        }
    }

    pub const fn is_required(self) -> bool {
        matches!(
            self,
            Self::FirstName
                | Self::LastName
                | Self::Gender
                | Self::Email
                | Self::Phone
                | Self::IdNumber
                | Self::Course
                | Self::Qualification
                | Self::IdDoc
        )
    }

    pub const fn is_file(self) -> bool {
        matches!(self, Self::IdDoc | Self::QualificationDoc | Self::Cv)
    }

    /// File extensions offered by the picker. Advisory only; nothing rejects other types.
    pub const fn accept_hint(self) -> Option<&'static [&'static str]> {
        match self {
            Self::IdDoc | Self::QualificationDoc => Some(IMAGE_OR_PDF),
            Self::Cv => Some(RESUME_FORMATS),
            _ => None,
        }
    }

    /// Hint displayed under the field while it has no error.
    pub const fn helper_text(self) -> Option<&'static str> {
        match self {
            Self::IdNumber => Some("ID number must be exactly 13 digits"),
            _ => None,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = DraftError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == raw)
            .ok_or_else(|| DraftError::UnknownField(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Self; 4] = [Self::Male, Self::Female, Self::Other, Self::PreferNotToSay];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.label() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualification {
    Grade11,
    Grade12,
    Certificate,
    Diploma,
    Other,
}

impl Qualification {
    pub const ALL: [Self; 5] = [
        Self::Grade11,
        Self::Grade12,
        Self::Certificate,
        Self::Diploma,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Grade11 => "Grade 11",
            Self::Grade12 => "Grade 12",
            Self::Certificate => "Certificate",
            Self::Diploma => "Diploma",
            Self::Other => "Other",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.label() == raw)
    }
}

/// Course identifier as issued by the catalog. Numeric ids are kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for CourseId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for CourseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CourseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for CourseId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Read-only course projection offered by the course selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOption {
    pub id: CourseId,
    pub name: String,
}

/// Where the bytes of an attachment come from.
#[derive(Clone, PartialEq, Eq)]
pub enum UploadSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

impl fmt::Debug for UploadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            UploadSource::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
        }
    }
}

/// Opaque handle to a picked file. Contents stay unread until the payload is attached to a
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    file_name: String,
    content_type: mime::Mime,
    source: UploadSource,
}

impl DocumentUpload {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = mime_guess::from_path(&path).first_or_octet_stream();

        Self {
            file_name,
            content_type,
            source: UploadSource::Path(path),
        }
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name).first_or_octet_stream();

        Self {
            file_name,
            content_type,
            source: UploadSource::Memory(bytes.into()),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &mime::Mime {
        &self.content_type
    }

    pub fn source(&self) -> &UploadSource {
        &self.source
    }

    /// Whether the file name carries one of the extensions in `hint` (case-insensitive).
    pub fn matches_accept(&self, hint: &[&str]) -> bool {
        let lowered = self.file_name.to_ascii_lowercase();
        hint.iter().any(|extension| lowered.ends_with(extension))
    }

    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            UploadSource::Path(path) => tokio::fs::read(path).await,
            UploadSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Value delivered by an input control. Selections arrive as their visible label (or course id),
/// with the empty string meaning "nothing selected".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(Option<DocumentUpload>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn file(upload: DocumentUpload) -> Self {
        Self::File(Some(upload))
    }

    pub fn no_file() -> Self {
        Self::File(None)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Gender> for FieldValue {
    fn from(value: Gender) -> Self {
        Self::Text(value.label().to_string())
    }
}

impl From<Qualification> for FieldValue {
    fn from(value: Qualification) -> Self {
        Self::Text(value.label().to_string())
    }
}

impl From<&CourseId> for FieldValue {
    fn from(value: &CourseId) -> Self {
        Self::Text(value.as_str().to_string())
    }
}

impl From<DocumentUpload> for FieldValue {
    fn from(value: DocumentUpload) -> Self {
        Self::File(Some(value))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("unknown application field '{0}'")]
    UnknownField(String),
    #[error("{0} takes a text value, not a file")]
    ExpectedText(FieldName),
    #[error("{0} takes a file attachment, not text")]
    ExpectedFile(FieldName),
    #[error("'{value}' is not an option for {field}")]
    UnknownOption { field: FieldName, value: String },
    #[error("{field} takes a string, number or null, got {value}")]
    UnsupportedValue { field: FieldName, value: String },
}

/// In-progress applicant record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationDraft {
    first_name: String,
    middle_name: String,
    last_name: String,
    gender: Option<Gender>,
    email: String,
    phone: String,
    id_number: String,
    course: Option<CourseId>,
    qualification: Option<Qualification>,
    motivation: String,
    id_doc: Option<DocumentUpload>,
    qualification_doc: Option<DocumentUpload>,
    cv: Option<DocumentUpload>,
}

impl ApplicationDraft {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store one field. `id_number` keeps only ASCII digits; a rejected value leaves the draft
    /// unchanged.
    pub fn set(&mut self, field: FieldName, value: FieldValue) -> Result<(), DraftError> {
        match (field, value) {
            (FieldName::IdDoc, FieldValue::File(upload)) => self.id_doc = upload,
            (FieldName::QualificationDoc, FieldValue::File(upload)) => {
                self.qualification_doc = upload
            }
            (FieldName::Cv, FieldValue::File(upload)) => self.cv = upload,
            (field, FieldValue::File(_)) => return Err(DraftError::ExpectedText(field)),
            (FieldName::FirstName, FieldValue::Text(text)) => self.first_name = text,
            (FieldName::MiddleName, FieldValue::Text(text)) => self.middle_name = text,
            (FieldName::LastName, FieldValue::Text(text)) => self.last_name = text,
            (FieldName::Email, FieldValue::Text(text)) => self.email = text,
            (FieldName::Phone, FieldValue::Text(text)) => self.phone = text,
            (FieldName::Motivation, FieldValue::Text(text)) => self.motivation = text,
            (FieldName::IdNumber, FieldValue::Text(text)) => {
                self.id_number = text.chars().filter(char::is_ascii_digit).collect()
            }
            (FieldName::Gender, FieldValue::Text(text)) => {
                self.gender = choice(field, text, Gender::from_label)?
            }
            (FieldName::Qualification, FieldValue::Text(text)) => {
                self.qualification = choice(field, text, Qualification::from_label)?
            }
            (FieldName::Course, FieldValue::Text(text)) => {
                self.course = (!text.is_empty()).then(|| CourseId(text))
            }
            (field, FieldValue::Text(_)) => return Err(DraftError::ExpectedFile(field)),
        }
        Ok(())
    }

    /// Textual projection of a non-file field; `""` when empty or unselected, `None` for file
    /// fields.
    pub fn text(&self, field: FieldName) -> Option<&str> {
        let value = match field {
            FieldName::FirstName => self.first_name.as_str(),
            FieldName::MiddleName => self.middle_name.as_str(),
            FieldName::LastName => self.last_name.as_str(),
            FieldName::Gender => self.gender.map(Gender::label).unwrap_or_default(),
            FieldName::Email => self.email.as_str(),
            FieldName::Phone => self.phone.as_str(),
            FieldName::IdNumber => self.id_number.as_str(),
            FieldName::Course => self.course.as_ref().map(CourseId::as_str).unwrap_or_default(),
            FieldName::Qualification => self
                .qualification
                .map(Qualification::label)
                .unwrap_or_default(),
            FieldName::Motivation => self.motivation.as_str(),
            FieldName::IdDoc | FieldName::QualificationDoc | FieldName::Cv => return None,
        };
        Some(value)
    }

    pub fn file(&self, field: FieldName) -> Option<&DocumentUpload> {
        match field {
            FieldName::IdDoc => self.id_doc.as_ref(),
            FieldName::QualificationDoc => self.qualification_doc.as_ref(),
            FieldName::Cv => self.cv.as_ref(),
            _ => None,
        }
    }

    /// Empty text, no selection, or no attached file.
    pub fn is_blank(&self, field: FieldName) -> bool {
        if field.is_file() {
            self.file(field).is_none()
        } else {
            self.text(field).map_or(true, str::is_empty)
        }
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn course(&self) -> Option<&CourseId> {
        self.course.as_ref()
    }

    pub fn qualification(&self) -> Option<Qualification> {
        self.qualification
    }
}

fn choice<T>(
    field: FieldName,
    text: String,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, DraftError> {
    if text.is_empty() {
        return Ok(None);
    }
    parse(&text)
        .map(Some)
        .ok_or(DraftError::UnknownOption { field, value: text })
}

/// Field name to message. Keys are kept as strings so server-reported keys that do not map to a
/// draft field are still displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    pub fn record(&mut self, field: FieldName, message: impl Into<String>) {
        self.insert(field.as_str(), message);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn for_field(&self, field: FieldName) -> Option<&str> {
        self.get(field.as_str())
    }

    pub fn clear_field(&mut self, field: FieldName) -> Option<String> {
        self.0.remove(field.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(key, message)| (key.as_str(), message.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FieldErrors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, message)| (key.into(), message.into()))
                .collect(),
        )
    }
}
