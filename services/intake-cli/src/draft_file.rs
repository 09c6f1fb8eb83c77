use enrollment_intake::error::AppError;
use enrollment_intake::workflows::enrollment::applications::{
    DocumentUpload, DraftError, FieldName, FieldValue,
};
use serde_json::{Map, Value};
use std::path::Path;

/// Read a draft file into `(field, value)` edits in form order.
pub(crate) fn load_entries(path: &Path) -> Result<Vec<(FieldName, FieldValue)>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let values: Map<String, Value> = serde_json::from_str(&raw)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(parse_entries(values, base_dir)?)
}

fn parse_entries(
    values: Map<String, Value>,
    base_dir: &Path,
) -> Result<Vec<(FieldName, FieldValue)>, DraftError> {
    let mut entries = values
        .into_iter()
        .map(|(key, value)| {
            let field: FieldName = key.parse()?;
            let text = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Null => String::new(),
                other => {
                    return Err(DraftError::UnsupportedValue {
                        field,
                        value: other.to_string(),
                    })
                }
            };

            let value = if !field.is_file() {
                FieldValue::Text(text)
            } else if text.is_empty() {
                FieldValue::no_file()
            } else {
                FieldValue::file(DocumentUpload::from_path(base_dir.join(text)))
            };
            Ok((field, value))
        })
        .collect::<Result<Vec<_>, DraftError>>()?;

    entries.sort_by_key(|(field, _)| *field);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrollment_intake::workflows::enrollment::applications::UploadSource;
    use serde_json::json;
    use std::path::PathBuf;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn parses_text_numbers_and_relative_files() {
        let entries = parse_entries(
            object(json!({
                "id_doc": "docs/id.pdf",
                "first_name": "Zanele",
                "course": 3,
                "cv": null,
            })),
            Path::new("/tmp/applicant"),
        )
        .expect("valid draft file");

        let fields: Vec<FieldName> = entries.iter().map(|(field, _)| *field).collect();
        assert_eq!(
            fields,
            vec![
                FieldName::FirstName,
                FieldName::Course,
                FieldName::IdDoc,
                FieldName::Cv
            ]
        );
        assert_eq!(entries[1].1, FieldValue::text("3"));
        let FieldValue::File(Some(upload)) = &entries[2].1 else {
            panic!("id_doc should carry a file");
        };
        assert_eq!(
            upload.source(),
            &UploadSource::Path(PathBuf::from("/tmp/applicant/docs/id.pdf"))
        );
        assert_eq!(entries[3].1, FieldValue::no_file());
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = parse_entries(object(json!({ "nickname": "Z" })), Path::new("."));

        assert_eq!(
            result.expect_err("unknown key"),
            DraftError::UnknownField("nickname".to_string())
        );
    }

    #[test]
    fn rejects_structured_values() {
        let result = parse_entries(object(json!({ "phone": ["1", "2"] })), Path::new("."));

        assert!(matches!(
            result,
            Err(DraftError::UnsupportedValue {
                field: FieldName::Phone,
                ..
            })
        ));
    }
}
