//! Employer-defined application form schemas and submission validation.
//!
//! A job posting carries an ordered list of [`CustomField`]s (stored as
//! jsonb). Submitted values arrive as a loose map keyed by `fieldKey` and
//! are validated against the schema, then snapshotted into
//! [`CustomFieldAnswer`]s so later schema edits never rewrite what an
//! applicant actually answered.

use std::collections::{HashMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").expect("valid mobile regex"));
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?\d{7,15}$").expect("valid phone regex"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Phone,
    Url,
    File,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
}

impl FieldType {
    fn is_choice(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_file_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size_mb: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub field_key: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub validation: FieldValidation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub url: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
}

/// Submitted value for one form field. The original system stored these
/// as an untyped `Mixed` blob; here the accepted shapes are closed over
/// the field-type enum. Untagged variants are tried in order, so `Many`
/// must precede `File`: serde will otherwise read a JSON string array as
/// a `FileRef` out of its sequence representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Many(Vec<String>),
    File(FileRef),
    Number(f64),
    Text(String),
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Many(items) => items.is_empty(),
            FieldValue::Number(_) | FieldValue::File(_) => false,
        }
    }
}

/// Answer snapshot persisted with the application: schema identity
/// (`fieldKey`, `label`, `fieldType`) is copied at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldAnswer {
    pub field_key: String,
    pub label: String,
    pub field_type: FieldType,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.message)
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_mobile(value: &str) -> bool {
    MOBILE_RE.is_match(value)
}

/// Schema sanity check used when a posting is created or edited:
/// non-blank unique keys, and options present for choice fields.
pub fn validate_schema(fields: &[CustomField]) -> Result<(), FieldError> {
    let mut seen = HashSet::new();
    for field in fields {
        let key = field.field_key.trim();
        if key.is_empty() {
            return Err(FieldError::new(&field.field_key, "fieldKey must not be blank"));
        }
        if !seen.insert(key.to_string()) {
            return Err(FieldError::new(key, "duplicate fieldKey"));
        }
        if field.field_type.is_choice() && field.options.is_empty() {
            return Err(FieldError::new(key, "choice fields must declare options"));
        }
    }
    Ok(())
}

/// Validate submitted answers against a job's schema, fail-fast on the
/// first offending field, and return the persisted snapshot on success.
/// Submitted keys that are not in the schema are ignored.
pub fn validate_answers(
    fields: &[CustomField],
    submitted: &HashMap<String, FieldValue>,
) -> Result<Vec<CustomFieldAnswer>, FieldError> {
    let mut answers = Vec::with_capacity(fields.len());

    for field in fields {
        let value = submitted
            .get(&field.field_key)
            .cloned()
            .unwrap_or(FieldValue::Empty);

        if value.is_empty() {
            if field.required {
                return Err(FieldError::new(&field.field_key, "this field is required"));
            }
            answers.push(snapshot(field, FieldValue::Empty));
            continue;
        }

        check_value(field, &value)?;
        answers.push(snapshot(field, value));
    }

    Ok(answers)
}

fn snapshot(field: &CustomField, value: FieldValue) -> CustomFieldAnswer {
    CustomFieldAnswer {
        field_key: field.field_key.clone(),
        label: field.label.clone(),
        field_type: field.field_type,
        value,
    }
}

fn check_value(field: &CustomField, value: &FieldValue) -> Result<(), FieldError> {
    let key = field.field_key.as_str();
    match field.field_type {
        FieldType::Text | FieldType::Textarea => {
            let text = expect_text(key, value)?;
            check_text_rules(field, text)
        }
        FieldType::Email => {
            let text = expect_text(key, value)?;
            if !is_valid_email(text) {
                return Err(FieldError::new(key, "must be a valid email address"));
            }
            check_text_rules(field, text)
        }
        FieldType::Phone => {
            let text = expect_text(key, value)?;
            if !DIGITS_RE.is_match(text) {
                return Err(FieldError::new(key, "must be a valid phone number"));
            }
            Ok(())
        }
        FieldType::Url => {
            let text = expect_text(key, value)?;
            Url::parse(text)
                .map_err(|_| FieldError::new(key, "must be a valid URL"))?;
            check_text_rules(field, text)
        }
        FieldType::Date => {
            let text = expect_text(key, value)?;
            if !DATE_RE.is_match(text) {
                return Err(FieldError::new(key, "must be a date in YYYY-MM-DD form"));
            }
            Ok(())
        }
        FieldType::Number => {
            let number = match value {
                FieldValue::Number(n) => *n,
                FieldValue::Text(s) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| FieldError::new(key, "must be a number"))?,
                _ => return Err(FieldError::new(key, "must be a number")),
            };
            if let Some(min) = field.validation.min {
                if number < min {
                    return Err(FieldError::new(key, format!("must be at least {min}")));
                }
            }
            if let Some(max) = field.validation.max {
                if number > max {
                    return Err(FieldError::new(key, format!("must be at most {max}")));
                }
            }
            Ok(())
        }
        FieldType::Select | FieldType::Radio => {
            let text = expect_text(key, value)?;
            if !field.options.iter().any(|opt| opt == text) {
                return Err(FieldError::new(key, "value is not one of the allowed options"));
            }
            Ok(())
        }
        FieldType::Checkbox => {
            let items = match value {
                FieldValue::Many(items) => items.clone(),
                // A single checked option may arrive as a bare string.
                FieldValue::Text(s) => vec![s.clone()],
                _ => return Err(FieldError::new(key, "must be a list of selected options")),
            };
            for item in &items {
                if !field.options.iter().any(|opt| opt == item) {
                    return Err(FieldError::new(key, "value is not one of the allowed options"));
                }
            }
            Ok(())
        }
        FieldType::File => {
            let file = match value {
                FieldValue::File(file) => file,
                _ => return Err(FieldError::new(key, "must be an uploaded file reference")),
            };
            if let Some(allowed) = &field.validation.allowed_file_types {
                let matches = allowed
                    .iter()
                    .any(|ty| ty.eq_ignore_ascii_case(&file.file_type));
                if !matches {
                    return Err(FieldError::new(key, "file type is not allowed"));
                }
            }
            if let (Some(limit_mb), Some(size)) =
                (field.validation.max_file_size_mb, file.size_bytes)
            {
                if size as f64 > limit_mb * 1024.0 * 1024.0 {
                    return Err(FieldError::new(key, "file exceeds the size limit"));
                }
            }
            Ok(())
        }
    }
}

fn expect_text<'a>(key: &str, value: &'a FieldValue) -> Result<&'a str, FieldError> {
    match value {
        FieldValue::Text(s) => Ok(s.trim()),
        _ => Err(FieldError::new(key, "must be a text value")),
    }
}

fn check_text_rules(field: &CustomField, text: &str) -> Result<(), FieldError> {
    let key = field.field_key.as_str();
    if let Some(min) = field.validation.min_length {
        if text.chars().count() < min {
            return Err(FieldError::new(
                key,
                format!("must be at least {min} characters"),
            ));
        }
    }
    if let Some(max) = field.validation.max_length {
        if text.chars().count() > max {
            return Err(FieldError::new(
                key,
                format!("must be at most {max} characters"),
            ));
        }
    }
    if let Some(pattern) = &field.validation.pattern {
        let re = Regex::new(pattern)
            .map_err(|_| FieldError::new(key, "field has an invalid validation pattern"))?;
        if !re.is_match(text) {
            return Err(FieldError::new(key, "does not match the required pattern"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field(key: &str, required: bool) -> CustomField {
        CustomField {
            field_key: key.to_string(),
            label: key.to_string(),
            field_type: FieldType::Text,
            required,
            options: Vec::new(),
            validation: FieldValidation::default(),
        }
    }

    fn submitted(entries: &[(&str, FieldValue)]) -> HashMap<String, FieldValue> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let fields = vec![text_field("github", true)];
        let err = validate_answers(&fields, &HashMap::new()).unwrap_err();
        assert_eq!(err.field, "github");
        assert!(err.to_string().contains("github"));
    }

    #[test]
    fn blank_string_counts_as_missing_for_required_fields() {
        let fields = vec![text_field("github", true)];
        let err = validate_answers(
            &fields,
            &submitted(&[("github", FieldValue::Text("   ".into()))]),
        )
        .unwrap_err();
        assert_eq!(err.field, "github");
    }

    #[test]
    fn optional_blank_field_is_snapshotted_as_empty() {
        let fields = vec![text_field("portfolio", false)];
        let answers = validate_answers(
            &fields,
            &submitted(&[("portfolio", FieldValue::Text(String::new()))]),
        )
        .unwrap();
        assert_eq!(answers.len(), 1);
        assert!(answers[0].value.is_empty());
        assert_eq!(answers[0].field_key, "portfolio");
    }

    #[test]
    fn unknown_submitted_keys_are_ignored() {
        let fields = vec![text_field("github", false)];
        let answers = validate_answers(
            &fields,
            &submitted(&[("stray", FieldValue::Text("x".into()))]),
        )
        .unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].field_key, "github");
    }

    #[test]
    fn number_bounds_are_enforced() {
        let mut field = text_field("cgpa", true);
        field.field_type = FieldType::Number;
        field.validation.min = Some(0.0);
        field.validation.max = Some(10.0);
        let fields = vec![field];

        let err = validate_answers(
            &fields,
            &submitted(&[("cgpa", FieldValue::Number(11.0))]),
        )
        .unwrap_err();
        assert_eq!(err.field, "cgpa");

        let ok = validate_answers(
            &fields,
            &submitted(&[("cgpa", FieldValue::Text("8.2".into()))]),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn select_value_must_be_an_option() {
        let mut field = text_field("location", true);
        field.field_type = FieldType::Select;
        field.options = vec!["Remote".into(), "Onsite".into()];
        let fields = vec![field];

        let err = validate_answers(
            &fields,
            &submitted(&[("location", FieldValue::Text("Hybrid".into()))]),
        )
        .unwrap_err();
        assert_eq!(err.field, "location");
    }

    #[test]
    fn checkbox_accepts_list_and_single_string() {
        let mut field = text_field("stack", true);
        field.field_type = FieldType::Checkbox;
        field.options = vec!["rust".into(), "go".into()];
        let fields = vec![field];

        assert!(validate_answers(
            &fields,
            &submitted(&[("stack", FieldValue::Many(vec!["rust".into(), "go".into()]))]),
        )
        .is_ok());
        assert!(validate_answers(
            &fields,
            &submitted(&[("stack", FieldValue::Text("rust".into()))]),
        )
        .is_ok());
        assert!(validate_answers(
            &fields,
            &submitted(&[("stack", FieldValue::Many(vec!["java".into()]))]),
        )
        .is_err());
    }

    #[test]
    fn file_type_and_size_limits_apply() {
        let mut field = text_field("resume", true);
        field.field_type = FieldType::File;
        field.validation.allowed_file_types = Some(vec!["pdf".into()]);
        field.validation.max_file_size_mb = Some(1.0);
        let fields = vec![field];

        let good = FileRef {
            url: "https://files.example/resume.pdf".into(),
            file_name: "resume.pdf".into(),
            file_type: "pdf".into(),
            size_bytes: Some(512 * 1024),
        };
        assert!(validate_answers(
            &fields,
            &submitted(&[("resume", FieldValue::File(good.clone()))]),
        )
        .is_ok());

        let wrong_type = FileRef {
            file_type: "exe".into(),
            ..good.clone()
        };
        assert!(validate_answers(
            &fields,
            &submitted(&[("resume", FieldValue::File(wrong_type))]),
        )
        .is_err());

        let too_big = FileRef {
            size_bytes: Some(5 * 1024 * 1024),
            ..good
        };
        assert!(validate_answers(
            &fields,
            &submitted(&[("resume", FieldValue::File(too_big))]),
        )
        .is_err());
    }

    #[test]
    fn pattern_rule_is_applied_to_text() {
        let mut field = text_field("roll_no", true);
        field.validation.pattern = Some(r"^[A-Z]{2}\d{4}$".into());
        let fields = vec![field];

        assert!(validate_answers(
            &fields,
            &submitted(&[("roll_no", FieldValue::Text("CS1234".into()))]),
        )
        .is_ok());
        assert!(validate_answers(
            &fields,
            &submitted(&[("roll_no", FieldValue::Text("cs-12".into()))]),
        )
        .is_err());
    }

    #[test]
    fn schema_rejects_duplicate_keys_and_optionless_choices() {
        let fields = vec![text_field("a", false), text_field("a", false)];
        assert!(validate_schema(&fields).is_err());

        let mut select = text_field("pick", false);
        select.field_type = FieldType::Select;
        assert!(validate_schema(&[select]).is_err());

        assert!(validate_schema(&[text_field("ok", true)]).is_ok());
    }

    #[test]
    fn contact_patterns_match_expected_shapes() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(is_valid_mobile("9999999999"));
        assert!(!is_valid_mobile("12345"));
        assert!(!is_valid_mobile("99999999ab"));
    }

    #[test]
    fn string_arrays_deserialize_as_selections_not_files() {
        let value: FieldValue =
            serde_json::from_value(serde_json::json!(["rust", "go"])).unwrap();
        assert!(matches!(&value, FieldValue::Many(items) if items == &vec![
            "rust".to_string(),
            "go".to_string()
        ]));

        let value: FieldValue = serde_json::from_value(serde_json::json!({
            "url": "https://files.example/resume.pdf",
            "fileName": "resume.pdf"
        }))
        .unwrap();
        assert!(matches!(&value, FieldValue::File(file) if file.file_name == "resume.pdf"));
    }

    #[test]
    fn field_value_round_trips_through_json() {
        let answers = vec![
            CustomFieldAnswer {
                field_key: "portfolio".into(),
                label: "Portfolio".into(),
                field_type: FieldType::Url,
                value: FieldValue::Text("https://p.example".into()),
            },
            CustomFieldAnswer {
                field_key: "stack".into(),
                label: "Stack".into(),
                field_type: FieldType::Checkbox,
                value: FieldValue::Many(vec!["rust".into()]),
            },
        ];
        let json = serde_json::to_value(&answers).unwrap();
        let back: Vec<CustomFieldAnswer> = serde_json::from_value(json).unwrap();
        assert_eq!(back.len(), 2);
        assert!(matches!(&back[0].value, FieldValue::Text(s) if s == "https://p.example"));
        assert!(matches!(&back[1].value, FieldValue::Many(v) if v == &vec!["rust".to_string()]));
    }
}
