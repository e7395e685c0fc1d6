//! Ingestion front-end for student data.
//!
//! # Responsibility
//! - Turn each supported input shape into one canonical `StudentRecord`.
//! - Report structural problems as `ParseError`, never as validation errors.
//!
//! # Invariants
//! - No field rule is checked here; `Student::from_record` is the only
//!   validation path.
//! - Integer fields accept integers. Positional shapes also accept integer
//!   text; JSON integer fields must be JSON numbers.

use crate::model::student::StudentRecord;
use crate::model::validate::ValidationError;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field delimiter of the delimited-text shape.
pub const FIELD_DELIMITER: char = ';';
/// Number of values carried by positional shapes.
pub const FIELD_COUNT: usize = 7;

/// Canonical field names in positional order.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "student_id",
    "first_name",
    "last_name",
    "patronymic",
    "address",
    "phone",
    "min_required_facultative_hours",
];

const INTEGER_FIELDS: [&str; 2] = [FIELD_NAMES[0], FIELD_NAMES[6]];

/// Structural failure while normalizing an input shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Positional shape carries the wrong number of values.
    FieldCount {
        shape: &'static str,
        expected: usize,
        actual: usize,
    },
    /// JSON text could not be decoded.
    InvalidJson(String),
    /// JSON text decoded to something other than an object.
    NotAnObject,
    MissingField(&'static str),
    /// Integer field holds a value that is not an integer.
    NotAnInteger { field: &'static str, value: String },
    /// Text field holds a non-text value.
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount {
                shape,
                expected,
                actual,
            } => write!(
                f,
                "{shape} must contain exactly {expected} values, got {actual}"
            ),
            Self::InvalidJson(message) => write!(f, "invalid JSON: {message}"),
            Self::NotAnObject => write!(f, "JSON student must be an object"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::NotAnInteger { field, value } => {
                write!(f, "`{field}` must be an integer, got `{value}`")
            }
            Self::WrongType { field, expected } => {
                write!(f, "`{field}` must be {expected}")
            }
        }
    }
}

impl Error for ParseError {}

/// Failure of entity construction: structural or semantic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentError {
    Parse(ParseError),
    Validation(ValidationError),
}

impl Display for StudentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StudentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ParseError> for StudentError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<ValidationError> for StudentError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// One loosely typed value of a positional or JSON input.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
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

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Int(int),
                None => Self::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(text) => Self::Text(text.clone()),
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }
}

impl FieldValue {
    fn describe(&self) -> String {
        match self {
            Self::Absent => "null".to_string(),
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }

    fn into_integer(self, field: &'static str) -> Result<i64, ParseError> {
        match self {
            Self::Int(value) => Ok(value),
            Self::Text(text) => text.trim().parse::<i64>().map_err(|_| ParseError::NotAnInteger {
                field,
                value: text,
            }),
            Self::Absent => Err(ParseError::MissingField(field)),
            other => Err(ParseError::NotAnInteger {
                field,
                value: other.describe(),
            }),
        }
    }

    fn into_text(self, field: &'static str) -> Result<String, ParseError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Absent => Err(ParseError::MissingField(field)),
            _ => Err(ParseError::WrongType {
                field,
                expected: "a string",
            }),
        }
    }

    fn into_optional_text(self, field: &'static str) -> Result<Option<String>, ParseError> {
        match self {
            Self::Absent => Ok(None),
            other => other.into_text(field).map(Some),
        }
    }

    fn into_hours(self, field: &'static str) -> Result<i64, ParseError> {
        match self {
            Self::Absent => Ok(0),
            other => other.into_integer(field),
        }
    }
}

/// Explicitly tagged input shape for `Student::parse`.
#[derive(Debug, Clone, PartialEq)]
pub enum StudentInput {
    /// JSON object text with canonical keys.
    Json(String),
    /// Seven `;`-separated values in canonical order.
    Delimited(String),
    /// Seven positional values in canonical order.
    Tuple(Vec<FieldValue>),
    /// Already-named fields.
    Fields(StudentRecord),
}

impl StudentInput {
    /// Picks the text shape by content: `{...}` is JSON, anything else is
    /// delimited text.
    pub fn sniff(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            Self::Json(text)
        } else {
            Self::Delimited(text)
        }
    }

    /// Normalizes this input into the canonical record.
    pub fn into_record(self) -> Result<StudentRecord, ParseError> {
        match self {
            Self::Json(text) => parse_json(&text),
            Self::Delimited(text) => parse_delimited(&text),
            Self::Tuple(values) => parse_tuple(values),
            Self::Fields(record) => Ok(record),
        }
    }
}

/// Parses a JSON object with canonical keys.
pub fn parse_json(text: &str) -> Result<StudentRecord, ParseError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| ParseError::InvalidJson(err.to_string()))?;
    parse_json_value(&value)
}

/// Parses an already-decoded JSON value.
///
/// Used by the file-backed repository, which decodes the whole file once.
pub fn parse_json_value(value: &Value) -> Result<StudentRecord, ParseError> {
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;
    for field in INTEGER_FIELDS {
        if let Some(Value::String(text)) = object.get(field) {
            return Err(ParseError::NotAnInteger {
                field,
                value: text.clone(),
            });
        }
    }
    let values = FIELD_NAMES.map(|name| object_field(object, name));
    record_from_values(values)
}

/// Parses seven `;`-separated values.
pub fn parse_delimited(text: &str) -> Result<StudentRecord, ParseError> {
    let parts: Vec<&str> = text.split(FIELD_DELIMITER).collect();
    if parts.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount {
            shape: "delimited string",
            expected: FIELD_COUNT,
            actual: parts.len(),
        });
    }
    parse_tuple(parts.into_iter().map(FieldValue::from).collect())
}

/// Parses seven positional values.
pub fn parse_tuple(values: Vec<FieldValue>) -> Result<StudentRecord, ParseError> {
    let actual = values.len();
    let values: [FieldValue; FIELD_COUNT] =
        values.try_into().map_err(|_| ParseError::FieldCount {
            shape: "tuple",
            expected: FIELD_COUNT,
            actual,
        })?;
    record_from_values(values)
}

fn object_field(object: &Map<String, Value>, name: &str) -> FieldValue {
    object.get(name).map_or(FieldValue::Absent, FieldValue::from)
}

fn record_from_values(values: [FieldValue; FIELD_COUNT]) -> Result<StudentRecord, ParseError> {
    let [id, first_name, last_name, patronymic, address, phone, hours] = values;
    Ok(StudentRecord {
        student_id: id.into_integer(FIELD_NAMES[0])?,
        first_name: first_name.into_text(FIELD_NAMES[1])?,
        last_name: last_name.into_text(FIELD_NAMES[2])?,
        patronymic: patronymic.into_optional_text(FIELD_NAMES[3])?,
        address: address.into_text(FIELD_NAMES[4])?,
        phone: phone.into_text(FIELD_NAMES[5])?,
        min_required_facultative_hours: hours.into_hours(FIELD_NAMES[6])?,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        parse_delimited, parse_json, parse_tuple, FieldValue, ParseError, StudentInput,
    };

    const ADDRESS: &str = "г. Москва, ул. Ленина, д. 5, кв. 10";

    #[test]
    fn delimited_requires_seven_segments() {
        let err = parse_delimited("1;Ivan;Petrov").unwrap_err();
        assert_eq!(
            err,
            ParseError::FieldCount {
                shape: "delimited string",
                expected: 7,
                actual: 3,
            }
        );
    }

    #[test]
    fn delimited_rejects_fractional_id() {
        let text = format!("5.0;Ivan;Petrov;;{ADDRESS};+79161234567;0");
        let err = parse_delimited(&text).unwrap_err();
        assert_eq!(
            err,
            ParseError::NotAnInteger {
                field: "student_id",
                value: "5.0".to_string(),
            }
        );
    }

    #[test]
    fn json_defaults_optional_fields() {
        let text = format!(
            r#"{{"student_id": 3, "first_name": "Ivan", "last_name": "Petrov",
                "address": "{ADDRESS}", "phone": "+79161234567"}}"#
        );
        let record = parse_json(&text).unwrap();
        assert_eq!(record.student_id, 3);
        assert_eq!(record.patronymic, None);
        assert_eq!(record.min_required_facultative_hours, 0);
    }

    #[test]
    fn json_reports_missing_and_mistyped_fields() {
        let missing = parse_json(r#"{"student_id": 1, "first_name": "Ivan"}"#).unwrap_err();
        assert_eq!(missing, ParseError::MissingField("last_name"));

        let text = format!(
            r#"{{"student_id": 1.5, "first_name": "Ivan", "last_name": "Petrov",
                "address": "{ADDRESS}", "phone": "+79161234567"}}"#
        );
        assert!(matches!(
            parse_json(&text).unwrap_err(),
            ParseError::NotAnInteger { field: "student_id", .. }
        ));

        let text = format!(
            r#"{{"student_id": 1, "first_name": 42, "last_name": "Petrov",
                "address": "{ADDRESS}", "phone": "+79161234567"}}"#
        );
        assert_eq!(
            parse_json(&text).unwrap_err(),
            ParseError::WrongType {
                field: "first_name",
                expected: "a string",
            }
        );
    }

    #[test]
    fn json_integer_fields_reject_numeric_text() {
        let text = format!(
            r#"{{"student_id": "5", "first_name": "Ivan", "last_name": "Petrov",
                "address": "{ADDRESS}", "phone": "+79161234567"}}"#
        );
        assert_eq!(
            parse_json(&text).unwrap_err(),
            ParseError::NotAnInteger {
                field: "student_id",
                value: "5".to_string(),
            }
        );

        let text = format!(
            r#"{{"student_id": 5, "first_name": "Ivan", "last_name": "Petrov",
                "address": "{ADDRESS}", "phone": "+79161234567",
                "min_required_facultative_hours": "3"}}"#
        );
        assert!(matches!(
            parse_json(&text).unwrap_err(),
            ParseError::NotAnInteger {
                field: "min_required_facultative_hours",
                ..
            }
        ));

        let delimited = format!("5;Ivan;Petrov;;{ADDRESS};+79161234567;3");
        let record = parse_delimited(&delimited).unwrap();
        assert_eq!(record.student_id, 5);
        assert_eq!(record.min_required_facultative_hours, 3);
    }

    #[test]
    fn json_rejects_malformed_text_and_non_objects() {
        assert!(matches!(
            parse_json("{not json}").unwrap_err(),
            ParseError::InvalidJson(_)
        ));
        assert_eq!(parse_json("[1, 2]").unwrap_err(), ParseError::NotAnObject);
    }

    #[test]
    fn tuple_requires_seven_values() {
        let err = parse_tuple(vec![FieldValue::Int(1), FieldValue::from("Ivan")]).unwrap_err();
        assert!(matches!(err, ParseError::FieldCount { actual: 2, .. }));
    }

    #[test]
    fn sniff_selects_shape_by_braces() {
        assert!(matches!(StudentInput::sniff(" {\"a\": 1} "), StudentInput::Json(_)));
        assert!(matches!(
            StudentInput::sniff("1;a;b;c;d;e;0"),
            StudentInput::Delimited(_)
        ));
    }
}
