use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;
use serde::Serialize;
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::models::profile::{parse_strict_date, EndDate};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"));
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").expect("url pattern compiles")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+91-\d{10}$").expect("phone pattern compiles"));

/// One field-level failure, shaped the way clients of the old API expect.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub value: Value,
    pub msg: String,
    pub path: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn new(path: impl Into<String>, value: Value, msg: impl Into<String>) -> Self {
        Self {
            kind: "field",
            value,
            msg: msg.into(),
            path: path.into(),
            location: "body",
        }
    }
}

/// Create mode enforces required fields; patch mode only checks what was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Patch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    /// Skipped when absent or null.
    Optional,
    /// Also skipped when empty string, `false` or `0`.
    OptionalFalsy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    NotEmpty,
    MinLength(usize),
    StringArray,
    Int,
    IntRange { min: i64, max: i64 },
    Email,
    Url,
    Phone,
    IsoDate,
    EndDate,
    Uuid,
}

impl Check {
    pub fn passes(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Check::NotEmpty => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            Check::MinLength(min) => value
                .as_str()
                .is_some_and(|s| s.trim().chars().count() >= *min),
            Check::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Check::Int => as_int(value).is_some_and(|n| i32::try_from(n).is_ok()),
            Check::IntRange { min, max } => {
                as_int(value).is_some_and(|n| (*min..=*max).contains(&n))
            }
            Check::Email => value.as_str().is_some_and(|s| EMAIL_RE.is_match(s.trim())),
            Check::Url => value.as_str().is_some_and(|s| URL_RE.is_match(s)),
            Check::Phone => value.as_str().is_some_and(|s| PHONE_RE.is_match(s)),
            Check::IsoDate => value.as_str().and_then(parse_iso_date).is_some(),
            Check::EndDate => value.as_str().and_then(EndDate::parse).is_some(),
            Check::Uuid => value.as_str().is_some_and(|s| Uuid::parse_str(s).is_ok()),
        }
    }
}

/// Normalisation applied to a field once the whole payload has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitize {
    Keep,
    Trim,
    Email,
    Int,
    Date,
    /// Falsy values become null so optional fields deserialize to `None`.
    DropFalsy,
}

#[derive(Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub presence: Presence,
    pub checks: &'static [(Check, &'static str)],
    pub sanitize: Sanitize,
}

/// The rule chain for one profile section.
#[derive(Debug)]
pub struct SectionRules {
    pub key: &'static str,
    pub array_message: &'static str,
    pub entry_message: &'static str,
    pub fields: &'static [FieldRule],
}

impl SectionRules {
    /// Validates `body[key]` as a list of entries, collecting every failure.
    pub fn validate_list(&self, body: &Value, mode: Mode) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let list = body.get(self.key);
        match list.and_then(Value::as_array) {
            Some(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    self.validate_entry(entry, &format!("{}[{i}]", self.key), mode, &mut errors);
                }
            }
            None => errors.push(FieldError::new(
                self.key,
                list.cloned().unwrap_or(Value::Null),
                self.array_message,
            )),
        }
        errors
    }

    /// Validates a single entry. An empty `prefix` yields bare field paths.
    pub fn validate_entry(
        &self,
        entry: &Value,
        prefix: &str,
        mode: Mode,
        errors: &mut Vec<FieldError>,
    ) {
        let Some(object) = entry.as_object() else {
            errors.push(FieldError::new(prefix, entry.clone(), self.entry_message));
            return;
        };

        for rule in self.fields {
            let value = object.get(rule.field).filter(|v| !v.is_null());
            if skip_field(rule.presence, mode, value) {
                continue;
            }
            let path = if prefix.is_empty() {
                rule.field.to_string()
            } else {
                format!("{prefix}.{}", rule.field)
            };
            for (check, message) in rule.checks {
                if !check.passes(value) {
                    let shown = value.cloned().unwrap_or(Value::Null);
                    errors.push(FieldError::new(&path, shown.clone(), render(message, &shown)));
                }
            }
        }
    }

    pub fn sanitize_list(&self, body: &mut Value) {
        if let Some(entries) = body.get_mut(self.key).and_then(Value::as_array_mut) {
            for entry in entries {
                self.sanitize_entry(entry);
            }
        }
    }

    pub fn sanitize_entry(&self, entry: &mut Value) {
        let Some(object) = entry.as_object_mut() else {
            return;
        };
        for rule in self.fields {
            if let Some(value) = object.get_mut(rule.field) {
                sanitize_value(rule.sanitize, value);
            }
        }
    }
}

fn skip_field(presence: Presence, mode: Mode, value: Option<&Value>) -> bool {
    match (presence, value) {
        (Presence::Required, None) => mode == Mode::Patch,
        (Presence::Optional | Presence::OptionalFalsy, None) => true,
        (Presence::OptionalFalsy, Some(v)) => is_falsy(v),
        _ => false,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Null => true,
        _ => false,
    }
}

fn render(message: &str, value: &Value) -> String {
    if !message.contains("{value}") {
        return message.to_string();
    }
    let shown = match value {
        Value::String(s) => s.clone(),
        Value::Null => "undefined".to_string(),
        other => other.to_string(),
    };
    message.replace("{value}", &shown)
}

/// Integers, integral floats and numeric strings all count as integers.
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// `YYYY-MM-DD` or an RFC 3339 timestamp, reduced to its calendar date.
fn parse_iso_date(raw: &str) -> Option<chrono::NaiveDate> {
    parse_strict_date(raw).or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

fn sanitize_value(kind: Sanitize, value: &mut Value) {
    match kind {
        Sanitize::Keep => {}
        Sanitize::Trim => {
            if let Value::String(s) = value {
                *s = s.trim().to_string();
            }
        }
        Sanitize::Email => {
            if let Value::String(s) = value {
                *s = normalize_email(s);
            }
        }
        Sanitize::Int => {
            if let Some(n) = as_int(value) {
                *value = Value::Number(Number::from(n));
            }
        }
        Sanitize::DropFalsy => {
            if is_falsy(value) {
                *value = Value::Null;
            }
        }
        Sanitize::Date => {
            if let Some(date) = value.as_str().and_then(parse_iso_date) {
                *value = Value::String(date.format("%Y-%m-%d").to_string());
            }
        }
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static DEMO: SectionRules = SectionRules {
        key: "things",
        array_message: "Things must be an array",
        entry_message: "Each thing must be an object",
        fields: &[
            FieldRule {
                field: "name",
                presence: Presence::Required,
                checks: &[(Check::NotEmpty, "Name cannot be empty")],
                sanitize: Sanitize::Trim,
            },
            FieldRule {
                field: "level",
                presence: Presence::Required,
                checks: &[(Check::IntRange { min: 1, max: 10 }, "Level must be between 1 and 10")],
                sanitize: Sanitize::Int,
            },
            FieldRule {
                field: "until",
                presence: Presence::OptionalFalsy,
                checks: &[(Check::EndDate, "{value} is not a valid date")],
                sanitize: Sanitize::Keep,
            },
        ],
    };

    #[test]
    fn test_missing_list_reports_array_message_only() {
        let errors = DEMO.validate_list(&json!({}), Mode::Create);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "things");
        assert_eq!(errors[0].msg, "Things must be an array");
    }

    #[test]
    fn test_collects_every_failure() {
        let body = json!({"things": [{"name": " ", "level": 11}, {"level": 0}]});
        let errors = DEMO.validate_list(&body, Mode::Create);
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["things[0].name", "things[0].level", "things[1].name", "things[1].level"]
        );
    }

    #[test]
    fn test_patch_mode_skips_absent_required_fields() {
        let body = json!({"things": [{"level": 4}]});
        assert!(DEMO.validate_list(&body, Mode::Patch).is_empty());
        assert_eq!(DEMO.validate_list(&body, Mode::Create).len(), 1);
    }

    #[test]
    fn test_patch_mode_still_checks_present_fields() {
        let body = json!({"things": [{"level": 42}]});
        let errors = DEMO.validate_list(&body, Mode::Patch);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].msg, "Level must be between 1 and 10");
        assert_eq!(errors[0].value, json!(42));
    }

    #[test]
    fn test_optional_falsy_skips_empty_string() {
        let body = json!({"things": [{"name": "a", "level": 1, "until": ""}]});
        assert!(DEMO.validate_list(&body, Mode::Create).is_empty());
    }

    #[test]
    fn test_message_renders_value() {
        let body = json!({"things": [{"name": "a", "level": 1, "until": "someday"}]});
        let errors = DEMO.validate_list(&body, Mode::Create);
        assert_eq!(errors[0].msg, "someday is not a valid date");
    }

    #[test]
    fn test_non_object_entry_is_reported() {
        let errors = DEMO.validate_list(&json!({"things": ["oops"]}), Mode::Create);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "things[0]");
    }

    #[test]
    fn test_sanitize_trims_and_coerces() {
        let mut body = json!({"things": [{"name": "  Go ", "level": "8"}]});
        DEMO.sanitize_list(&mut body);
        assert_eq!(body["things"][0]["name"], "Go");
        assert_eq!(body["things"][0]["level"], 8);
    }

    #[test]
    fn test_checks() {
        assert!(Check::Email.passes(Some(&json!("a@b.co"))));
        assert!(!Check::Email.passes(Some(&json!("not-an-email"))));
        assert!(Check::Url.passes(Some(&json!("https://linkedin.com/in/someone"))));
        assert!(!Check::Url.passes(Some(&json!("linkedin.com"))));
        assert!(Check::Phone.passes(Some(&json!("+91-9876543210"))));
        assert!(!Check::Phone.passes(Some(&json!("9876543210"))));
        assert!(Check::IsoDate.passes(Some(&json!("2021-04-01"))));
        assert!(Check::IsoDate.passes(Some(&json!("2021-04-01T00:00:00Z"))));
        assert!(!Check::IsoDate.passes(Some(&json!("April 2021"))));
        assert!(Check::Int.passes(Some(&json!("2020"))));
        assert!(!Check::Int.passes(Some(&json!(20.5))));
        assert!(!Check::NotEmpty.passes(Some(&json!(7))));
        assert!(!Check::StringArray.passes(Some(&json!(["a", 1]))));
        assert!(!Check::NotEmpty.passes(None));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }
}
