//! Schema checks for raw experience input
//!
//! Turns untyped JSON into a `NewExperience`, or reports every problem found
//! with a field path so the caller can show all of them at once.

use chrono::DateTime;
use serde_json::Value;

use super::NewExperience;

/// A single problem with one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All problems found in one raw record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid experience: {}", join(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// True when some error is reported at exactly this path
    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}

fn join(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

const REQUIRED_STRINGS: &[&[&str]] = &[
    &["learner", "id"],
    &["context", "location", "name"],
    &["experience", "type"],
    &["experience", "description"],
];

/// Validate raw input and convert it into a `NewExperience`
pub fn validate(raw: &Value) -> Result<NewExperience, ValidationErrors> {
    let mut errors = Vec::new();

    if !raw.is_object() {
        errors.push(FieldError::new("$", "expected an object"));
        return Err(ValidationErrors { errors });
    }

    for path in REQUIRED_STRINGS {
        let dotted = path.join(".");
        match lookup(raw, path) {
            None | Some(Value::Null) => errors.push(FieldError::new(&dotted, "is required")),
            Some(Value::String(s)) if s.trim().is_empty() => {
                errors.push(FieldError::new(&dotted, "must not be empty"))
            }
            Some(Value::String(_)) => {}
            Some(_) => errors.push(FieldError::new(&dotted, "must be a string")),
        }
    }

    match raw.get("id") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) if !s.trim().is_empty() => {}
        Some(_) => errors.push(FieldError::new("id", "must be a non-empty string")),
    }

    match raw.get("timestamp") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => {
            if DateTime::parse_from_rfc3339(s).is_err() {
                errors.push(FieldError::new("timestamp", "must be an ISO-8601 date-time"));
            }
        }
        Some(_) => errors.push(FieldError::new("timestamp", "must be a string")),
    }

    check_coordinates(raw, &mut errors);
    check_string_list(raw, &["experience", "domains"], &mut errors);
    check_string_list(raw, &["experience", "outcome", "connections_made"], &mut errors);
    check_string_list(raw, &["experience", "outcome", "next_questions"], &mut errors);
    check_range(raw, &["experience", "intensity"], 1, 10, &mut errors);
    check_range(raw, &["experience", "duration"], 0, u32::MAX as u64, &mut errors);

    if let Some(level) = lookup(raw, &["privacy", "level"]) {
        let known = level
            .as_str()
            .map(|s| s.parse::<super::PrivacyLevel>().is_ok())
            .unwrap_or(false);
        if !known {
            errors.push(FieldError::new(
                "privacy.level",
                "must be one of public, anonymized, private",
            ));
        }
    }

    if !errors.is_empty() {
        return Err(ValidationErrors { errors });
    }

    serde_json::from_value::<NewExperience>(raw.clone()).map_err(|e| ValidationErrors {
        errors: vec![FieldError::new("$", e.to_string())],
    })
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

fn check_coordinates(raw: &Value, errors: &mut Vec<FieldError>) {
    let coords = match lookup(raw, &["context", "location", "coordinates"]) {
        None | Some(Value::Null) => return,
        Some(c) => c,
    };
    for (key, limit) in [("latitude", 90.0), ("longitude", 180.0)] {
        let path = format!("context.location.coordinates.{}", key);
        match coords.get(key).and_then(Value::as_f64) {
            None => errors.push(FieldError::new(&path, "must be a number")),
            Some(v) if !(-limit..=limit).contains(&v) => errors.push(FieldError::new(
                &path,
                format!("must be between -{} and {}", limit, limit),
            )),
            Some(_) => {}
        }
    }
}

fn check_string_list(raw: &Value, path: &[&str], errors: &mut Vec<FieldError>) {
    let dotted = path.join(".");
    match lookup(raw, path) {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(s) if !s.trim().is_empty() => {}
                    _ => errors.push(FieldError::new(
                        &format!("{}[{}]", dotted, i),
                        "must be a non-empty string",
                    )),
                }
            }
        }
        Some(_) => errors.push(FieldError::new(&dotted, "must be a list of strings")),
    }
}

fn check_range(raw: &Value, path: &[&str], min: u64, max: u64, errors: &mut Vec<FieldError>) {
    let dotted = path.join(".");
    match lookup(raw, path) {
        None | Some(Value::Null) => {}
        Some(v) => match v.as_u64() {
            Some(n) if n >= min && n <= max => {}
            _ => errors.push(FieldError::new(
                &dotted,
                format!("must be an integer between {} and {}", min, max),
            )),
        },
    }
}
