//! Field-level checks shared by the user and recipe constructors.
//!
//! Every check is a pure function over the raw request value. Failures are
//! collected into [`ValidationErrors`] so a single response can report every
//! offending field at once.

use std::collections::BTreeMap;

use serde_json::Value;

pub const MIN_INSTRUCTIONS_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    Invalid,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn missing(message: impl Into<String>) -> Self {
        Self { kind: FieldErrorKind::Missing, message: message.into() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self { kind: FieldErrorKind::Invalid, message: message.into() }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self { kind: FieldErrorKind::Duplicate, message: message.into() }
    }
}

/// Field name → first error reported for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, error: FieldError) -> Self {
        let mut errors = Self::new();
        errors.add(field, error);
        errors
    }

    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.fields.entry(field).or_insert(error);
    }

    /// Unwraps `result`, recording its error under `field` on failure.
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.add(field, e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> + '_ {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Flat `field → message` view used by the error envelope.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.iter().map(|(k, v)| (k, v.message.clone())).collect()
    }
}

/// Treats `None` and `""` alike, returning the owned value otherwise.
pub fn validate_required(value: Option<&str>, message: &str) -> Result<String, FieldError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(FieldError::missing(message)),
    }
}

pub fn validate_title(title: Option<&str>) -> Result<String, FieldError> {
    match title {
        Some(t) if !t.is_empty() => Ok(t.to_owned()),
        _ => Err(FieldError::invalid("Title is required.")),
    }
}

/// Length is counted in Unicode scalar values, not bytes.
pub fn validate_instructions(instructions: Option<&str>) -> Result<String, FieldError> {
    match instructions {
        Some(i) if i.chars().count() >= MIN_INSTRUCTIONS_CHARS => Ok(i.to_owned()),
        _ => Err(FieldError::invalid(format!(
            "Instructions must be at least {MIN_INSTRUCTIONS_CHARS} characters long."
        ))),
    }
}

/// Accepts only JSON integers in `1..=i32::MAX`; floats, strings and booleans are rejected.
pub fn validate_minutes(minutes: Option<&Value>) -> Result<i32, FieldError> {
    minutes
        .and_then(Value::as_i64)
        .filter(|m| *m > 0)
        .and_then(|m| i32::try_from(m).ok())
        .ok_or_else(|| FieldError::invalid("Minutes to complete must be a positive integer."))
}
