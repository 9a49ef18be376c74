//! Field validators for untrusted JSON input.
//!
//! Every validator takes the raw value of one field (`None` when the key is absent) and either
//! narrows it to a typed value or returns a [`ValidationError`] naming the field. A JSON `null`
//! is treated the same as an absent key.
//!
//! [`Fields`] wraps a JSON object and exposes one accessor per field kind, so a parser reads as
//! a list of `fields.kind("name")?` calls in validation order.

use crate::error::ValidationError;
use patientor_types::{DateText, Gender, HealthCheckRating, NonEmptyText, Ssn, TextError};
use serde_json::{Map, Value};

/// Borrowed view of a JSON object being validated.
#[derive(Clone, Copy, Debug)]
pub struct Fields<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Wraps `raw`, which must be a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAnObject`] for any other JSON value.
    pub fn of(raw: &'a Value) -> Result<Self, ValidationError> {
        raw.as_object()
            .map(|object| Self { object })
            .ok_or(ValidationError::NotAnObject)
    }

    /// Raw value of `field`, with `null` folded into absence.
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|value| !value.is_null())
    }

    pub fn text(&self, field: &'static str) -> Result<NonEmptyText, ValidationError> {
        text(field, self.get(field))
    }

    pub fn date(&self, field: &'static str) -> Result<DateText, ValidationError> {
        date(field, self.get(field))
    }

    pub fn ssn(&self, field: &'static str) -> Result<Ssn, ValidationError> {
        ssn(field, self.get(field))
    }

    pub fn gender(&self, field: &'static str) -> Result<Gender, ValidationError> {
        gender(field, self.get(field))
    }

    pub fn health_check_rating(
        &self,
        field: &'static str,
    ) -> Result<HealthCheckRating, ValidationError> {
        health_check_rating(field, self.get(field))
    }

    pub fn diagnosis_codes(&self, field: &'static str) -> Vec<String> {
        diagnosis_codes(self.get(field))
    }
}

fn describe(value: &Value) -> String {
    value.to_string()
}

fn string<'v>(field: &'static str, value: Option<&'v Value>) -> Result<&'v str, ValidationError> {
    let value = value.ok_or(ValidationError::Missing { field })?;
    value.as_str().ok_or_else(|| {
        ValidationError::malformed(field, format!("expected a string, got {}", describe(value)))
    })
}

fn from_text_error(field: &'static str, err: TextError) -> ValidationError {
    ValidationError::malformed(field, err.to_string())
}

/// Free-text field: must be a string with at least one non-whitespace character.
pub fn text(field: &'static str, value: Option<&Value>) -> Result<NonEmptyText, ValidationError> {
    NonEmptyText::new(string(field, value)?).map_err(|e| from_text_error(field, e))
}

/// Date field: must be a string holding a valid calendar date or date-time.
pub fn date(field: &'static str, value: Option<&Value>) -> Result<DateText, ValidationError> {
    DateText::parse(string(field, value)?).map_err(|e| from_text_error(field, e))
}

pub fn ssn(field: &'static str, value: Option<&Value>) -> Result<Ssn, ValidationError> {
    Ssn::parse(string(field, value)?).map_err(|e| from_text_error(field, e))
}

/// Gender field: exactly `male`, `female` or `other`.
pub fn gender(field: &'static str, value: Option<&Value>) -> Result<Gender, ValidationError> {
    string(field, value)?
        .parse()
        .map_err(|e| from_text_error(field, e))
}

/// Rating field: a JSON number whose value is 0, 1, 2 or 3. Strings such as `"2"` are rejected.
pub fn health_check_rating(
    field: &'static str,
    value: Option<&Value>,
) -> Result<HealthCheckRating, ValidationError> {
    let value = value.ok_or(ValidationError::Missing { field })?;
    value
        .as_f64()
        .ok_or_else(|| {
            ValidationError::malformed(field, format!("expected a number, got {}", describe(value)))
        })
        .and_then(|n| {
            HealthCheckRating::from_number(n).map_err(|_| {
                ValidationError::malformed(
                    field,
                    format!("expected one of 0, 1, 2, 3, got {}", describe(value)),
                )
            })
        })
}

/// Diagnosis codes never fail: anything other than a non-empty array of strings becomes an
/// empty list.
pub fn diagnosis_codes(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

/// Shape check for a nested object: `value` must be an object carrying every key in
/// `required` with a string value. Returns the strings in `required` order.
pub fn string_pair<'v>(
    field: &'static str,
    value: Option<&'v Value>,
    required: [&'static str; 2],
) -> Result<[&'v str; 2], ValidationError> {
    let value = value.ok_or(ValidationError::Missing { field })?;
    let shape_error = || {
        ValidationError::malformed(
            field,
            format!(
                "expected an object with string `{}` and `{}`, got {}",
                required[0],
                required[1],
                describe(value)
            ),
        )
    };
    let object = value.as_object().ok_or_else(shape_error)?;
    let first = object.get(required[0]).and_then(Value::as_str);
    let second = object.get(required[1]).and_then(Value::as_str);
    match (first, second) {
        (Some(first), Some(second)) => Ok([first, second]),
        _ => Err(shape_error()),
    }
}
