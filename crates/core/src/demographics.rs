//! Patient demographics.
//!
//! [`parse_patient`] validates a registration payload into a [`NewPatient`]. The repository
//! turns that into a stored [`Patient`] by assigning an identifier and an empty entry list.
//! [`PublicPatient`] is the redacted projection used for listings: it never carries the `ssn`
//! or the entries.

use crate::entries::Entry;
use crate::error::ValidationError;
use crate::validation::Fields;
use patientor_types::{DateText, Gender, NonEmptyText, Ssn};
use patientor_uuid::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Validated registration data for a patient that does not yet have an identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub date_of_birth: DateText,
    pub ssn: Ssn,
    pub gender: Gender,
    pub occupation: NonEmptyText,
}

/// A stored patient record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: RecordId,
    pub name: NonEmptyText,
    pub date_of_birth: DateText,
    pub ssn: Ssn,
    pub gender: Gender,
    pub occupation: NonEmptyText,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Patient {
    pub(crate) fn register(id: RecordId, new: NewPatient) -> Self {
        let NewPatient {
            name,
            date_of_birth,
            ssn,
            gender,
            occupation,
        } = new;
        Self {
            id,
            name,
            date_of_birth,
            ssn,
            gender,
            occupation,
            entries: Vec::new(),
        }
    }
}

/// Patient listing view without the sensitive identifier and the entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPatient {
    pub id: RecordId,
    pub name: NonEmptyText,
    pub date_of_birth: DateText,
    pub gender: Gender,
    pub occupation: NonEmptyText,
}

impl From<&Patient> for PublicPatient {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            date_of_birth: patient.date_of_birth.clone(),
            gender: patient.gender,
            occupation: patient.occupation.clone(),
        }
    }
}

/// Validates an untrusted patient registration payload.
///
/// Fields are checked in the order `name`, `dateOfBirth`, `ssn`, `gender`, `occupation`; the
/// first failure aborts the parse. No identifier is assigned here.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first missing or malformed field, or
/// [`ValidationError::NotAnObject`] if `raw` is not a JSON object.
pub fn parse_patient(raw: &Value) -> Result<NewPatient, ValidationError> {
    let fields = Fields::of(raw)?;
    Ok(NewPatient {
        name: fields.text("name")?,
        date_of_birth: fields.date("dateOfBirth")?,
        ssn: fields.ssn("ssn")?,
        gender: fields.gender("gender")?,
        occupation: fields.text("occupation")?,
    })
}
