//! Clinical entries.
//!
//! An entry is one of three kinds, selected by the `type` discriminant of its JSON form:
//!
//! | `type` | Kind-specific fields |
//! |---|---|
//! | `HealthCheck` | `healthCheckRating` (0-3) |
//! | `Hospital` | `discharge { date, criteria }` |
//! | `OccupationalHealthcare` | `employerName`, optional `sickLeave { startDate, endDate }` |
//!
//! All kinds share `date`, `description`, `specialist` and `diagnosisCodes`. [`parse_entry`]
//! turns an untrusted JSON payload into a [`NewEntry`]; the repository assigns the identifier
//! when the entry is attached to a patient.

use crate::error::ValidationError;
use crate::validation::{string_pair, Fields};
use patientor_types::{DateText, HealthCheckRating, NonEmptyText};
use patientor_uuid::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Types
// ============================================================================

/// Fields common to every entry kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBase {
    pub date: DateText,
    pub description: NonEmptyText,
    pub specialist: NonEmptyText,
    #[serde(default)]
    pub diagnosis_codes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discharge {
    pub date: String,
    pub criteria: NonEmptyText,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    pub start_date: String,
    pub end_date: String,
}

/// Kind-specific part of an entry, tagged by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryDetails {
    HealthCheck {
        #[serde(rename = "healthCheckRating")]
        health_check_rating: HealthCheckRating,
    },
    Hospital {
        discharge: Discharge,
    },
    OccupationalHealthcare {
        #[serde(rename = "employerName")]
        employer_name: NonEmptyText,
        #[serde(rename = "sickLeave", default, skip_serializing_if = "Option::is_none")]
        sick_leave: Option<SickLeave>,
    },
}

impl EntryDetails {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryDetails::HealthCheck { .. } => EntryKind::HealthCheck,
            EntryDetails::Hospital { .. } => EntryKind::Hospital,
            EntryDetails::OccupationalHealthcare { .. } => EntryKind::OccupationalHealthcare,
        }
    }
}

/// A validated entry that has not yet been attached to a patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(flatten)]
    pub base: EntryBase,
    #[serde(flatten)]
    pub details: EntryDetails,
}

impl NewEntry {
    pub fn kind(&self) -> EntryKind {
        self.details.kind()
    }
}

/// An entry stored on a patient record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: RecordId,
    #[serde(flatten)]
    pub entry: NewEntry,
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        self.entry.kind()
    }
}

/// The entry discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    HealthCheck,
    Hospital,
    OccupationalHealthcare,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::HealthCheck => "HealthCheck",
            EntryKind::Hospital => "Hospital",
            EntryKind::OccupationalHealthcare => "OccupationalHealthcare",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HealthCheck" => Ok(EntryKind::HealthCheck),
            "Hospital" => Ok(EntryKind::Hospital),
            "OccupationalHealthcare" => Ok(EntryKind::OccupationalHealthcare),
            other => Err(ValidationError::UnknownEntryType {
                received: other.to_owned(),
            }),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Validates an untrusted entry payload.
///
/// Reads `type`, then runs the parser for that kind. Fields are checked in the order `date`,
/// `description`, `specialist`, `diagnosisCodes`, then the kind-specific fields, and the first
/// failure aborts the parse.
///
/// # Errors
///
/// - [`ValidationError::NotAnObject`] if `raw` is not a JSON object,
/// - [`ValidationError::UnknownEntryType`] if `type` is absent or not a recognised kind,
/// - [`ValidationError::Missing`] / [`ValidationError::Malformed`] for the first bad field.
pub fn parse_entry(raw: &Value) -> Result<NewEntry, ValidationError> {
    let fields = Fields::of(raw)?;
    match entry_kind(&fields)? {
        EntryKind::HealthCheck => parse_health_check(&fields),
        EntryKind::Hospital => parse_hospital(&fields),
        EntryKind::OccupationalHealthcare => parse_occupational(&fields),
    }
}

fn entry_kind(fields: &Fields<'_>) -> Result<EntryKind, ValidationError> {
    match fields.get("type") {
        Some(Value::String(tag)) => tag.parse(),
        Some(other) => Err(ValidationError::UnknownEntryType {
            received: other.to_string(),
        }),
        None => Err(ValidationError::UnknownEntryType {
            received: "undefined".into(),
        }),
    }
}

fn parse_base(fields: &Fields<'_>) -> Result<EntryBase, ValidationError> {
    Ok(EntryBase {
        date: fields.date("date")?,
        description: fields.text("description")?,
        specialist: fields.text("specialist")?,
        diagnosis_codes: fields.diagnosis_codes("diagnosisCodes"),
    })
}

fn parse_health_check(fields: &Fields<'_>) -> Result<NewEntry, ValidationError> {
    let base = parse_base(fields)?;
    let details = EntryDetails::HealthCheck {
        health_check_rating: fields.health_check_rating("healthCheckRating")?,
    };
    Ok(NewEntry { base, details })
}

fn parse_hospital(fields: &Fields<'_>) -> Result<NewEntry, ValidationError> {
    let base = parse_base(fields)?;
    let [date, criteria] = string_pair("discharge", fields.get("discharge"), ["date", "criteria"])?;
    let criteria = NonEmptyText::new(criteria)
        .map_err(|_| ValidationError::malformed("discharge", "criteria cannot be empty"))?;
    let details = EntryDetails::Hospital {
        discharge: Discharge {
            date: date.to_owned(),
            criteria,
        },
    };
    Ok(NewEntry { base, details })
}

fn parse_occupational(fields: &Fields<'_>) -> Result<NewEntry, ValidationError> {
    let base = parse_base(fields)?;
    let employer_name = fields.text("employerName")?;
    let sick_leave = match fields.get("sickLeave") {
        None => None,
        leave => {
            let [start_date, end_date] =
                string_pair("sickLeave", leave, ["startDate", "endDate"])?;
            Some(SickLeave {
                start_date: start_date.to_owned(),
                end_date: end_date.to_owned(),
            })
        }
    };
    let details = EntryDetails::OccupationalHealthcare {
        employer_name,
        sick_leave,
    };
    Ok(NewEntry { base, details })
}
