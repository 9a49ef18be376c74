//! Diagnosis reference list.
//!
//! A read-only table of diagnosis codes, loaded once at start-up. Entries refer to diagnoses by
//! code; the codes are not checked against this table when an entry is accepted, the table only
//! serves lookups for display.

use super::helpers::parse_json_with_path;
use crate::{PatientError, PatientResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUNDLED_DIAGNOSES_JSON: &str = include_str!("../../data/diagnoses.json");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}

/// Immutable list of known diagnoses, in source order.
#[derive(Clone, Debug, Default)]
pub struct DiagnosisReference {
    diagnoses: Vec<Diagnosis>,
}

impl DiagnosisReference {
    /// Builds the reference from `diagnoses`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::DuplicateId`] if a code appears twice, or
    /// [`PatientError::ReferenceData`] if a code or name is blank.
    pub fn new(diagnoses: Vec<Diagnosis>) -> PatientResult<Self> {
        let mut codes = HashSet::new();
        for diagnosis in &diagnoses {
            if diagnosis.code.trim().is_empty() || diagnosis.name.trim().is_empty() {
                return Err(PatientError::ReferenceData(format!(
                    "diagnosis code and name cannot be empty (code: '{}')",
                    diagnosis.code
                )));
            }
            if !codes.insert(diagnosis.code.as_str()) {
                return Err(PatientError::DuplicateId {
                    id: diagnosis.code.clone(),
                });
            }
        }
        Ok(Self { diagnoses })
    }

    /// Parses a JSON array of diagnoses.
    pub fn from_json(json_text: &str) -> PatientResult<Self> {
        Self::new(parse_json_with_path("diagnoses", json_text)?)
    }

    pub fn from_file(path: &Path) -> PatientResult<Self> {
        let text = std::fs::read_to_string(path).map_err(PatientError::FileRead)?;
        Self::from_json(&text)
    }

    /// The reference list compiled into the binary.
    pub fn bundled() -> PatientResult<Self> {
        Self::from_json(BUNDLED_DIAGNOSES_JSON)
    }

    pub fn list(&self) -> &[Diagnosis] {
        &self.diagnoses
    }

    /// Looks up a diagnosis by exact code.
    pub fn get(&self, code: &str) -> Option<&Diagnosis> {
        self.diagnoses.iter().find(|d| d.code == code)
    }

    pub fn len(&self) -> usize {
        self.diagnoses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnoses.is_empty()
    }
}
