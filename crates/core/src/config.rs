//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::DEFAULT_SEED_PATIENTS;
use crate::repositories::diagnoses::DiagnosisReference;
use crate::repositories::patients::PatientRepository;
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    diagnoses_file: Option<PathBuf>,
    patients_file: Option<PathBuf>,
    seed_patients: bool,
}

impl Default for CoreConfig {
    /// Bundled diagnoses and bundled demo patients.
    fn default() -> Self {
        Self {
            diagnoses_file: None,
            patients_file: None,
            seed_patients: DEFAULT_SEED_PATIENTS,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `None` for a file selects the data bundled with the crate. A patients file is only
    /// meaningful when seeding is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidInput`] if a configured path is not a regular file, or
    /// if a patients file is given while seeding is disabled.
    pub fn new(
        diagnoses_file: Option<PathBuf>,
        patients_file: Option<PathBuf>,
        seed_patients: bool,
    ) -> PatientResult<Self> {
        for path in diagnoses_file.iter().chain(patients_file.iter()) {
            if !path.is_file() {
                return Err(PatientError::InvalidInput(format!(
                    "data file does not exist or is not a file: {}",
                    path.display()
                )));
            }
        }

        if patients_file.is_some() && !seed_patients {
            return Err(PatientError::InvalidInput(
                "a patients file was configured but patient seeding is disabled".into(),
            ));
        }

        Ok(Self {
            diagnoses_file,
            patients_file,
            seed_patients,
        })
    }

    pub fn diagnoses_file(&self) -> Option<&Path> {
        self.diagnoses_file.as_deref()
    }

    pub fn patients_file(&self) -> Option<&Path> {
        self.patients_file.as_deref()
    }

    pub fn seed_patients(&self) -> bool {
        self.seed_patients
    }

    /// Loads the diagnosis reference list this configuration selects.
    pub fn load_diagnoses(&self) -> PatientResult<DiagnosisReference> {
        match &self.diagnoses_file {
            Some(path) => DiagnosisReference::from_file(path),
            None => DiagnosisReference::bundled(),
        }
    }

    /// Builds the patient repository this configuration selects.
    pub fn load_patients(&self) -> PatientResult<PatientRepository> {
        match (&self.patients_file, self.seed_patients) {
            (_, false) => Ok(PatientRepository::new()),
            (Some(path), true) => PatientRepository::from_file(path),
            (None, true) => PatientRepository::bundled(),
        }
    }
}

/// Turn an optional path value into a data file override.
///
/// `None` or an empty/whitespace value means "use the bundled data".
pub fn data_file_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Parse the seeding switch from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_SEED_PATIENTS`].
pub fn seed_patients_from_env_value(value: Option<String>) -> PatientResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(DEFAULT_SEED_PATIENTS),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(PatientError::InvalidInput(format!(
            "seed patients flag must be true or false, got '{other}'"
        ))),
    }
}
