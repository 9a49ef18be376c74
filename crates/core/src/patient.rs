//! Patient service.
//!
//! [`PatientService`] is the entry point used by the API layers. It owns handles to the patient
//! repository and the diagnosis reference, both constructed once at start-up, and exposes the
//! record operations on top of them.

use crate::config::CoreConfig;
use crate::demographics::{parse_patient, NewPatient, Patient, PublicPatient};
use crate::entries::{parse_entry, NewEntry};
use crate::error::PatientResult;
use crate::repositories::diagnoses::{Diagnosis, DiagnosisReference};
use crate::repositories::patients::PatientRepository;
use serde_json::Value;
use std::sync::Arc;

/// Pure patient data operations - no API concerns
#[derive(Clone, Debug)]
pub struct PatientService {
    patients: Arc<PatientRepository>,
    diagnoses: Arc<DiagnosisReference>,
}

impl PatientService {
    /// Creates a new instance of PatientService over existing state.
    pub fn new(patients: Arc<PatientRepository>, diagnoses: Arc<DiagnosisReference>) -> Self {
        Self {
            patients,
            diagnoses,
        }
    }

    /// Loads diagnoses and patients as selected by `cfg`.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if a configured data file cannot be read or does not match the
    /// expected schema.
    pub fn from_config(cfg: &CoreConfig) -> PatientResult<Self> {
        let diagnoses = cfg.load_diagnoses()?;
        let patients = cfg.load_patients()?;
        tracing::info!(
            diagnoses = diagnoses.len(),
            patients = patients.len(),
            "patient service initialised"
        );
        Ok(Self::new(Arc::new(patients), Arc::new(diagnoses)))
    }

    pub fn list_public_patients(&self) -> Vec<PublicPatient> {
        self.patients.list_public()
    }

    /// Returns the full patient record, including `ssn` and entries.
    pub fn get_patient(&self, id: &str) -> PatientResult<Patient> {
        self.patients.get(id)
    }

    pub fn create_patient(&self, new: NewPatient) -> Patient {
        let patient = self.patients.create(new);
        tracing::info!(patient_id = %patient.id, "created patient");
        patient
    }

    pub fn append_entry(&self, patient_id: &str, entry: NewEntry) -> PatientResult<Patient> {
        let kind = entry.kind();
        let patient = self.patients.append_entry(patient_id, entry)?;
        tracing::info!(patient_id, %kind, "added entry");
        Ok(patient)
    }

    pub fn list_diagnoses(&self) -> Vec<Diagnosis> {
        self.diagnoses.list().to_vec()
    }

    pub fn diagnosis(&self, code: &str) -> Option<Diagnosis> {
        self.diagnoses.get(code).cloned()
    }

    /// Validates a registration payload and stores the patient.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` for the first invalid field; nothing is stored.
    pub fn register_patient(&self, raw: &Value) -> PatientResult<Patient> {
        let new = parse_patient(raw).inspect_err(|e| {
            tracing::warn!("rejected patient payload: {e}");
        })?;
        Ok(self.create_patient(new))
    }

    /// Validates an entry payload and appends it to the patient `patient_id`.
    ///
    /// The payload is validated before the patient is looked up, so an invalid payload is
    /// reported as a validation error even for an unknown patient.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` for the first invalid field, or
    /// `PatientError::NotFound` if the patient does not exist. Either way nothing is stored.
    pub fn add_entry(&self, patient_id: &str, raw: &Value) -> PatientResult<Patient> {
        let entry = parse_entry(raw).inspect_err(|e| {
            tracing::warn!(patient_id, "rejected entry payload: {e}");
        })?;
        self.append_entry(patient_id, entry)
    }
}
