//! In-memory patient repository.
//!
//! The repository is the single owner of every [`Patient`] and, through them, of every
//! [`Entry`]. Callers only ever receive clones, so a returned record is a snapshot that later
//! mutations do not affect.
//!
//! ## Concurrency
//!
//! All operations take one repository-wide lock. `create` and `append_entry` perform their
//! lookup, identifier allocation and mutation inside that single region, which keeps patient
//! and entry identifiers unique and guarantees exactly the addressed patient is mutated.

use super::helpers::{allocate_unique_id, parse_json_with_path};
use crate::demographics::{NewPatient, Patient, PublicPatient};
use crate::entries::{Entry, NewEntry};
use crate::{PatientError, PatientResult};
use patientor_uuid::RecordId;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Demo patients compiled into the binary.
const BUNDLED_PATIENTS_JSON: &str = include_str!("../../data/patients.json");

#[derive(Debug, Default)]
pub struct PatientRepository {
    patients: Mutex<Vec<Patient>>,
}

impl PatientRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `patients`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::DuplicateId`] if two patients, or two entries anywhere in the
    /// data, share an identifier.
    pub fn with_patients(patients: Vec<Patient>) -> PatientResult<Self> {
        let mut patient_ids = HashSet::new();
        let mut entry_ids = HashSet::new();
        for patient in &patients {
            if !patient_ids.insert(patient.id) {
                return Err(PatientError::DuplicateId {
                    id: patient.id.to_string(),
                });
            }
            for entry in &patient.entries {
                if !entry_ids.insert(entry.id) {
                    return Err(PatientError::DuplicateId {
                        id: entry.id.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            patients: Mutex::new(patients),
        })
    }

    /// Creates a repository seeded with the bundled demo patients.
    pub fn bundled() -> PatientResult<Self> {
        Self::with_patients(parse_patients_json(BUNDLED_PATIENTS_JSON)?)
    }

    /// Creates a repository seeded from a JSON file holding an array of patients.
    pub fn from_file(path: &Path) -> PatientResult<Self> {
        let text = std::fs::read_to_string(path).map_err(PatientError::FileRead)?;
        Self::with_patients(parse_patients_json(&text)?)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Patient>> {
        // Every mutation is a single push, so a panic elsewhere cannot leave partial state.
        self.patients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Lists every patient, without `ssn` and entries, in insertion order.
    pub fn list_public(&self) -> Vec<PublicPatient> {
        self.lock().iter().map(PublicPatient::from).collect()
    }

    /// Returns the full record of the patient with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no patient has that identifier, including when
    /// `id` is not a well-formed identifier at all.
    pub fn get(&self, id: &str) -> PatientResult<Patient> {
        let patients = self.lock();
        find(&patients, id).cloned()
    }

    /// Stores a new patient under a freshly generated identifier and returns the stored record.
    pub fn create(&self, new: NewPatient) -> Patient {
        self.create_with(new, RecordId::new)
    }

    fn create_with(&self, new: NewPatient, id_source: impl FnMut() -> RecordId) -> Patient {
        let mut patients = self.lock();
        let id = allocate_unique_id(id_source, |candidate| {
            patients.iter().any(|p| p.id == *candidate)
        });
        let patient = Patient::register(id, new);
        patients.push(patient.clone());
        tracing::debug!(patient_id = %id, "patient created");
        patient
    }

    /// Appends `entry` to the patient with identifier `patient_id` under a freshly generated
    /// entry identifier, and returns the updated patient record.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if there is no such patient; the repository is left
    /// unchanged.
    pub fn append_entry(&self, patient_id: &str, entry: NewEntry) -> PatientResult<Patient> {
        self.append_entry_with(patient_id, entry, RecordId::new)
    }

    fn append_entry_with(
        &self,
        patient_id: &str,
        entry: NewEntry,
        id_source: impl FnMut() -> RecordId,
    ) -> PatientResult<Patient> {
        let mut patients = self.lock();
        let index = position(&patients, patient_id)?;
        let entry_id = allocate_unique_id(id_source, |candidate| {
            patients
                .iter()
                .flat_map(|p| p.entries.iter())
                .any(|e| e.id == *candidate)
        });

        let patient = &mut patients[index];
        patient.entries.push(Entry {
            id: entry_id,
            entry,
        });
        tracing::debug!(patient_id, entry_id = %entry_id, "entry appended");
        Ok(patient.clone())
    }
}

fn not_found(id: &str) -> PatientError {
    PatientError::NotFound { id: id.to_owned() }
}

fn position(patients: &[Patient], id: &str) -> PatientResult<usize> {
    let id_parsed = RecordId::parse(id).map_err(|_| not_found(id))?;
    patients
        .iter()
        .position(|p| p.id == id_parsed)
        .ok_or_else(|| not_found(id))
}

fn find<'a>(patients: &'a [Patient], id: &str) -> PatientResult<&'a Patient> {
    position(patients, id).map(|index| &patients[index])
}

/// Parses a JSON array of stored patients (with identifiers and entries).
pub fn parse_patients_json(json_text: &str) -> PatientResult<Vec<Patient>> {
    parse_json_with_path("patients", json_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demographics::parse_patient;
    use crate::entries::{parse_entry, EntryKind};
    use serde_json::json;

    fn new_patient() -> NewPatient {
        parse_patient(&json!({
            "name": "Martin Riggs",
            "dateOfBirth": "1979-01-30",
            "ssn": "300-17-9777",
            "gender": "male",
            "occupation": "Cop"
        }))
        .expect("fixture patient is valid")
    }

    fn health_check(description: &str) -> NewEntry {
        parse_entry(&json!({
            "type": "HealthCheck",
            "date": "2019-10-20",
            "description": description,
            "specialist": "MD House",
            "healthCheckRating": 1
        }))
        .expect("fixture entry is valid")
    }

    #[test]
    fn test_create_assigns_distinct_ids() {
        let repo = PatientRepository::new();

        let first = repo.create(new_patient());
        let second = repo.create(new_patient());

        assert_ne!(first.id, second.id);
        assert!(first.entries.is_empty());
        assert_eq!(repo.len(), 2);

        let listed = repo.list_public();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);

        let json = serde_json::to_value(&listed).unwrap();
        for item in json.as_array().unwrap() {
            assert!(item.get("ssn").is_none());
            assert!(item.get("entries").is_none());
        }
    }

    #[test]
    fn test_create_redraws_colliding_id() {
        let repo = PatientRepository::new();
        let existing = repo.create(new_patient());
        let fresh = RecordId::new();
        let mut draws = vec![fresh, existing.id];

        let created = repo.create_with(new_patient(), || draws.pop().unwrap());

        assert_eq!(created.id, fresh);
    }

    #[test]
    fn test_round_trip_parse_create_get() {
        let repo = PatientRepository::new();
        let new = new_patient();

        let created = repo.create(new.clone());
        let fetched = repo.get(&created.id.to_string()).unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, new.name);
        assert_eq!(fetched.date_of_birth, new.date_of_birth);
        assert_eq!(fetched.ssn, new.ssn);
        assert_eq!(fetched.gender, new.gender);
        assert_eq!(fetched.occupation, new.occupation);
        assert!(fetched.entries.is_empty());
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let repo = PatientRepository::new();
        repo.create(new_patient());

        let missing = RecordId::new().to_string();
        assert!(matches!(
            repo.get(&missing),
            Err(PatientError::NotFound { id }) if id == missing
        ));
        assert!(matches!(
            repo.get("not-an-id"),
            Err(PatientError::NotFound { .. })
        ));
    }

    #[test]
    fn test_append_entry_to_unknown_patient_leaves_repository_unchanged() {
        let repo = PatientRepository::new();
        let patient = repo.create(new_patient());
        repo.append_entry(&patient.id.to_string(), health_check("first"))
            .unwrap();

        let err = repo
            .append_entry(&RecordId::new().to_string(), health_check("stray"))
            .unwrap_err();

        assert!(matches!(err, PatientError::NotFound { .. }));
        assert_eq!(repo.len(), 1);
        let stored = repo.get(&patient.id.to_string()).unwrap();
        assert_eq!(stored.entries.len(), 1);
        assert_eq!(stored.entries[0].entry.base.description.as_str(), "first");
    }

    #[test]
    fn test_append_entry_preserves_order_and_assigns_ids() {
        let repo = PatientRepository::new();
        let patient = repo.create(new_patient());
        let id = patient.id.to_string();

        repo.append_entry(&id, health_check("first")).unwrap();
        let updated = repo.append_entry(&id, health_check("second")).unwrap();

        assert_eq!(updated.id, patient.id);
        assert_eq!(updated.entries.len(), 2);
        assert_eq!(updated.entries[0].entry.base.description.as_str(), "first");
        assert_eq!(updated.entries[1].entry.base.description.as_str(), "second");
        assert_ne!(updated.entries[0].id, updated.entries[1].id);
        assert_eq!(updated.entries[0].kind(), EntryKind::HealthCheck);
        assert_eq!(repo.get(&id).unwrap(), updated);
    }

    #[test]
    fn test_append_entry_only_touches_addressed_patient() {
        let repo = PatientRepository::new();
        let first = repo.create(new_patient());
        let second = repo.create(new_patient());

        repo.append_entry(&second.id.to_string(), health_check("only second"))
            .unwrap();

        assert!(repo.get(&first.id.to_string()).unwrap().entries.is_empty());
        assert_eq!(repo.get(&second.id.to_string()).unwrap().entries.len(), 1);
    }

    #[test]
    fn test_entry_id_collision_is_redrawn() {
        let repo = PatientRepository::new();
        let patient = repo.create(new_patient());
        let id = patient.id.to_string();
        let existing = repo.append_entry(&id, health_check("first")).unwrap().entries[0].id;
        let fresh = RecordId::new();
        let mut draws = vec![fresh, existing];

        let updated = repo
            .append_entry_with(&id, health_check("second"), || draws.pop().unwrap())
            .unwrap();

        assert_eq!(updated.entries[1].id, fresh);
    }

    #[test]
    fn test_with_patients_rejects_duplicate_ids() {
        let repo = PatientRepository::new();
        let patient = repo.create(new_patient());

        let err = PatientRepository::with_patients(vec![patient.clone(), patient]).unwrap_err();
        assert!(matches!(err, PatientError::DuplicateId { .. }));
    }

    #[test]
    fn test_bundled_patients_load() {
        let repo = PatientRepository::bundled().unwrap();
        assert!(!repo.is_empty());

        let riggs = repo.get("d2773598-f723-11e9-8f0b-362b9e155667").unwrap();
        assert_eq!(riggs.name.as_str(), "Martin Riggs");
        assert_eq!(riggs.entries[0].kind(), EntryKind::OccupationalHealthcare);
    }

    #[test]
    fn test_parse_patients_json_reports_path() {
        let err = parse_patients_json(
            r#"[{"id": "d2773598-f723-11e9-8f0b-362b9e155667", "name": "", "dateOfBirth": "1979-01-30",
                 "ssn": "123456789", "gender": "male", "occupation": "Cop"}]"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("[0].name"), "{err}");
    }

    #[test]
    fn test_from_file_reads_seed_data() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("patients.json");
        std::fs::write(&path, BUNDLED_PATIENTS_JSON).unwrap();

        let repo = PatientRepository::from_file(&path).unwrap();
        assert_eq!(repo.len(), PatientRepository::bundled().unwrap().len());
        assert!(matches!(
            PatientRepository::from_file(&dir.path().join("missing.json")),
            Err(PatientError::FileRead(_))
        ));
    }
}
