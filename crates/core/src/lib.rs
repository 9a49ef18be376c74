//! # Patientor Core
//!
//! Core business logic for the Patientor patient record system.
//!
//! This crate contains pure data operations:
//! - Validation of untrusted JSON payloads into typed patients and clinical entries
//! - The in-memory patient repository (creation, lookup, entry appends, public listing)
//! - The read-only diagnosis reference list
//!
//! **No API concerns**: HTTP servers, routing and status-code mapping belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod demographics;
pub mod entries;
pub mod error;
pub mod patient;
pub mod repositories;
pub mod validation;

pub use config::CoreConfig;
pub use demographics::{parse_patient, NewPatient, Patient, PublicPatient};
pub use entries::{
    parse_entry, Discharge, Entry, EntryBase, EntryDetails, EntryKind, NewEntry, SickLeave,
};
pub use error::{PatientError, PatientResult, ValidationError};
pub use patient::PatientService;
pub use repositories::diagnoses::{Diagnosis, DiagnosisReference};
pub use repositories::patients::PatientRepository;

pub use patientor_types::{DateText, Gender, HealthCheckRating, NonEmptyText, Ssn, TextError};
pub use patientor_uuid::RecordId;
