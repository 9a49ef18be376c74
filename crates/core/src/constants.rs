//! Constants used throughout the Patientor core crate.
//!
//! Environment variable names are resolved once, at process start-up, by the binaries; the core
//! never reads the environment itself.

/// Default listen address of the REST API.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3001";

/// Environment variable holding the REST API listen address.
pub const REST_ADDR_ENV: &str = "PATIENTOR_REST_ADDR";

/// Environment variable pointing at a diagnoses JSON file replacing the bundled list.
pub const DIAGNOSES_FILE_ENV: &str = "PATIENTOR_DIAGNOSES_FILE";

/// Environment variable pointing at a patients JSON file replacing the bundled demo patients.
pub const PATIENTS_FILE_ENV: &str = "PATIENTOR_PATIENTS_FILE";

/// Environment variable switching demo patient seeding on or off.
pub const SEED_PATIENTS_ENV: &str = "PATIENTOR_SEED_PATIENTS";

/// Whether the repository starts with the demo patients when nothing is configured.
pub const DEFAULT_SEED_PATIENTS: bool = true;
