//! Repository modules.
//!
//! This module contains the in-memory patient repository and the read-only diagnosis reference
//! list, plus the loaders that build them from JSON data.

pub mod diagnoses;
pub(crate) mod helpers;
pub mod patients;
