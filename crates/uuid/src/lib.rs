//! Record identifiers.
//!
//! Patients and entries are identified by random (version 4) UUIDs. Identifiers are generated by
//! the repository, never by callers, and there is no shared counter: uniqueness rests on the
//! 122 random bits of each UUID (the repository additionally re-draws on the astronomically
//! unlikely event of a collision).
//!
//! ## Canonical form
//! - Length: 36
//! - Lowercase hexadecimal in the hyphenated `8-4-4-4-12` grouping
//! - Example: `d2773336-f723-11e9-8f0b-362b9e155667`
//!
//! Any UUID version is accepted when parsing, so identifiers minted elsewhere (for example the
//! time-based identifiers of the bundled demo patients) remain addressable.

mod service;

pub use service::{RecordId, Uuid};

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
