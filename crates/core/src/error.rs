/// Rejection of an untrusted request payload.
///
/// Produced by the field validators and by the patient and entry parsers. Parsing is fail-fast,
/// so a value of this type always describes the first offending field in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Incorrect or missing {field}: field is missing")]
    Missing { field: &'static str },
    #[error("Incorrect or missing {field}: {reason}")]
    Malformed { field: &'static str, reason: String },
    #[error("Incorrect or missing type: {received}")]
    UnknownEntryType { received: String },
    #[error("request body must be a JSON object")]
    NotAnObject,
}

impl ValidationError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the JSON field that was rejected, if the error concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing { field } | Self::Malformed { field, .. } => Some(field),
            Self::UnknownEntryType { .. } => Some("type"),
            Self::NotAnObject => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Patient not found: {id}")]
    NotFound { id: String },
    #[error("duplicate identifier in patient data: {id}")]
    DuplicateId { id: String },
    #[error("invalid reference data: {0}")]
    ReferenceData(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read data file: {0}")]
    FileRead(std::io::Error),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
