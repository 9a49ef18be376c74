//! Repository-related utilities.

use crate::{PatientError, PatientResult};
use patientor_uuid::RecordId;
use serde::de::DeserializeOwned;

/// Draws identifiers from `id_source` until one is not `taken`.
///
/// With random 128-bit identifiers the first draw practically always succeeds; the loop only
/// guarantees the returned identifier is unused even in the pathological case.
pub(crate) fn allocate_unique_id(
    mut id_source: impl FnMut() -> RecordId,
    taken: impl Fn(&RecordId) -> bool,
) -> RecordId {
    loop {
        let id = id_source();
        if !taken(&id) {
            return id;
        }
        tracing::warn!("identifier collision on {id}, drawing again");
    }
}

/// Parses a JSON document, reporting the path to the failing element (e.g. `[2].entries[0].date`).
pub(crate) fn parse_json_with_path<T: DeserializeOwned>(
    what: &str,
    json_text: &str,
) -> PatientResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>"
        } else {
            path.as_str()
        };
        PatientError::ReferenceData(format!("{what} schema mismatch at {path}: {source}"))
    })
}
