use crate::domain::config::ManualConfiguration;
use crate::error::Result;
use std::io::Read;

/// Reads a terminal's configuration document from JSON.
///
/// Missing keys default to "not declared", so a partial or older document
/// still loads. Unrecognized keys are logged and ignored.
pub fn read_configuration<R: Read>(source: R) -> Result<ManualConfiguration> {
    Ok(serde_json::from_reader(source)?)
}
