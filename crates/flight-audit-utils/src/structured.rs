//! JSON input. Values come back as [`serde_json::Value`] with no schema applied.

use crate::errors::UtilsResult;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

/// Read and parse a whole JSON file
pub fn read_structured<P: AsRef<Path>>(path: P) -> UtilsResult<Value> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Read `reader` to the end and parse its content as JSON.
///
/// The stream is fully buffered first so that read failures surface as I/O
/// errors rather than as JSON syntax errors.
pub fn read_structured_from_reader<R: io::Read>(mut reader: R) -> UtilsResult<Value> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(serde_json::from_slice(&bytes)?)
}
