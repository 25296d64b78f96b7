//! Result Shaping - Boundary to the connection-resolution subsystem

use serde_json::Value as JsonValue;

use crate::error::LoaderResult;

use super::info::ResolutionInfo;

/// Turns a key's child rows into the field's resolved value.
///
/// Pagination and connection wrapping live behind this trait; the loading
/// core only guarantees the rows arrive in child-side sort order.
pub trait ResultShaper: Send + Sync {
    fn shape(&self, info: &ResolutionInfo, rows: Vec<JsonValue>) -> LoaderResult<JsonValue>;
}

/// Default shaping: the rows as a plain array
pub struct PassthroughShaper;

impl ResultShaper for PassthroughShaper {
    fn shape(&self, _info: &ResolutionInfo, rows: Vec<JsonValue>) -> LoaderResult<JsonValue> {
        Ok(JsonValue::Array(rows))
    }
}
