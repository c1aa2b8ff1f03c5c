//! JSON output for sheets and records.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Row, Sheet};

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(value),
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
    };
    json.map_err(|e| Error::Serialize(format!("JSON serialization error: {}", e)))
}

/// Convert a sheet to JSON.
pub fn to_json(sheet: &Sheet, format: JsonFormat) -> Result<String> {
    serialize(sheet, format)
}

/// Convert a sheet to JSON with default formatting.
pub fn to_json_default(sheet: &Sheet) -> Result<String> {
    to_json(sheet, JsonFormat::Pretty)
}

/// Convert a slice of records to a JSON array of objects.
pub fn rows_to_json(rows: &[Row], format: JsonFormat) -> Result<String> {
    serialize(rows, format)
}
