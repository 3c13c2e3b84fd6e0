//! Annotation file decoding.
//!
//! The outer parse is strict: invalid UTF-8, malformed JSON, or a top-level
//! value that is not an array fails the whole file. Individual records are
//! decoded one at a time and a record that does not fit the schema is
//! skipped with a warning.

use std::str::{self, Utf8Error};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Closed severity set used by annotation producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationSeverity {
    Error,
    Warning,
    Info,
    Hint,
}

/// One record of external tool output. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    pub source: String,
    pub severity: AnnotationSeverity,
    /// Target file, absolute or relative to the workspace root.
    pub file: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub message: String,
    #[serde(default)]
    pub replacements: Vec<String>,
    #[serde(default)]
    pub reference_code: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("annotation file is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
    #[error("annotation file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("annotation file must contain a JSON array")]
    NotAnArray,
}

/// Decode the contents of an annotation file.
///
/// Empty or whitespace-only content and a literal `null` yield no records.
pub fn parse_annotations(bytes: &[u8]) -> Result<Vec<AnnotationRecord>, ParseError> {
    let text = str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let items = match serde_json::from_str::<Value>(text)? {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        _ => return Err(ParseError::NotAnArray),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<AnnotationRecord>(item) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(index, "Skipping malformed annotation record: {err}"),
        }
    }
    Ok(records)
}

/// Group records by their `file` field.
///
/// Groups appear in first-seen order; records keep arrival order within a group.
#[must_use]
pub fn group_by_file(records: Vec<AnnotationRecord>) -> IndexMap<String, Vec<AnnotationRecord>> {
    let mut groups: IndexMap<String, Vec<AnnotationRecord>> = IndexMap::new();
    for record in records {
        groups.entry(record.file.clone()).or_default().push(record);
    }
    groups
}
