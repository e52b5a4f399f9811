//! Per-project metadata and its tolerant decoding.
//!
//! Every project folder may carry a `metadata.json`:
//!
//! ```json
//! { "title": "Casa XD", "area": 120, "blurb": "Vivienda", "text": "..." }
//! ```
//!
//! All fields are optional and the whole file is optional. Metadata is
//! hand-edited, so decoding never fails: a missing file, a file that is not
//! JSON, a JSON value that is not an object, or a field of the wrong type all
//! degrade to "no value" for the affected part. The outcome is modelled as a
//! [`MetadataLookup`] so callers can log what happened while still falling
//! back to defaults with [`MetadataLookup::into_metadata`].
//!
//! ## Resolution
//!
//! Each field resolves independently against its default:
//!
//! - **title**: metadata title → humanized folder name
//! - **area**: metadata number → `null`
//! - **blurb**, **text**: metadata string → `""`

use crate::fetch::FetchError;
use crate::types::METADATA_FILE;
use serde_json::{Number, Value};
use std::path::Path;

/// Decoded metadata. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectMetadata {
    pub title: Option<String>,
    pub area: Option<Number>,
    pub blurb: Option<String>,
    pub text: Option<String>,
}

impl ProjectMetadata {
    /// Decode field by field. Wrong types and empty strings become `None`;
    /// a non-object value decodes to empty metadata.
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: string_field(value, "title"),
            area: number_field(value, "area"),
            blurb: string_field(value, "blurb"),
            text: string_field(value, "text"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of looking up a metadata document.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataLookup {
    /// Document exists and is a JSON object.
    Present(ProjectMetadata),
    /// Document does not exist.
    Absent,
    /// Document exists but could not be read or is not a JSON object.
    /// Treated as absent.
    Invalid(String),
}

impl MetadataLookup {
    /// Classify an already-parsed JSON document.
    pub fn from_json(value: &Value) -> Self {
        if value.is_object() {
            MetadataLookup::Present(ProjectMetadata::from_value(value))
        } else {
            MetadataLookup::Invalid(format!("expected a JSON object, got {}", kind(value)))
        }
    }

    /// Classify the result of fetching a metadata document.
    pub fn from_fetch(result: Result<Value, FetchError>) -> Self {
        match result {
            Ok(value) => Self::from_json(&value),
            Err(e) if e.is_missing() => MetadataLookup::Absent,
            Err(e) => MetadataLookup::Invalid(e.to_string()),
        }
    }

    /// The decoded metadata, or empty metadata when absent or invalid.
    pub fn into_metadata(self) -> ProjectMetadata {
        match self {
            MetadataLookup::Present(meta) => meta,
            MetadataLookup::Absent | MetadataLookup::Invalid(_) => ProjectMetadata::default(),
        }
    }
}

/// Read `metadata.json` from a project folder on disk.
pub fn read_metadata(folder: &Path) -> MetadataLookup {
    let path = folder.join(METADATA_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return MetadataLookup::Absent,
        Err(e) => return MetadataLookup::Invalid(e.to_string()),
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(value) => MetadataLookup::from_json(&value),
        Err(e) => MetadataLookup::Invalid(e.to_string()),
    }
}

/// Resolve a field from several sources in priority order.
///
/// Returns the first non-None, non-empty value, trimmed.
///
/// ```text
/// title: resolve(&[metadata_title, humanized_folder])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Non-empty string field of a JSON object.
pub fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Numeric field of a JSON object.
pub fn number_field(value: &Value, key: &str) -> Option<Number> {
    match value.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
