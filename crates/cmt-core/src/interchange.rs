//! YAML interchange file: the system of record for a comment sheet.
//!
//! Reading goes through an explicit normalization pass before typed
//! decoding, so files written by other tools (symbol-style `:id:` keys,
//! `camelCase`, `kebab-case`, or `Title Case` keys) load into the same
//! canonical field set. Writing always emits snake_case keys, preceded by a
//! `yaml-language-server` header pointing at the descriptive schema.
//!
//! Every write is a full-file overwrite.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::entities::{Comment, CommentSheet};
use crate::errors::CoreError;

/// File name of the descriptive schema for this format version.
pub const SCHEMA_FILE_NAME: &str = "iso_comment_2012-03.yaml";

/// Schema reference written into interchange headers by default.
pub const DEFAULT_SCHEMA_REF: &str = "schema/iso_comment_2012-03.yaml";

/// Decode a sheet from YAML text.
///
/// A top-level mapping is a full sheet; a top-level sequence is taken as the
/// comment list of a sheet with default metadata; an empty document is an
/// empty sheet.
///
/// # Errors
///
/// Returns [`CoreError::Yaml`] for malformed YAML or mistyped fields and
/// [`CoreError::Validation`] for a scalar top level.
pub fn from_yaml_str(text: &str) -> Result<CommentSheet, CoreError> {
    let raw: Value = serde_yaml::from_str(text)?;
    match normalize_keys(raw) {
        Value::Null => Ok(CommentSheet::default()),
        Value::Sequence(items) => {
            let comments: Vec<Comment> = serde_yaml::from_value(Value::Sequence(items))?;
            Ok(CommentSheet::new(comments))
        }
        mapping @ Value::Mapping(_) => Ok(serde_yaml::from_value(mapping)?),
        other => Err(CoreError::Validation(format!(
            "expected a mapping or a list of comments at top level, found {}",
            value_kind(&other)
        ))),
    }
}

/// Encode a sheet as YAML, optionally preceded by a schema header.
///
/// # Errors
///
/// Returns [`CoreError::Yaml`] if serialization fails.
pub fn to_yaml_string(sheet: &CommentSheet, schema_ref: Option<&str>) -> Result<String, CoreError> {
    let body = serde_yaml::to_string(sheet)?;
    Ok(match schema_ref {
        Some(schema) => format!("{}{body}", schema_header(schema)),
        None => body,
    })
}

/// Header line linking an interchange file to its schema.
#[must_use]
pub fn schema_header(schema_ref: &str) -> String {
    format!("# yaml-language-server: $schema={schema_ref}\n\n")
}

/// Read and decode an interchange file.
///
/// # Errors
///
/// Returns [`CoreError::FileNotFound`] when `path` does not exist, otherwise
/// any I/O or decoding error.
pub fn read_sheet(path: &Path) -> Result<CommentSheet, CoreError> {
    if !path.exists() {
        return Err(CoreError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)?;
    from_yaml_str(&text)
}

/// Overwrite `path` with the full sheet.
///
/// # Errors
///
/// Returns [`CoreError`] on serialization or I/O failure.
pub fn write_sheet(
    path: &Path,
    sheet: &CommentSheet,
    schema_ref: Option<&str>,
) -> Result<(), CoreError> {
    let yaml = to_yaml_string(sheet, schema_ref)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, yaml)?;
    tracing::debug!(path = %path.display(), comments = sheet.comments.len(), "wrote comment sheet");
    Ok(())
}

/// Recursively rewrite mapping keys into canonical snake_case.
#[must_use]
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => {
            let mut normalized = Mapping::with_capacity(mapping.len());
            for (key, inner) in mapping {
                let key = match key {
                    Value::String(name) => Value::String(normalize_key(&name)),
                    other => other,
                };
                normalized.insert(key, normalize_keys(inner));
            }
            Value::Mapping(normalized)
        }
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Canonical form of one key: `:ProposedChange` → `proposed_change`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    let key = key.trim().trim_start_matches(':');
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;

    for c in key.chars() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    out.trim_end_matches('_').to_string()
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
