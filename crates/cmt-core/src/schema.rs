//! Descriptive JSON Schema for the interchange file.
//!
//! The schema is generated from the entity types and written next to the
//! data (YAML-encoded) so editors can offer completion. Nothing in commenter
//! validates against it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::entities::CommentSheet;
use crate::errors::CoreError;
use crate::interchange::SCHEMA_FILE_NAME;

/// JSON Schema of [`CommentSheet`] as a JSON value.
///
/// # Errors
///
/// Returns [`CoreError::Json`] if the generated schema cannot be converted.
pub fn sheet_schema() -> Result<serde_json::Value, CoreError> {
    let schema = schemars::schema_for!(CommentSheet);
    Ok(serde_json::to_value(&schema)?)
}

/// Write the schema into `dir` as YAML, creating the directory if needed.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns [`CoreError`] on I/O or serialization failure.
pub fn write_schema(dir: &Path) -> Result<PathBuf, CoreError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(SCHEMA_FILE_NAME);
    let schema = sheet_schema()?;
    fs::write(&path, serde_yaml::to_string(&schema)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_sheet_properties() {
        let schema = sheet_schema().unwrap();
        let properties = schema["properties"].as_object().expect("properties");
        for key in ["version", "date", "document", "project", "stage", "comments"] {
            assert!(properties.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn write_schema_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_schema(&dir.path().join("schema")).unwrap();
        assert!(path.ends_with(SCHEMA_FILE_NAME));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("comments"));
    }
}
