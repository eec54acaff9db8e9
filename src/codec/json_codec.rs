//! JSON Import/Export
//!
//! Lossless: the full project record, nested collections included.

use crate::domain::{ParseError, Project};

/// Pretty-printed array (2-space indent). No projects gives `[]`.
pub fn export_json(projects: &[Project]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(projects)
}

/// Parse a JSON export; errors carry the offending line
pub fn import_json(text: &str) -> Result<Vec<Project>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| ParseError::new(e.line(), e.to_string()))
}
