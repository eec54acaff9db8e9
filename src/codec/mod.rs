//! Import/Export Codec
//!
//! CSV and JSON text for the export download and the import dialog.

mod csv_codec;
mod json_codec;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{DomainResult, Project};

pub use csv_codec::{export_csv, import_csv, CSV_HEADERS};
pub use json_codec::{export_json, import_json};

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Guess from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported format '{}'", other)),
        }
    }
}

/// `projects_export_<YYYY-MM-DD>.<ext>`
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!("projects_export_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

pub fn export_projects(projects: &[Project], format: ExportFormat) -> DomainResult<String> {
    match format {
        ExportFormat::Csv => Ok(export_csv(projects)),
        ExportFormat::Json => Ok(export_json(projects)?),
    }
}

/// Parse import text; `now` stamps rows without timestamps
pub fn import_projects(text: &str, format: ExportFormat, now: DateTime<Utc>) -> DomainResult<Vec<Project>> {
    let projects = match format {
        ExportFormat::Csv => import_csv(text, now)?,
        ExportFormat::Json => import_json(text)?,
    };
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::path::PathBuf;

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        assert_eq!(export_filename(ExportFormat::Csv, date), "projects_export_2024-07-09.csv");
        assert_eq!(export_filename(ExportFormat::Json, date), "projects_export_2024-07-09.json");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(&PathBuf::from("a/b.CSV")), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path(&PathBuf::from("b.json")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(&PathBuf::from("b.txt")), None);
    }

    #[test]
    fn test_empty_exports() {
        assert_eq!(export_projects(&[], ExportFormat::Json).unwrap(), "[]");
        assert_eq!(export_projects(&[], ExportFormat::Csv).unwrap(), CSV_HEADERS.join(","));
    }

    #[test]
    fn test_import_error_is_parse_error() {
        let err = import_projects("name,status\na,b,c", ExportFormat::Csv, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Parse(ref e) if e.row == 2));
    }
}
