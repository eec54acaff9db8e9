//! CSV Import/Export
//!
//! Flat one-row-per-project format. Milestones, activity logs and AI tasks are
//! dropped on export and come back empty on import.
//!
//! Text cells are read back exactly as written. Tags share one cell joined
//! with `;`, so a tag that itself contains `;` comes back split.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use csv::{ReaderBuilder, StringRecord};

use crate::domain::{ParseError, Progress, Project, ProjectStatus, ProjectType, Usefulness};

/// Fixed export column order
pub const CSV_HEADERS: [&str; 15] = [
    "id",
    "name",
    "description",
    "type",
    "status",
    "usefulness",
    "isMonetized",
    "progress",
    "tags",
    "githubUrl",
    "websiteUrl",
    "nextAction",
    "lastUpdated",
    "createdAt",
    "category",
];

const TAG_SEPARATOR: &str = ";";

// ========================
// Export
// ========================

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Quote only when the value would otherwise break the row
fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quoted(value)
    } else {
        value.to_string()
    }
}

fn escape_opt(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_default()
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn project_row(project: &Project) -> Vec<String> {
    vec![
        escape(&project.id),
        escape(&project.name),
        escape_opt(&project.description),
        escape(project.project_type.as_str()),
        escape(project.status.as_str()),
        project.usefulness.to_string(),
        project.is_monetized.to_string(),
        project.progress.to_string(),
        quoted(&project.tags.join(TAG_SEPARATOR)),
        escape_opt(&project.github_url),
        escape_opt(&project.website_url),
        escape_opt(&project.next_action),
        format_timestamp(&project.last_updated),
        format_timestamp(&project.created_at),
        escape_opt(&project.category),
    ]
}

/// Header row plus one row per project, `\n` separated, no trailing newline
pub fn export_csv(projects: &[Project]) -> String {
    let mut lines = Vec::with_capacity(projects.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for project in projects {
        lines.push(project_row(project).join(","));
    }
    lines.join("\n")
}

// ========================
// Import
// ========================

/// Column positions resolved from the header row
struct Columns {
    positions: HashMap<&'static str, usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut positions = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let header = header.trim();
            if let Some(known) = CSV_HEADERS.iter().find(|h| h.eq_ignore_ascii_case(header)) {
                positions.entry(*known).or_insert(idx);
            }
        }
        Self { positions }
    }

    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|idx| record.get(*idx))
            .unwrap_or("")
    }

    /// Free text, read verbatim; an empty cell is `None`
    fn text(&self, record: &StringRecord, column: &str) -> Option<String> {
        let value = self.get(record, column);
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Cell of a typed column with surrounding whitespace removed
    fn scalar<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        let value = self.get(record, column).trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{}'", value))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "0" => Ok(false),
        "true" | "yes" | "1" => Ok(true),
        other => Err(format!("invalid boolean '{}'", other)),
    }
}

fn parse_int(value: &str, column: &str) -> Result<Option<i64>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| format!("invalid {} '{}'", column, value))
}

/// Split on `;` keeping each tag as written. An empty cell is no tags.
fn parse_tags(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(TAG_SEPARATOR).map(String::from).collect()
}

fn parse_row(columns: &Columns, record: &StringRecord, now: DateTime<Utc>) -> Result<Project, String> {
    let mut project = Project::new(columns.get(record, "id"), columns.get(record, "name"), now);
    project.description = columns.text(record, "description");

    if let Some(project_type) = columns.scalar(record, "type") {
        project.project_type = project_type.parse::<ProjectType>()?;
    }
    if let Some(status) = columns.scalar(record, "status") {
        project.status = status.parse::<ProjectStatus>()?;
    }
    if let Some(usefulness) = parse_int(columns.get(record, "usefulness"), "usefulness")? {
        project.usefulness = Usefulness::new(usefulness)?;
    }
    if let Some(progress) = parse_int(columns.get(record, "progress"), "progress")? {
        project.progress = Progress::new(progress)?;
    }
    project.is_monetized = parse_bool(columns.get(record, "isMonetized"))?;
    project.tags = parse_tags(columns.get(record, "tags"));
    project.github_url = columns.text(record, "githubUrl");
    project.website_url = columns.text(record, "websiteUrl");
    project.next_action = columns.text(record, "nextAction");
    project.category = columns.text(record, "category");

    if let Some(created) = columns.scalar(record, "createdAt") {
        project.created_at = parse_timestamp(created)?;
    }
    project.last_updated = match columns.scalar(record, "lastUpdated") {
        Some(updated) => parse_timestamp(updated)?,
        None => project.created_at,
    };

    Ok(project)
}

/// Parse exported CSV back into projects.
///
/// All-or-nothing: the first bad row aborts the import. Rows are reported by
/// their 1-based line number, the header being line 1. An empty `name` cell
/// is an empty name; only a missing `name` column is an error.
pub fn import_csv(text: &str, now: DateTime<Utc>) -> Result<Vec<Project>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ParseError::new(1, e.to_string()))?
        .clone();
    let columns = Columns::from_headers(&headers);
    if !columns.positions.contains_key("name") {
        return Err(ParseError::new(1, "missing required column 'name'"));
    }

    let mut projects = Vec::new();
    for (index, result) in reader.records().enumerate() {
        // Fallback when the reader has no position: header + data index
        let fallback_row = index + 2;
        let record = result.map_err(|e| {
            let row = e.position().map(|p| p.line() as usize).unwrap_or(fallback_row);
            ParseError::new(row, e.to_string())
        })?;
        let row = record.position().map(|p| p.line() as usize).unwrap_or(fallback_row);

        if record.len() == 1 && record.get(0).is_some_and(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() != headers.len() {
            return Err(ParseError::new(
                row,
                format!("expected {} fields, found {}", headers.len(), record.len()),
            ));
        }

        let project = parse_row(&columns, &record, now).map_err(|msg| ParseError::new(row, msg))?;
        projects.push(project);
    }

    log::debug!("Parsed {} projects from CSV", projects.len());
    Ok(projects)
}
