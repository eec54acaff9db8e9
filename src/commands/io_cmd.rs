//! Import / Export Commands

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::codec::{export_filename, export_projects, import_projects, ExportFormat};
use crate::domain::{DomainError, DomainResult, Project};
use crate::repository::Repository;
use crate::AppState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
}

/// Write every cached project to `<dir>/projects_export_<date>.<ext>`
pub async fn export_to_dir(
    state: &AppState,
    format: ExportFormat,
    dir: &Path,
    date: NaiveDate,
) -> DomainResult<PathBuf> {
    let text = {
        let store = state.store.lock().await;
        export_projects(&store.projects, format)?
    };

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| DomainError::Internal(format!("failed to create {}: {}", dir.display(), e)))?;
    let path = dir.join(export_filename(format, date));
    tokio::fs::write(&path, text)
        .await
        .map_err(|e| DomainError::Internal(format!("failed to write {}: {}", path.display(), e)))?;

    log::info!("Exported projects as {} to {}", format, path.display());
    Ok(path)
}

/// Parse a file and write its projects to the repository.
///
/// The whole file is parsed before anything is written, so a malformed row
/// leaves the repository untouched. Rows whose ID already exists update that
/// project; the rest are created. Writes are not transactional: if the
/// backend fails partway, the rows before it stay written and the error says
/// how many were applied.
pub async fn import_file(
    state: &AppState,
    path: &Path,
    format: Option<ExportFormat>,
    now: DateTime<Utc>,
) -> DomainResult<ImportSummary> {
    let format = format
        .or_else(|| ExportFormat::from_path(path))
        .ok_or_else(|| DomainError::Config(format!("cannot tell the format of {}", path.display())))?;
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::Internal(format!("failed to read {}: {}", path.display(), e)))?;

    let projects = import_projects(&text, format, now).map_err(|e| {
        log::warn!("Import of {} aborted: {}", path.display(), e);
        e
    })?;

    let mut summary = ImportSummary::default();
    for project in &projects {
        if let Err(e) = write_row(state, project, &mut summary).await {
            let applied = summary.created + summary.updated;
            log::warn!(
                "Import of {} stopped after {} of {} rows: {}",
                path.display(),
                applied,
                projects.len(),
                e
            );
            return Err(stopped_after(e, applied, projects.len()));
        }
    }
    log::info!(
        "Imported {} projects from {} ({} created, {} updated)",
        projects.len(),
        path.display(),
        summary.created,
        summary.updated
    );

    let refreshed = state.repo.list().await?;
    state.store.lock().await.replace_projects(refreshed);
    state.persist_snapshot().await?;
    Ok(summary)
}

async fn write_row(state: &AppState, project: &Project, summary: &mut ImportSummary) -> DomainResult<()> {
    let exists = !project.id.is_empty() && state.repo.find_by_id(project.id.clone()).await?.is_some();
    if exists {
        state.repo.update(project).await?;
        summary.updated += 1;
    } else {
        state.repo.create(project).await?;
        summary.created += 1;
    }
    Ok(())
}

fn stopped_after(error: DomainError, applied: usize, total: usize) -> DomainError {
    match error {
        DomainError::Network(msg) => {
            DomainError::Network(format!("{} (import stopped after {} of {} rows)", msg, applied, total))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::export_csv;
    use crate::config::AppConfig;
    use crate::domain::ProjectStatus;
    use crate::test_support::{memory_state, MockServer};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_export_writes_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(vec![Project::new("p1", "Tracker", now())]);
        crate::commands::refresh_projects(&state).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let path = export_to_dir(&state, ExportFormat::Json, dir.path(), date).await.unwrap();

        assert_eq!(path.file_name().unwrap(), "projects_export_2024-06-15.json");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"name\": \"Tracker\""));
    }

    #[tokio::test]
    async fn test_import_creates_and_updates() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(vec![Project::new("p1", "Old name", now())]);

        let mut existing = Project::new("p1", "New name", now());
        existing.status = ProjectStatus::Completed;
        let fresh = Project::new("", "Fresh", now());
        let path = dir.path().join("in.csv");
        std::fs::write(&path, export_csv(&[existing, fresh])).unwrap();

        let summary = import_file(&state, &path, None, now()).await.unwrap();
        assert_eq!(summary, ImportSummary { created: 1, updated: 1 });

        let store = state.store.lock().await;
        assert_eq!(store.projects.len(), 2);
        assert_eq!(store.find("p1").unwrap().name, "New name");
        assert_eq!(store.find("p1").unwrap().status, ProjectStatus::Completed);
    }

    #[tokio::test]
    async fn test_malformed_import_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(vec![]);
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "id,name,status\n,Good,Idea\n,Bad\n").unwrap();

        let result = import_file(&state, &path, None, now()).await;
        match result {
            Err(DomainError::Parse(e)) => assert_eq!(e.row, 3),
            other => panic!("expected parse error, got {:?}", other.map(|s| s.created)),
        }
        assert!(state.repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_extension_needs_format() {
        let dir = tempfile::tempdir().unwrap();
        let state = memory_state(vec![]);
        let path = dir.path().join("projects.txt");
        std::fs::write(&path, "[]").unwrap();

        assert!(matches!(
            import_file(&state, &path, None, now()).await,
            Err(DomainError::Config(_))
        ));
        let summary = import_file(&state, &path, Some(ExportFormat::Json), now()).await.unwrap();
        assert_eq!(summary, ImportSummary::default());
    }

    #[tokio::test]
    async fn test_backend_failure_reports_applied_rows() {
        let created = serde_json::to_string(&vec![Project::new("r1", "First", now())]).unwrap();
        let server = MockServer::start(vec![(201, created), (500, "boom".into())]).await;
        let config = AppConfig {
            backend_url: server.url.clone(),
            api_key: "anon-key".into(),
            ..Default::default()
        };
        let state = AppState::remote(config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        let rows = [Project::new("", "First", now()), Project::new("", "Second", now())];
        std::fs::write(&path, export_csv(&rows)).unwrap();

        match import_file(&state, &path, None, now()).await {
            Err(DomainError::Network(msg)) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("after 1 of 2 rows"));
            }
            other => panic!("expected network error, got {:?}", other.map(|s| s.created)),
        }
        assert_eq!(server.requests().len(), 2);
    }
}
