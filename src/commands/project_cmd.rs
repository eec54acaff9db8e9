//! Project CRUD Commands
//!
//! Every mutation goes through the repository first and is mirrored into
//! the dashboard store only once the backend accepted it.

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult, Project, ProjectDraft, ProjectFilter};
use crate::repository::{ProjectQuery, Repository};
use crate::AppState;

/// Reload the project cache from the repository
pub async fn refresh_projects(state: &AppState) -> DomainResult<usize> {
    let projects = state.repo.list().await?;
    let count = projects.len();
    state.store.lock().await.replace_projects(projects);
    log::info!("Loaded {} projects", count);
    Ok(count)
}

/// Projects matching `filter`, fetched from the repository.
///
/// The filter also becomes the dashboard's active filter.
pub async fn list_projects(state: &AppState, filter: ProjectFilter) -> DomainResult<Vec<Project>> {
    let projects = state.repo.query(&filter).await?;
    state.store.lock().await.set_filter(filter);
    Ok(projects)
}

/// Validate a form draft and create the project
pub async fn create_project(
    state: &AppState,
    draft: &ProjectDraft,
    now: DateTime<Utc>,
) -> DomainResult<Project> {
    // Backend assigns the ID
    let project = draft.into_project("", now)?;
    let created = state.repo.create(&project).await?;
    log::info!("Created project {} ({})", created.name, created.id);

    state.store.lock().await.upsert(created.clone());
    state.persist_snapshot().await?;
    Ok(created)
}

/// Validate a form draft and apply it to an existing project
pub async fn update_project(
    state: &AppState,
    id: &str,
    draft: &ProjectDraft,
    now: DateTime<Utc>,
) -> DomainResult<Project> {
    let mut project = state
        .repo
        .find_by_id(id.to_string())
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Project {}", id)))?;
    draft.apply_to(&mut project, now)?;

    let updated = state.repo.update(&project).await?;
    state.store.lock().await.upsert(updated.clone());
    state.persist_snapshot().await?;
    Ok(updated)
}

pub async fn delete_project(state: &AppState, id: &str) -> DomainResult<()> {
    state.repo.delete(id.to_string()).await?;
    state.store.lock().await.remove(id);
    state.persist_snapshot().await?;
    log::info!("Deleted project {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectStatus;
    use crate::test_support::memory_state;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn draft(name: &str) -> ProjectDraft {
        ProjectDraft {
            name: name.to_string(),
            usefulness: 3,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = memory_state(vec![]);
        let created = create_project(&state, &draft("CLI Tool"), now()).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.activity_logs.len(), 1);

        let listed = list_projects(&state, ProjectFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "CLI Tool");

        let none = list_projects(&state, ProjectFilter::new().with_search("zzz")).await.unwrap();
        assert!(none.is_empty());
        assert_eq!(state.store.lock().await.visible_projects().len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_draft_writes_nothing() {
        let state = memory_state(vec![]);
        let result = create_project(&state, &draft("   "), now()).await;

        match result {
            Err(DomainError::Validation(errors)) => assert!(errors.message_for("name").is_some()),
            Err(other) => panic!("expected validation error, got {}", other),
            Ok(project) => panic!("unexpectedly created {}", project.id),
        }
        assert!(state.repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_logs_status_change() {
        let state = memory_state(vec![Project::new("p1", "Tracker", now())]);
        refresh_projects(&state).await.unwrap();

        let mut edit = ProjectDraft::from_project(&state.store.lock().await.projects[0]);
        edit.status = ProjectStatus::Completed;
        let updated = update_project(&state, "p1", &edit, now()).await.unwrap();

        assert_eq!(updated.status, ProjectStatus::Completed);
        assert!(updated.activity_logs.iter().any(|l| l.action.contains("Status changed")));
        assert_eq!(state.store.lock().await.projects[0].status, ProjectStatus::Completed);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let state = memory_state(vec![]);
        let result = update_project(&state, "nope", &draft("X"), now()).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let state = memory_state(vec![Project::new("p1", "Tracker", now())]);
        refresh_projects(&state).await.unwrap();

        delete_project(&state, "p1").await.unwrap();
        assert!(state.store.lock().await.projects.is_empty());
        assert!(delete_project(&state, "p1").await.is_err());
    }

    #[tokio::test]
    async fn test_edit_status_of_imported_project_with_foreign_repo_url() {
        let mut imported = Project::new("p1", "Mirror", now());
        imported.github_url = Some("https://gitlab.com/team/mirror".into());
        let state = memory_state(vec![imported]);
        refresh_projects(&state).await.unwrap();

        let changes = crate::cli::EditArgs {
            status: Some("planning".into()),
            ..Default::default()
        };
        let stored = state.store.lock().await.find("p1").cloned().unwrap();
        let edit = changes.to_draft(&stored).unwrap();
        let updated = update_project(&state, "p1", &edit, now()).await.unwrap();

        assert_eq!(updated.status, ProjectStatus::Planning);
        assert_eq!(updated.github_url.as_deref(), Some("https://gitlab.com/team/mirror"));
    }
}
