//! AI Insight Commands

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};
use crate::insights::{InsightState, InsightsClient};
use crate::AppState;

/// Request insights for the visible projects.
///
/// The returned state always reflects the attempt: on failure it carries the
/// error message alongside whatever insights were there before.
pub async fn generate_insights(state: &AppState, now: DateTime<Utc>) -> DomainResult<InsightState> {
    let client = InsightsClient::new(&state.config)?;

    let projects: Vec<_> = {
        let mut store = state.store.lock().await;
        store.insights.begin();
        store.visible_projects().into_iter().cloned().collect()
    };

    // Lock released while the request is in flight
    let result = client.generate(&projects).await;

    let mut store = state.store.lock().await;
    store.insights.finish(result, now);
    Ok(store.insights.clone())
}

/// One-paragraph summary of a single project
pub async fn summarize_project(state: &AppState, id: &str) -> DomainResult<String> {
    let client = InsightsClient::new(&state.config)?;
    let project = state
        .store
        .lock()
        .await
        .find(id)
        .cloned()
        .ok_or_else(|| DomainError::NotFound(format!("Project {}", id)))?;
    client.summarize_project(&project).await
}
