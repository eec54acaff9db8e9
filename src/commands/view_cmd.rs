//! Dashboard View Commands
//!
//! Read-only projections of the cached projects.

use chrono::{DateTime, Utc};

use crate::domain::{ProjectStats, TimelineItem, TimelineRange};
use crate::store::ViewMode;
use crate::AppState;

/// Timeline bars for the projects passing the current filter
pub async fn get_timeline(state: &AppState, now: DateTime<Utc>) -> (Vec<TimelineItem>, TimelineRange) {
    let mut store = state.store.lock().await;
    store.set_view_mode(ViewMode::Timeline);
    store.timeline(now)
}

pub async fn get_stats(state: &AppState) -> ProjectStats {
    state.store.lock().await.stats()
}

/// Tag suggestions for a (possibly `;`-separated) tag entry
pub async fn suggest_tags(state: &AppState, input: &str) -> Vec<String> {
    let index = state.store.lock().await.tag_index();
    index
        .suggest_for_input(input)
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::refresh_projects;
    use crate::domain::{Progress, Project, ProjectStatus};
    use crate::test_support::memory_state;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_timeline_switches_view_mode() {
        let mut project = Project::new("p1", "Tracker", at(2024, 1, 1));
        project.progress = Progress::new(80).unwrap();
        project.status = ProjectStatus::InProgress;
        let state = memory_state(vec![project]);
        refresh_projects(&state).await.unwrap();

        let (items, range) = get_timeline(&state, at(2024, 3, 1)).await;
        assert_eq!(items[0].end, at(2024, 1, 31));
        assert_eq!(range.start, at(2024, 1, 1) - Duration::days(7));
        assert_eq!(state.store.lock().await.view_mode, ViewMode::Timeline);
    }

    #[tokio::test]
    async fn test_empty_timeline_uses_default_window() {
        let state = memory_state(vec![]);
        let now = at(2024, 3, 1);
        let (items, range) = get_timeline(&state, now).await;
        assert!(items.is_empty());
        assert_eq!(range.start, now);
        assert_eq!(range.end, now + Duration::days(90));
    }

    #[tokio::test]
    async fn test_suggest_tags_for_segment() {
        let mut project = Project::new("p1", "Tracker", at(2024, 1, 1));
        project.tags = vec!["Reactor".into()];
        let state = memory_state(vec![project]);
        refresh_projects(&state).await.unwrap();

        let suggestions = suggest_tags(&state, "Rust; react").await;
        assert_eq!(suggestions, vec!["React", "React Native", "Reactor"]);
    }

    #[tokio::test]
    async fn test_stats() {
        let mut done = Project::new("p2", "Done", at(2024, 1, 1));
        done.status = ProjectStatus::Completed;
        let state = memory_state(vec![Project::new("p1", "Open", at(2024, 1, 1)), done]);
        refresh_projects(&state).await.unwrap();

        let stats = get_stats(&state).await;
        assert_eq!(stats.total, 2);
        assert!((stats.completion_rate - 0.5).abs() < f64::EPSILON);
    }
}
