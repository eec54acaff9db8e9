//! Timeline Derivation
//!
//! Turns projects into bars for the timeline view. Nothing here is persisted;
//! items are recomputed whenever the project list changes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::project::{Project, ProjectStatus};

/// Padding never drops below a week
const MIN_PADDING_DAYS: i64 = 7;
/// Window shown when there is nothing to plot
const EMPTY_WINDOW_DAYS: i64 = 90;

/// One bar on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub id: String,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub color: String,
    pub status: ProjectStatus,
    pub progress: u8,
}

/// Visible date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimelineRange {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Estimated total duration from current progress
pub fn estimated_duration_days(progress: u8) -> i64 {
    match progress {
        75.. => 30,
        50.. => 45,
        25.. => 60,
        _ => 90,
    }
}

/// Derive the timeline bar for one project
pub fn timeline_item(project: &Project) -> TimelineItem {
    let start = project.created_at;
    let end = if project.is_completed() {
        project.last_updated
    } else {
        start + Duration::days(estimated_duration_days(project.progress.get()))
    };

    TimelineItem {
        id: project.id.clone(),
        name: project.name.clone(),
        start,
        end,
        color: project.status.color().to_string(),
        status: project.status,
        progress: project.progress.get(),
    }
}

pub fn derive_timeline<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Vec<TimelineItem> {
    projects.into_iter().map(timeline_item).collect()
}

/// Window covering every item plus padding on both sides
pub fn timeline_range(items: &[TimelineItem], now: DateTime<Utc>) -> TimelineRange {
    let min_start = items.iter().map(|i| i.start.min(i.end)).min();
    let max_end = items.iter().map(|i| i.end.max(i.start)).max();

    let (Some(min_start), Some(max_end)) = (min_start, max_end) else {
        return TimelineRange {
            start: now,
            end: now + Duration::days(EMPTY_WINDOW_DAYS),
        };
    };

    let span_days = (max_end - min_start).num_days();
    let padding_days = MIN_PADDING_DAYS.max((span_days as f64 * 0.1).ceil() as i64);
    let padding = Duration::days(padding_days);

    TimelineRange {
        start: min_start - padding,
        end: max_end + padding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::Progress;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn make_project(progress: i64, status: ProjectStatus) -> Project {
        let mut project = Project::new("p1", "Tracker", ts(2024, 1, 1));
        project.progress = Progress::new(progress).unwrap();
        project.status = status;
        project.last_updated = ts(2024, 3, 15);
        project
    }

    #[test]
    fn test_duration_steps() {
        assert_eq!(estimated_duration_days(100), 30);
        assert_eq!(estimated_duration_days(75), 30);
        assert_eq!(estimated_duration_days(74), 45);
        assert_eq!(estimated_duration_days(50), 45);
        assert_eq!(estimated_duration_days(25), 60);
        assert_eq!(estimated_duration_days(24), 90);
        assert_eq!(estimated_duration_days(0), 90);
    }

    #[test]
    fn test_in_progress_end_is_estimated() {
        let item = timeline_item(&make_project(80, ProjectStatus::InProgress));
        assert_eq!(item.start, ts(2024, 1, 1));
        assert_eq!(item.end, ts(2024, 1, 31));
        assert_eq!(item.color, ProjectStatus::InProgress.color());
    }

    #[test]
    fn test_completed_end_is_last_updated() {
        for progress in [0, 30, 100] {
            let item = timeline_item(&make_project(progress, ProjectStatus::Completed));
            assert_eq!(item.end, ts(2024, 3, 15));
        }
    }

    #[test]
    fn test_range_empty_defaults_to_ninety_days() {
        let now = ts(2024, 6, 1);
        let range = timeline_range(&[], now);
        assert_eq!(range.start, now);
        assert_eq!(range.end, ts(2024, 8, 30));
    }

    #[test]
    fn test_range_uses_minimum_padding() {
        // 30-day span: 10% is 3 days, so the 7-day floor applies
        let items = vec![timeline_item(&make_project(80, ProjectStatus::InProgress))];
        let range = timeline_range(&items, ts(2030, 1, 1));
        assert_eq!(range.start, ts(2023, 12, 25));
        assert_eq!(range.end, ts(2024, 2, 7));
    }

    #[test]
    fn test_range_uses_ten_percent_for_long_spans() {
        let mut late = make_project(0, ProjectStatus::Idea);
        late.created_at = ts(2024, 12, 1);
        let items = derive_timeline(&[make_project(80, ProjectStatus::InProgress), late]);

        // Jan 1 .. Mar 1 2025 (90 days after Dec 1) is 425 days; 10% rounds up to 43
        let range = timeline_range(&items, ts(2030, 1, 1));
        assert_eq!(range.start, ts(2024, 1, 1) - Duration::days(43));
        assert_eq!(range.end, ts(2025, 3, 1) + Duration::days(43));
    }
}
