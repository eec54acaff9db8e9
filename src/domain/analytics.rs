//! Dashboard Analytics
//!
//! Aggregate counts and averages shown on the stats panel.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::project::{Project, ProjectStatus, ProjectType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: usize,
    pub by_status: BTreeMap<ProjectStatus, usize>,
    pub by_type: BTreeMap<ProjectType, usize>,
    pub monetized: usize,
    pub average_progress: f64,
    pub average_usefulness: f64,
    /// Completed share of all projects, 0.0 when empty
    pub completion_rate: f64,
    pub top_tags: Vec<TagCount>,
}

impl ProjectStats {
    pub fn from_projects<'a>(projects: impl IntoIterator<Item = &'a Project>, top_tags: usize) -> Self {
        let mut total = 0usize;
        let mut by_status = BTreeMap::new();
        let mut by_type = BTreeMap::new();
        let mut monetized = 0usize;
        let mut progress_sum = 0u64;
        let mut usefulness_sum = 0u64;
        let mut tag_counts: HashMap<String, (String, usize)> = HashMap::new();

        for project in projects {
            total += 1;
            *by_status.entry(project.status).or_insert(0) += 1;
            *by_type.entry(project.project_type).or_insert(0) += 1;
            if project.is_monetized {
                monetized += 1;
            }
            progress_sum += u64::from(project.progress.get());
            usefulness_sum += u64::from(project.usefulness.get());

            // Count case-insensitively, display the first spelling seen
            for tag in &project.tags {
                tag_counts
                    .entry(tag.to_lowercase())
                    .or_insert_with(|| (tag.clone(), 0))
                    .1 += 1;
            }
        }

        let average = |sum: u64| if total == 0 { 0.0 } else { sum as f64 / total as f64 };
        let completed = by_status.get(&ProjectStatus::Completed).copied().unwrap_or(0);

        let mut tags: Vec<TagCount> = tag_counts
            .into_values()
            .map(|(tag, count)| TagCount { tag, count })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        tags.truncate(top_tags);

        Self {
            total,
            by_status,
            by_type,
            monetized,
            average_progress: average(progress_sum),
            average_usefulness: average(usefulness_sum),
            completion_rate: if total == 0 { 0.0 } else { completed as f64 / total as f64 },
            top_tags: tags,
        }
    }

    pub fn count_for_status(&self, status: ProjectStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}
