//! Dashboard State Store
//!
//! Holds the loaded projects together with the active filter, view mode and
//! insight panel state. Every view is derived from here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    derive_timeline, filter_projects, timeline_range, Project, ProjectFilter, ProjectStats, TagIndex,
    TimelineItem, TimelineRange,
};
use crate::insights::InsightState;

/// Number of tags reported in the stats overview
pub const TOP_TAGS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
    Timeline,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardStore {
    /// All projects, newest first as the backend returns them
    pub projects: Vec<Project>,
    pub filter: ProjectFilter,
    pub view_mode: ViewMode,
    pub insights: InsightState,
}

impl DashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects,
            ..Default::default()
        }
    }

    // ========================
    // Mutations
    // ========================

    /// Replace the whole collection (after a fetch or import)
    pub fn replace_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    /// Insert a new project at the front, or replace one with the same ID
    pub fn upsert(&mut self, project: Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.insert(0, project),
        }
    }

    /// Remove a project by ID; returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        self.projects.len() != before
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn set_filter(&mut self, filter: ProjectFilter) {
        self.filter = filter;
    }

    pub fn reset_filter(&mut self) {
        self.filter = ProjectFilter::default();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    // ========================
    // Derived views
    // ========================

    /// Projects passing the active filter, in collection order
    pub fn visible_projects(&self) -> Vec<&Project> {
        filter_projects(&self.projects, &self.filter)
    }

    /// Timeline bars for the visible projects and the range to draw them in
    pub fn timeline(&self, now: DateTime<Utc>) -> (Vec<TimelineItem>, TimelineRange) {
        let items = derive_timeline(self.visible_projects());
        let range = timeline_range(&items, now);
        (items, range)
    }

    /// Aggregate stats over the whole collection, ignoring the filter
    pub fn stats(&self) -> ProjectStats {
        ProjectStats::from_projects(&self.projects, TOP_TAGS)
    }

    /// Suggestion index: the built-in vocabulary plus every tag in use
    pub fn tag_index(&self) -> TagIndex {
        TagIndex::vocabulary_with(
            self.projects
                .iter()
                .flat_map(|p| p.tags.iter().map(String::as_str)),
        )
    }
}
