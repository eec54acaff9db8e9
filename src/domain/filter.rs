//! Project Filter
//!
//! Reduces the cached project list to what the filter bar asks for.
//! Unset constraints pass everything, so `ProjectFilter::default()` is the
//! identity.

use serde::{Deserialize, Serialize};

use super::project::{Project, ProjectStatus, ProjectType, Usefulness};

/// Filter bar value. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    pub usefulness: Option<Usefulness>,
    /// Only keep monetized projects when set
    #[serde(default)]
    pub monetized_only: bool,
    /// Every tag must be present on the project
    #[serde(default)]
    pub tags: Vec<String>,
    pub search: Option<String>,
}

/// Parse a select value where `"all"` (or blank) means no constraint
pub fn parse_choice<T: std::str::FromStr<Err = String>>(value: &str) -> Result<Option<T>, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

impl ProjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = Some(project_type);
        self
    }

    pub fn with_usefulness(mut self, usefulness: Usefulness) -> Self {
        self.usefulness = Some(usefulness);
        self
    }

    pub fn monetized_only(mut self) -> Self {
        self.monetized_only = true;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// True when no constraint is set
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.project_type.is_none()
            && self.usefulness.is_none()
            && !self.monetized_only
            && self.tags.iter().all(|t| t.trim().is_empty())
            && self.search_term().is_none()
    }

    /// Lowercased search text, `None` when blank
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Search covers name, description and tags
    fn matches_search(project: &Project, term: &str) -> bool {
        project.name.to_lowercase().contains(term)
            || project
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(term))
            || project.tags.iter().any(|t| t.to_lowercase().contains(term))
    }

    pub fn matches(&self, project: &Project) -> bool {
        if self.status.is_some_and(|s| s != project.status) {
            return false;
        }
        if self.project_type.is_some_and(|t| t != project.project_type) {
            return false;
        }
        if self.usefulness.is_some_and(|u| u != project.usefulness) {
            return false;
        }
        if self.monetized_only && !project.is_monetized {
            return false;
        }
        let tags_ok = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .all(|t| project.has_tag(t));
        if !tags_ok {
            return false;
        }
        match self.search_term() {
            Some(term) => Self::matches_search(project, &term),
            None => true,
        }
    }
}

/// Projects satisfying `filter`, in their original order
pub fn filter_projects<'a>(projects: &'a [Project], filter: &ProjectFilter) -> Vec<&'a Project> {
    projects.iter().filter(|p| filter.matches(p)).collect()
}
