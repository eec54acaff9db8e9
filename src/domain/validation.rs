//! Project Form Validation
//!
//! Raw form values are checked field by field so every problem can be shown
//! next to its input at once.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ValidationErrors;
use super::project::{Progress, Project, ProjectStatus, ProjectType, Usefulness};
use super::tags::split_tag_input;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 30;

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid url regex"))
}

fn github_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https://(www\.)?github\.com/[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+/?$")
            .expect("valid github regex")
    })
}

/// Values as typed into the project form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub usefulness: i64,
    pub is_monetized: bool,
    pub progress: i64,
    /// `;`-separated tag entry
    pub tags: String,
    pub github_url: String,
    pub website_url: String,
    pub next_action: String,
    pub category: String,
}

/// Draft values after validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub name: String,
    pub description: Option<String>,
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub usefulness: Usefulness,
    pub is_monetized: bool,
    pub progress: Progress,
    pub tags: Vec<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub next_action: Option<String>,
    pub category: Option<String>,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl ProjectDraft {
    /// Prefill the edit form from an existing project
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            project_type: project.project_type,
            status: project.status,
            usefulness: i64::from(project.usefulness.get()),
            is_monetized: project.is_monetized,
            progress: i64::from(project.progress.get()),
            tags: project.tags.join("; "),
            github_url: project.github_url.clone().unwrap_or_default(),
            website_url: project.website_url.clone().unwrap_or_default(),
            next_action: project.next_action.clone().unwrap_or_default(),
            category: project.category.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ValidDraft, ValidationErrors> {
        self.check(None)
    }

    /// Field checks. With a stored project, text fields the draft leaves
    /// unchanged are kept exactly as stored and not checked again.
    fn check(&self, stored: Option<&Project>) -> Result<ValidDraft, ValidationErrors> {
        let prefill = stored.map(ProjectDraft::from_project);
        let kept = stored.zip(prefill.as_ref());
        let mut errors = ValidationErrors::new();

        let name = match kept {
            Some((project, before)) if before.name == self.name => project.name.clone(),
            _ => {
                let name = self.name.trim();
                if name.is_empty() {
                    errors.add("name", "Name is required");
                } else if name.chars().count() > MAX_NAME_LEN {
                    errors.add("name", format!("Name must be at most {} characters", MAX_NAME_LEN));
                }
                name.to_string()
            }
        };

        let usefulness = Usefulness::new(self.usefulness)
            .map_err(|_| errors.add("usefulness", "Usefulness must be between 1 and 5"))
            .ok();
        let progress = Progress::new(self.progress)
            .map_err(|_| errors.add("progress", "Progress must be between 0 and 100"))
            .ok();

        let tags = match kept {
            Some((project, before)) if before.tags == self.tags => project.tags.clone(),
            _ => {
                let tags = split_tag_input(&self.tags);
                if tags.len() > MAX_TAGS {
                    errors.add("tags", format!("At most {} tags are allowed", MAX_TAGS));
                }
                if let Some(long) = tags.iter().find(|t| t.chars().count() > MAX_TAG_LEN) {
                    errors.add("tags", format!("Tag '{}' is longer than {} characters", long, MAX_TAG_LEN));
                }
                tags
            }
        };

        let github_url = match kept {
            Some((project, before)) if before.github_url == self.github_url => project.github_url.clone(),
            _ => {
                let url = optional(&self.github_url);
                if url.as_deref().is_some_and(|u| !github_regex().is_match(u)) {
                    errors.add("githubUrl", "GitHub URL must look like https://github.com/owner/repo");
                }
                url
            }
        };
        let website_url = match kept {
            Some((project, before)) if before.website_url == self.website_url => project.website_url.clone(),
            _ => {
                let url = optional(&self.website_url);
                if url.as_deref().is_some_and(|u| !url_regex().is_match(u)) {
                    errors.add("websiteUrl", "Website URL must start with http:// or https://");
                }
                url
            }
        };

        let description = match kept {
            Some((project, before)) if before.description == self.description => project.description.clone(),
            _ => optional(&self.description),
        };
        let next_action = match kept {
            Some((project, before)) if before.next_action == self.next_action => project.next_action.clone(),
            _ => optional(&self.next_action),
        };
        let category = match kept {
            Some((project, before)) if before.category == self.category => project.category.clone(),
            _ => optional(&self.category),
        };

        errors.into_result()?;
        match (usefulness, progress) {
            (Some(usefulness), Some(progress)) => Ok(ValidDraft {
                name,
                description,
                project_type: self.project_type,
                status: self.status,
                usefulness,
                is_monetized: self.is_monetized,
                progress,
                tags,
                github_url,
                website_url,
                next_action,
                category,
            }),
            _ => Err(ValidationErrors::single("form", "Invalid rating values")),
        }
    }

    /// Validate and build a new project stamped `now`
    pub fn into_project(&self, id: impl Into<String>, now: DateTime<Utc>) -> Result<Project, ValidationErrors> {
        let valid = self.validate()?;
        let mut project = Project::new(id, valid.name.clone(), now);
        project.status = valid.status;
        valid.write_into(&mut project);
        project.log_activity("Project created", None, now);
        Ok(project)
    }

    /// Validate the edited fields and apply onto an existing project,
    /// logging a status change
    pub fn apply_to(&self, project: &mut Project, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
        let valid = self.check(Some(&*project))?;
        let status = valid.status;
        valid.write_into(project);
        project.set_status(status, now);
        project.last_updated = now;
        Ok(())
    }
}

impl ValidDraft {
    /// Copy every form field except status, which callers set with logging
    fn write_into(self, project: &mut Project) {
        project.name = self.name;
        project.description = self.description;
        project.project_type = self.project_type;
        project.usefulness = self.usefulness;
        project.is_monetized = self.is_monetized;
        project.progress = self.progress;
        project.tags = self.tags;
        project.github_url = self.github_url;
        project.website_url = self.website_url;
        project.next_action = self.next_action;
        project.category = self.category;
    }
}
