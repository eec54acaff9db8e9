//! Project Entity
//!
//! A tracked work item with status/type/progress metadata. Field names on the
//! wire are camelCase to match the backend table.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::tags::same_tag;

/// What kind of thing the project is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ProjectType {
    #[default]
    #[serde(rename = "Web App")]
    WebApp,
    #[serde(rename = "Mobile App")]
    MobileApp,
    #[serde(rename = "Desktop App")]
    DesktopApp,
    #[serde(rename = "API")]
    Api,
    Library,
    #[serde(rename = "CLI Tool")]
    CliTool,
    Other,
}

impl ProjectType {
    pub const ALL: [ProjectType; 7] = [
        ProjectType::WebApp,
        ProjectType::MobileApp,
        ProjectType::DesktopApp,
        ProjectType::Api,
        ProjectType::Library,
        ProjectType::CliTool,
        ProjectType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::WebApp => "Web App",
            ProjectType::MobileApp => "Mobile App",
            ProjectType::DesktopApp => "Desktop App",
            ProjectType::Api => "API",
            ProjectType::Library => "Library",
            ProjectType::CliTool => "CLI Tool",
            ProjectType::Other => "Other",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    /// Accepts the display name in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ProjectType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown project type '{}'", s))
    }
}

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    #[default]
    Idea,
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Maintenance,
    Abandoned,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 7] = [
        ProjectStatus::Idea,
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
        ProjectStatus::Maintenance,
        ProjectStatus::Abandoned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Idea => "Idea",
            ProjectStatus::Planning => "Planning",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Maintenance => "Maintenance",
            ProjectStatus::Abandoned => "Abandoned",
        }
    }

    /// Hex display color used by cards and the timeline
    pub fn color(&self) -> &'static str {
        match self {
            ProjectStatus::Idea => "#a855f7",
            ProjectStatus::Planning => "#3b82f6",
            ProjectStatus::InProgress => "#f59e0b",
            ProjectStatus::OnHold => "#6b7280",
            ProjectStatus::Completed => "#22c55e",
            ProjectStatus::Maintenance => "#06b6d4",
            ProjectStatus::Abandoned => "#ef4444",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ProjectStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown project status '{}'", s))
    }
}

/// Usefulness rating, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Usefulness(u8);

impl Usefulness {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, String> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(format!("usefulness must be between {} and {}, got {}", Self::MIN, Self::MAX, value))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Usefulness {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<i64> for Usefulness {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Usefulness> for u8 {
    fn from(u: Usefulness) -> Self {
        u.0
    }
}

impl fmt::Display for Usefulness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion percentage, always within 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Progress(u8);

impl Progress {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Result<Self, String> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(format!("progress must be between 0 and {}, got {}", Self::MAX, value))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Progress {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Progress> for u8 {
    fn from(p: Progress) -> Self {
        p.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// One entry in a project's activity history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A task suggested by the AI panel and tracked on the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTask {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A tracked project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Backend-assigned identifier (empty until created)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub usefulness: Usefulness,
    #[serde(default)]
    pub is_monetized: bool,
    #[serde(default)]
    pub progress: Progress,
    /// Ordered tag list
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,

    // Nested collections (JSON only, dropped by CSV export)
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub activity_logs: Vec<ActivityLog>,
    #[serde(default)]
    pub ai_tasks: Vec<AiTask>,
}

impl Project {
    /// Create a project with default metadata, stamped `now`
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            project_type: ProjectType::default(),
            status: ProjectStatus::default(),
            usefulness: Usefulness::default(),
            is_monetized: false,
            progress: Progress::default(),
            tags: Vec::new(),
            github_url: None,
            website_url: None,
            next_action: None,
            category: None,
            created_at: now,
            last_updated: now,
            milestones: Vec::new(),
            activity_logs: Vec::new(),
            ai_tasks: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }

    /// Case-insensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| same_tag(t, tag))
    }

    /// Change status, logging the transition
    pub fn set_status(&mut self, status: ProjectStatus, now: DateTime<Utc>) {
        if self.status == status {
            return;
        }
        let action = format!("Status changed from {} to {}", self.status, status);
        self.status = status;
        self.log_activity(action, None, now);
    }

    /// Append an activity entry and bump `last_updated`
    pub fn log_activity(&mut self, action: impl Into<String>, details: Option<String>, now: DateTime<Utc>) {
        let id = format!("log-{}", self.activity_logs.len() + 1);
        self.activity_logs.push(ActivityLog {
            id,
            timestamp: now,
            action: action.into(),
            details,
        });
        self.last_updated = now;
    }
}

impl Entity for Project {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}
