//! Command Line Interface
//!
//! Argument definitions for the `project-tracker` binary and the mapping from
//! raw flags to filters and form drafts.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::codec::ExportFormat;
use crate::domain::filter::parse_choice;
use crate::domain::{
    Project, ProjectDraft, ProjectFilter, ProjectStatus, ProjectType, Usefulness, ValidationErrors,
};

#[derive(Parser, Debug)]
#[command(name = "project-tracker")]
#[command(author, version, about = "Track side projects: filter, export, timeline and AI insights", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Work offline on a JSON snapshot instead of the backend
    #[arg(long, global = true)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List projects matching a filter
    List(FilterArgs),

    /// Export all projects to projects_export_<date>.<ext>
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Target directory (default: configured export dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Import projects from a CSV or JSON file
    Import {
        path: PathBuf,

        /// Overrides detection from the file extension
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Show the project timeline
    Timeline(FilterArgs),

    /// Show portfolio statistics
    Stats,

    /// Suggest tags for a (`;`-separated) tag entry
    Tags {
        #[arg(default_value = "")]
        input: String,
    },

    /// Generate AI insights for the matching projects
    Insights(FilterArgs),

    /// AI summary of one project
    Summary { id: String },

    /// Create a project
    Add(DraftArgs),

    /// Edit a project; omitted fields keep their value
    Edit {
        id: String,

        #[command(flatten)]
        changes: EditArgs,
    },

    /// Delete a project
    Delete { id: String },

    /// Create or inspect the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a config file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config, API key masked
    Show,
}

/// Filter bar flags; `all` means no constraint
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long = "type")]
    pub project_type: Option<String>,

    #[arg(long)]
    pub usefulness: Option<String>,

    #[arg(long)]
    pub monetized: bool,

    /// Required tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<ProjectFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut filter = ProjectFilter::new();

        if let Some(status) = &self.status {
            match parse_choice::<ProjectStatus>(status) {
                Ok(status) => filter.status = status,
                Err(e) => errors.add("status", e),
            }
        }
        if let Some(project_type) = &self.project_type {
            match parse_choice::<ProjectType>(project_type) {
                Ok(project_type) => filter.project_type = project_type,
                Err(e) => errors.add("type", e),
            }
        }
        if let Some(usefulness) = &self.usefulness {
            let value = usefulness.trim();
            if !value.is_empty() && !value.eq_ignore_ascii_case("all") {
                match value.parse::<i64>().map_err(|e| e.to_string()).and_then(Usefulness::new) {
                    Ok(usefulness) => filter.usefulness = Some(usefulness),
                    Err(_) => errors.add("usefulness", "Usefulness must be between 1 and 5"),
                }
            }
        }

        filter.monetized_only = self.monetized;
        for tag in &self.tags {
            filter = filter.with_tag(tag.trim());
        }
        if let Some(search) = &self.search {
            filter = filter.with_search(search.as_str());
        }

        errors.into_result().map(|_| filter)
    }
}

/// Form fields for a new project
#[derive(Args, Debug, Clone)]
pub struct DraftArgs {
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long = "type", default_value = "Web App")]
    pub project_type: String,

    #[arg(long, default_value = "Idea")]
    pub status: String,

    #[arg(long, default_value_t = 3)]
    pub usefulness: i64,

    #[arg(long, default_value_t = 0)]
    pub progress: i64,

    #[arg(long)]
    pub monetized: bool,

    /// `;`-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,

    #[arg(long, default_value = "")]
    pub github_url: String,

    #[arg(long, default_value = "")]
    pub website_url: String,

    #[arg(long, default_value = "")]
    pub next_action: String,

    #[arg(long, default_value = "")]
    pub category: String,
}

impl DraftArgs {
    pub fn to_draft(&self) -> Result<ProjectDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let project_type = self
            .project_type
            .parse::<ProjectType>()
            .map_err(|e| errors.add("type", e))
            .unwrap_or_default();
        let status = self
            .status
            .parse::<ProjectStatus>()
            .map_err(|e| errors.add("status", e))
            .unwrap_or_default();
        errors.into_result()?;

        Ok(ProjectDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            project_type,
            status,
            usefulness: self.usefulness,
            is_monetized: self.monetized,
            progress: self.progress,
            tags: self.tags.clone(),
            github_url: self.github_url.clone(),
            website_url: self.website_url.clone(),
            next_action: self.next_action.clone(),
            category: self.category.clone(),
        })
    }
}

/// Partial edit; every flag is optional
#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "type")]
    pub project_type: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub usefulness: Option<i64>,
    #[arg(long)]
    pub progress: Option<i64>,
    #[arg(long)]
    pub monetized: Option<bool>,
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub github_url: Option<String>,
    #[arg(long)]
    pub website_url: Option<String>,
    #[arg(long)]
    pub next_action: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

impl EditArgs {
    /// Edit form prefilled from `project` with the given flags applied
    pub fn to_draft(&self, project: &Project) -> Result<ProjectDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut draft = ProjectDraft::from_project(project);

        if let Some(project_type) = &self.project_type {
            match project_type.parse::<ProjectType>() {
                Ok(t) => draft.project_type = t,
                Err(e) => errors.add("type", e),
            }
        }
        if let Some(status) = &self.status {
            match status.parse::<ProjectStatus>() {
                Ok(s) => draft.status = s,
                Err(e) => errors.add("status", e),
            }
        }
        errors.into_result()?;

        let overrides = [
            (&self.name, &mut draft.name),
            (&self.description, &mut draft.description),
            (&self.tags, &mut draft.tags),
            (&self.github_url, &mut draft.github_url),
            (&self.website_url, &mut draft.website_url),
            (&self.next_action, &mut draft.next_action),
            (&self.category, &mut draft.category),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        if let Some(usefulness) = self.usefulness {
            draft.usefulness = usefulness;
        }
        if let Some(progress) = self.progress {
            draft.progress = progress;
        }
        if let Some(monetized) = self.monetized {
            draft.is_monetized = monetized;
        }
        Ok(draft)
    }
}
