//! Application Configuration
//!
//! Backend and function endpoints, stored as `tracker_config.json` in the
//! platform config directory. Environment variables override the file so
//! credentials can stay out of it.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

pub const CONFIG_FILE_NAME: &str = "tracker_config.json";
pub const ENV_BACKEND_URL: &str = "PROJECT_TRACKER_BACKEND_URL";
pub const ENV_API_KEY: &str = "PROJECT_TRACKER_API_KEY";
pub const ENV_FUNCTIONS_URL: &str = "PROJECT_TRACKER_FUNCTIONS_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Base URL of the hosted backend (REST API lives under `/rest/v1`)
    pub backend_url: String,
    /// Public API key sent as `apikey` and bearer token
    pub api_key: String,
    /// Base URL of the serverless functions; defaults to `<backend>/functions/v1`
    pub functions_url: String,
    pub projects_table: String,
    pub request_timeout_secs: u64,
    pub log_dir: Option<PathBuf>,
    /// Where exports are written; current directory when unset
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            api_key: String::new(),
            functions_url: String::new(),
            projects_table: "projects".to_string(),
            request_timeout_secs: 30,
            log_dir: None,
            export_dir: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "project-tracker", "ProjectTracker")
}

impl AppConfig {
    /// Platform default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| DomainError::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// Load from `path` (or the default location) and apply env overrides
    pub fn load(path: Option<&Path>) -> DomainResult<Self> {
        let mut config = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a lookup (the environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(url) = non_empty(ENV_FUNCTIONS_URL) {
            self.functions_url = url;
        }
    }

    pub fn save_to(&self, path: &Path) -> DomainResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DomainError::Config(format!("failed to create {}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|e| DomainError::Config(format!("failed to write {}: {}", path.display(), e)))
    }

    /// Write a starter file with default values. An existing file is only
    /// replaced when `overwrite` is set.
    pub fn init_file(path: &Path, overwrite: bool) -> DomainResult<Self> {
        if path.exists() && !overwrite {
            return Err(DomainError::Config(format!("{} already exists", path.display())));
        }
        let config = Self::default();
        config.save_to(path)?;
        log::info!("Wrote default config to {}", path.display());
        Ok(config)
    }

    /// Copy safe to print, with the API key masked
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if !shown.api_key.is_empty() {
            shown.api_key = "********".to_string();
        }
        shown
    }

    pub fn is_backend_configured(&self) -> bool {
        !self.backend_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Explicit functions URL, else derived from the backend URL
    pub fn functions_base_url(&self) -> Option<String> {
        let explicit = self.functions_url.trim();
        if !explicit.is_empty() {
            return Some(explicit.trim_end_matches('/').to_string());
        }
        let backend = self.backend_url.trim();
        if backend.is_empty() {
            None
        } else {
            Some(format!("{}/functions/v1", backend.trim_end_matches('/')))
        }
    }

    /// Configured log directory, else the platform data dir
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_local_dir().join("logs")))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
