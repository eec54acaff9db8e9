//! Project Tracker Core
//!
//! Layered architecture:
//! - domain: Core entities, filtering, timeline, tags and validation
//! - codec: CSV/JSON import and export
//! - repository: Data access abstractions and implementations
//! - insights: LLM insight functions
//! - store: Dashboard state (cache, filter, view mode)
//! - commands: Handlers used by the CLI
//! - cli: Argument parsing for the binary

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod domain;
pub mod insights;
pub mod repository;
pub mod store;

#[cfg(test)]
mod test_support;

use config::AppConfig;
use domain::{DomainError, DomainResult, Project};
use repository::{MemoryProjectRepository, ProjectRepository, RemoteProjectRepository, Repository};
use store::DashboardStore;

/// Application state shared across commands
pub struct AppState {
    pub config: AppConfig,
    pub repo: Arc<ProjectRepository>,
    pub store: Mutex<DashboardStore>,
    /// JSON snapshot backing an offline session; rewritten after each change
    pub snapshot_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: AppConfig, repo: Arc<ProjectRepository>) -> Self {
        Self {
            config,
            repo,
            store: Mutex::new(DashboardStore::new()),
            snapshot_path: None,
        }
    }

    /// Connect to the configured backend
    pub fn remote(config: AppConfig) -> DomainResult<Self> {
        let repo = RemoteProjectRepository::new(&config)?;
        Ok(Self::new(config, Arc::new(repo)))
    }

    /// Work offline on a JSON snapshot; a missing file starts empty
    pub fn offline(config: AppConfig, snapshot: &Path) -> DomainResult<Self> {
        let projects = load_snapshot(snapshot)?;
        log::info!("Opened snapshot {} with {} projects", snapshot.display(), projects.len());
        let mut state = Self::new(config, Arc::new(MemoryProjectRepository::from_projects(projects)));
        state.snapshot_path = Some(snapshot.to_path_buf());
        Ok(state)
    }

    /// Rewrite the snapshot file, if this session has one
    pub async fn persist_snapshot(&self) -> DomainResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let projects = self.repo.list().await?;
        let json = codec::export_json(&projects)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| DomainError::Internal(format!("failed to write {}: {}", path.display(), e)))?;
        log::debug!("Saved {} projects to {}", projects.len(), path.display());
        Ok(())
    }
}

fn load_snapshot(path: &Path) -> DomainResult<Vec<Project>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Internal(format!("failed to read {}: {}", path.display(), e)))?;
    Ok(codec::import_json(&text)?)
}
