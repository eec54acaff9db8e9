//! In-Memory Project Repository
//!
//! Backs offline work on a JSON snapshot and the tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Project};
use super::traits::{ProjectQuery, Repository};

#[derive(Clone, Default)]
pub struct MemoryProjectRepository {
    projects: Arc<Mutex<Vec<Project>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from existing records (e.g. a JSON export)
    pub fn from_projects(projects: Vec<Project>) -> Self {
        Self {
            next_id: Arc::new(AtomicU64::new(projects.len() as u64)),
            projects: Arc::new(Mutex::new(projects)),
        }
    }

    /// Current contents, in insertion order
    pub async fn snapshot(&self) -> Vec<Project> {
        self.projects.lock().await.clone()
    }

    fn generate_id(&self, taken: &[Project]) -> String {
        loop {
            let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            let id = format!("local-{}", n);
            if !taken.iter().any(|p| p.id == id) {
                return id;
            }
        }
    }
}

#[async_trait]
impl Repository<Project> for MemoryProjectRepository {
    async fn create(&self, entity: &Project) -> DomainResult<Project> {
        let mut projects = self.projects.lock().await;
        let mut project = entity.clone();
        if project.id.is_empty() {
            project.id = self.generate_id(&projects);
        } else if projects.iter().any(|p| p.id == project.id) {
            return Err(DomainError::Internal(format!("Project {} already exists", project.id)));
        }
        projects.push(project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<Project>> {
        let projects = self.projects.lock().await;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Project>> {
        Ok(self.projects.lock().await.clone())
    }

    async fn update(&self, entity: &Project) -> DomainResult<Project> {
        let mut projects = self.projects.lock().await;
        let slot = projects
            .iter_mut()
            .find(|p| p.id == entity.id)
            .ok_or_else(|| DomainError::NotFound(format!("Project {}", entity.id)))?;
        *slot = entity.clone();
        Ok(entity.clone())
    }

    async fn delete(&self, id: String) -> DomainResult<()> {
        let mut projects = self.projects.lock().await;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(DomainError::NotFound(format!("Project {}", id)));
        }
        Ok(())
    }
}

impl ProjectQuery for MemoryProjectRepository {}
