//! Repository Traits
//!
//! Storage-agnostic access to entities. The dashboard talks to the hosted
//! backend in production and to an in-memory store offline.

use async_trait::async_trait;

use crate::domain::{filter_projects, DomainResult, Entity, Project, ProjectFilter};

/// CRUD over one entity type
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Store a new entity; an empty ID is assigned by the store
    async fn create(&self, entity: &T) -> DomainResult<T>;

    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Replace the stored entity with the same ID
    async fn update(&self, entity: &T) -> DomainResult<T>;

    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Filtered project listing.
///
/// The default lists everything and filters locally; stores that can narrow
/// the query server-side override it but must return the same set.
#[async_trait]
pub trait ProjectQuery: Repository<Project> {
    async fn query(&self, filter: &ProjectFilter) -> DomainResult<Vec<Project>> {
        let projects = self.list().await?;
        Ok(filter_projects(&projects, filter).into_iter().cloned().collect())
    }
}
