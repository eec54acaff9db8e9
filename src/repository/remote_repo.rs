//! Remote Project Repository
//!
//! Talks to the hosted backend's REST endpoint for the projects table
//! (`/rest/v1/<table>` with `id=eq.<id>` row filters).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};

use crate::config::AppConfig;
use crate::domain::{filter_projects, DomainError, DomainResult, Project, ProjectFilter};
use super::traits::{ProjectQuery, Repository};

pub struct RemoteProjectRepository {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RemoteProjectRepository {
    pub fn new(config: &AppConfig) -> DomainResult<Self> {
        if !config.is_backend_configured() {
            return Err(DomainError::Config("backend URL and API key are required".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: config.projects_table.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn id_filter(id: &str) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }

    /// All rows matching the equality filters, newest first
    async fn fetch(&self, filters: &[(&'static str, String)]) -> DomainResult<Vec<Project>> {
        let response = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "createdAt.desc")])
            .query(filters)
            .send()
            .await?;
        let rows: Vec<Project> = check_status(response).await?.json().await?;
        log::debug!("Fetched {} projects from backend", rows.len());
        Ok(rows)
    }
}

/// Map non-2xx responses to a network error carrying status and body
async fn check_status(response: Response) -> DomainResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    log::warn!("Backend request failed with {}: {}", status, body);
    Err(DomainError::Network(format!("backend returned {}: {}", status, body.trim())))
}

#[async_trait]
impl Repository<Project> for RemoteProjectRepository {
    async fn create(&self, entity: &Project) -> DomainResult<Project> {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(entity)
            .send()
            .await?;
        let mut created: Vec<Project> = check_status(response).await?.json().await?;
        if created.is_empty() {
            return Err(DomainError::Internal("backend returned no created row".to_string()));
        }
        Ok(created.remove(0))
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<Project>> {
        let response = self
            .request(Method::GET)
            .query(&Self::id_filter(&id))
            .query(&[("select", "*")])
            .send()
            .await?;
        let rows: Vec<Project> = check_status(response).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self) -> DomainResult<Vec<Project>> {
        self.fetch(&[]).await
    }

    async fn update(&self, entity: &Project) -> DomainResult<Project> {
        let response = self
            .request(Method::PATCH)
            .query(&Self::id_filter(&entity.id))
            .header("Prefer", "return=representation")
            .json(entity)
            .send()
            .await?;
        let rows: Vec<Project> = check_status(response).await?.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DomainError::NotFound(format!("Project {}", entity.id)))
    }

    async fn delete(&self, id: String) -> DomainResult<()> {
        let response = self
            .request(Method::DELETE)
            .query(&Self::id_filter(&id))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectQuery for RemoteProjectRepository {
    /// Status and type narrow the request; the rest is matched locally
    async fn query(&self, filter: &ProjectFilter) -> DomainResult<Vec<Project>> {
        let mut filters = Vec::new();
        if let Some(status) = filter.status {
            filters.push(("status", format!("eq.{}", status)));
        }
        if let Some(project_type) = filter.project_type {
            filters.push(("type", format!("eq.{}", project_type)));
        }
        let rows = self.fetch(&filters).await?;
        Ok(filter_projects(&rows, filter).into_iter().cloned().collect())
    }
}
