//! AI Insights
//!
//! Client for the serverless functions that prompt the LLM, plus the panel
//! state. Only a reduced view of each project is sent.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::domain::{ActivityLog, DomainError, DomainResult, Project, ProjectStatus, ProjectType};

pub const INSIGHTS_FUNCTION: &str = "project-insights";
pub const SUMMARY_FUNCTION: &str = "project-summary";

/// Per-project fields the LLM functions get to see
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDigest<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub progress: u8,
    pub tags: &'a [String],
    pub usefulness: u8,
    pub is_monetized: bool,
    pub next_action: Option<&'a str>,
    pub activity_logs: &'a [ActivityLog],
}

impl<'a> From<&'a Project> for ProjectDigest<'a> {
    fn from(project: &'a Project) -> Self {
        Self {
            name: &project.name,
            project_type: project.project_type,
            status: project.status,
            progress: project.progress.get(),
            tags: &project.tags,
            usefulness: project.usefulness.get(),
            is_monetized: project.is_monetized,
            next_action: project.next_action.as_deref(),
            activity_logs: &project.activity_logs,
        }
    }
}

#[derive(Debug, Serialize)]
struct InsightsRequest<'a> {
    projects: Vec<ProjectDigest<'a>>,
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    project: ProjectDigest<'a>,
    description: Option<&'a str>,
}

/// Portfolio-level insight text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub summary: String,
    pub suggestions: String,
    pub trends: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

pub struct InsightsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl InsightsClient {
    pub fn new(config: &AppConfig) -> DomainResult<Self> {
        let base_url = config
            .functions_base_url()
            .ok_or_else(|| DomainError::Config("functions URL is not configured".to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn function_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    async fn post<B: Serialize + ?Sized>(&self, function: &str, body: &B) -> DomainResult<Response> {
        let mut request = self.client.post(self.function_url(function)).json(body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("{} failed with {}: {}", function, status, body);
            return Err(DomainError::Network(format!("{} returned {}", function, status)));
        }
        Ok(response)
    }

    /// Summary, suggestions and trends across the given projects
    pub async fn generate(&self, projects: &[Project]) -> DomainResult<Insights> {
        let request = InsightsRequest {
            projects: projects.iter().map(ProjectDigest::from).collect(),
        };
        log::info!("Requesting insights for {} projects", request.projects.len());
        let insights = self.post(INSIGHTS_FUNCTION, &request).await?.json().await?;
        Ok(insights)
    }

    /// Short summary of a single project
    pub async fn summarize_project(&self, project: &Project) -> DomainResult<String> {
        let request = SummaryRequest {
            project: ProjectDigest::from(project),
            description: project.description.as_deref(),
        };
        let response: SummaryResponse = self.post(SUMMARY_FUNCTION, &request).await?.json().await?;
        Ok(response.summary)
    }
}

/// Insight panel state. A failed refresh never discards the last good result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightState {
    pub insights: Option<Insights>,
    pub loading: bool,
    pub error: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl InsightState {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish(&mut self, result: DomainResult<Insights>, now: DateTime<Utc>) {
        self.loading = false;
        match result {
            Ok(insights) => {
                self.insights = Some(insights);
                self.generated_at = Some(now);
                self.error = None;
            }
            Err(e) => {
                log::error!("Insight generation failed: {}", e);
                self.error = Some(format!("Failed to generate insights: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Progress;
    use crate::test_support::MockServer;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()
    }

    fn sample_project() -> Project {
        let mut project = Project::new("p1", "Budget Tracker", now());
        project.description = Some("secret internal notes".into());
        project.progress = Progress::new(55).unwrap();
        project.tags = vec!["finance".into()];
        project.next_action = Some("Add charts".into());
        project.github_url = Some("https://github.com/me/budget".into());
        project
    }

    fn config_for(url: &str) -> AppConfig {
        AppConfig {
            functions_url: url.to_string(),
            api_key: "anon".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_digest_has_only_reduced_fields() {
        let project = sample_project();
        let json = serde_json::to_value(ProjectDigest::from(&project)).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "activityLogs", "isMonetized", "name", "nextAction", "progress", "status", "tags",
                "type", "usefulness"
            ]
        );
    }

    #[test]
    fn test_missing_functions_url_is_config_error() {
        assert!(matches!(InsightsClient::new(&AppConfig::default()), Err(DomainError::Config(_))));
    }

    #[tokio::test]
    async fn test_generate_posts_projects() {
        let server = MockServer::start(vec![(
            200,
            r#"{"summary":"Mostly web work","suggestions":"Finish one","trends":"Rising"}"#.into(),
        )])
        .await;
        let client = InsightsClient::new(&config_for(&server.url)).unwrap();

        let insights = client.generate(&[sample_project()]).await.unwrap();
        assert_eq!(insights.summary, "Mostly web work");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/project-insights");
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["projects"][0]["name"], "Budget Tracker");
        assert_eq!(body["projects"][0]["progress"], 55);
        assert!(body["projects"][0].get("githubUrl").is_none());
        assert_eq!(requests[0].header("authorization"), Some("Bearer anon"));
    }

    #[tokio::test]
    async fn test_summarize_project() {
        let server = MockServer::start(vec![(200, r#"{"summary":"A budgeting app"}"#.into())]).await;
        let client = InsightsClient::new(&config_for(&server.url)).unwrap();

        let summary = client.summarize_project(&sample_project()).await.unwrap();
        assert_eq!(summary, "A budgeting app");
        assert_eq!(server.requests()[0].path, "/project-summary");
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_insights() {
        let server = MockServer::start(vec![(500, r#"{"error":"upstream"}"#.into())]).await;
        let client = InsightsClient::new(&config_for(&server.url)).unwrap();

        let previous = Insights {
            summary: "old".into(),
            suggestions: "old".into(),
            trends: "old".into(),
        };
        let mut state = InsightState::default();
        state.finish(Ok(previous.clone()), now());

        state.begin();
        assert!(state.loading);
        let result = client.generate(&[sample_project()]).await;
        assert!(matches!(result, Err(DomainError::Network(ref msg)) if msg.contains("500")));
        state.finish(result, now());

        assert!(!state.loading);
        assert_eq!(state.insights, Some(previous));
        assert!(state.error.is_some());
    }
}
