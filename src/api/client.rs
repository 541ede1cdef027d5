use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::constants::{self, headers, PAGE_SIZE};
use super::models::{
    Document, Organization, OrganizationAttributes, Paged, Plan, PlanAttributes, Resource, Run,
    RunAttributes, TeamAccess, TeamAttributes, TeamWorkspaceAttributes, Variable,
    VariableAttributes, Workspace, WorkspaceAttributes,
};
use super::search::parse_search_text;

/// Everything the screens need from the remote API.
///
/// `page` is `None` when the server should pick its own first page.
#[async_trait]
pub trait TfeApi: Send + Sync {
    async fn list_organizations(&self, page: Option<u32>) -> Result<Paged<Organization>>;
    async fn list_workspaces(&self, organization: &str, search: &str, page: Option<u32>) -> Result<Paged<Workspace>>;
    async fn read_workspace(&self, organization: &str, workspace: &str) -> Result<Workspace>;
    async fn list_workspace_variables(&self, workspace_id: &str) -> Result<Vec<Variable>>;
    async fn list_workspace_runs(&self, workspace_id: &str) -> Result<Vec<Run>>;
    async fn list_workspace_team_accesses(&self, workspace_id: &str) -> Result<Vec<TeamAccess>>;
    async fn read_run(&self, run_id: &str) -> Result<Run>;
    async fn read_plan(&self, plan_id: &str) -> Result<Plan>;
    async fn read_plan_logs(&self, plan_id: &str) -> Result<String>;
    async fn read_apply_logs(&self, apply_id: &str) -> Result<String>;
}

/// Terraform Cloud / Enterprise client with connection pooling
pub struct TfeClient {
    base_url: String,
    token: String,
    http_client: reqwest::Client,
}

impl TfeClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("terrui/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http_client,
        })
    }

    /// Build a client from `TFE_TOKEN` / `TFE_ADDRESS`, loading a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let token = std::env::var(constants::TOKEN_ENV)
            .with_context(|| format!("{} is not set", constants::TOKEN_ENV))?;
        let base_url = std::env::var(constants::ADDRESS_ENV)
            .unwrap_or_else(|_| constants::DEFAULT_ADDRESS.to_string());

        Self::new(base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, headers::CONTENT_TYPE_JSON_API)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("GET {} {:?}", url, query);
        let response = self
            .request(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Request to {} was rejected", url))?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {} (text)", url);
        self.request(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Request to {} was rejected", url))?
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }
}

fn page_query(page: Option<u32>) -> Vec<(&'static str, String)> {
    let mut query = vec![("page[size]", PAGE_SIZE.to_string())];
    if let Some(page) = page {
        query.push(("page[number]", page.to_string()));
    }
    query
}

#[async_trait]
impl TfeApi for TfeClient {
    async fn list_organizations(&self, page: Option<u32>) -> Result<Paged<Organization>> {
        let url = constants::organizations_endpoint(&self.base_url);
        let doc: Document<Vec<Resource<OrganizationAttributes>>> = self.get(&url, &page_query(page)).await?;
        let pagination = doc.pagination();
        let items = doc.data.into_iter().map(Organization::from).collect();
        Ok(Paged::new(items, pagination))
    }

    async fn list_workspaces(&self, organization: &str, search: &str, page: Option<u32>) -> Result<Paged<Workspace>> {
        let url = constants::workspaces_endpoint(&self.base_url, organization);
        let (text_search, tags_search) = parse_search_text(search);

        let mut query = page_query(page);
        query.push(("include", "current_run".to_string()));
        if !text_search.is_empty() {
            query.push(("search[name]", text_search));
        }
        if !tags_search.is_empty() {
            query.push(("search[tags]", tags_search));
        }

        let doc: Document<Vec<Resource<WorkspaceAttributes>>> = self.get(&url, &query).await?;
        let pagination = doc.pagination();
        let items = doc
            .data
            .iter()
            .cloned()
            .map(|r| Workspace::from_resource(r, &doc))
            .collect();
        Ok(Paged::new(items, pagination))
    }

    async fn read_workspace(&self, organization: &str, workspace: &str) -> Result<Workspace> {
        let url = constants::workspace_endpoint(&self.base_url, organization, workspace);
        let query = [("include", "current_run,current_run.plan,locked_by".to_string())];
        let doc: Document<Resource<WorkspaceAttributes>> = self.get(&url, &query).await?;
        let mut workspace = Workspace::from_resource(doc.data.clone(), &doc);

        // The workspace include does not reach the run's author or apply, so re-read it in full.
        let current_run_id = doc.data.related_id("current-run").map(str::to_string);
        if let Some(run_id) = current_run_id {
            let url = constants::run_endpoint(&self.base_url, &run_id);
            let query = [("include", "created_by,plan,apply".to_string())];
            let run_doc: Document<Resource<RunAttributes>> = self.get(&url, &query).await?;
            workspace.current_run = Some(Run::from_resource(run_doc.data.clone(), &run_doc));
        }

        Ok(workspace)
    }

    async fn list_workspace_variables(&self, workspace_id: &str) -> Result<Vec<Variable>> {
        let url = constants::workspace_vars_endpoint(&self.base_url, workspace_id);
        let doc: Document<Vec<Resource<VariableAttributes>>> = self.get(&url, &[]).await?;
        Ok(doc.data.into_iter().map(Variable::from).collect())
    }

    async fn list_workspace_runs(&self, workspace_id: &str) -> Result<Vec<Run>> {
        let url = constants::workspace_runs_endpoint(&self.base_url, workspace_id);
        let query = [("include", "created_by".to_string())];
        let doc: Document<Vec<Resource<RunAttributes>>> = self.get(&url, &query).await?;
        Ok(doc
            .data
            .iter()
            .cloned()
            .map(|r| Run::from_resource(r, &doc))
            .collect())
    }

    async fn list_workspace_team_accesses(&self, workspace_id: &str) -> Result<Vec<TeamAccess>> {
        let url = constants::team_workspaces_endpoint(&self.base_url);
        let query = [("filter[workspace][id]", workspace_id.to_string())];
        let doc: Document<Vec<Resource<TeamWorkspaceAttributes>>> = self.get(&url, &query).await?;

        let reads = doc.data.iter().map(|access| async move {
            let team_id = access.related_id("team").unwrap_or_default().to_string();
            let url = constants::team_endpoint(&self.base_url, &team_id);
            let team: Document<Resource<TeamAttributes>> = self.get(&url, &[]).await?;
            Ok::<_, anyhow::Error>(TeamAccess {
                team_id,
                team_name: team.data.attributes.name,
                access: access.attributes.access.clone(),
            })
        });

        futures::future::try_join_all(reads).await
    }

    async fn read_run(&self, run_id: &str) -> Result<Run> {
        let url = constants::run_endpoint(&self.base_url, run_id);
        let query = [("include", "plan,apply".to_string())];
        let doc: Document<Resource<RunAttributes>> = self.get(&url, &query).await?;
        Ok(Run::from_resource(doc.data.clone(), &doc))
    }

    async fn read_plan(&self, plan_id: &str) -> Result<Plan> {
        let url = constants::plan_endpoint(&self.base_url, plan_id);
        let doc: Document<Resource<PlanAttributes>> = self.get(&url, &[]).await?;
        Ok(Plan::from(doc.data))
    }

    async fn read_plan_logs(&self, plan_id: &str) -> Result<String> {
        self.get_text(&constants::plan_logs_endpoint(&self.base_url, plan_id)).await
    }

    async fn read_apply_logs(&self, apply_id: &str) -> Result<String> {
        self.get_text(&constants::apply_logs_endpoint(&self.base_url, apply_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_omits_unset_page() {
        assert_eq!(page_query(None), vec![("page[size]", "30".to_string())]);
        assert_eq!(
            page_query(Some(4)),
            vec![("page[size]", "30".to_string()), ("page[number]", "4".to_string())]
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = TfeClient::new("https://tfe.example.com/", "token").unwrap();
        assert_eq!(client.base_url(), "https://tfe.example.com");
    }
}
