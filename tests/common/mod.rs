//! Shared fixtures for the controller integration tests
//!
//! `FakeTfe` stands in for the Terraform Cloud API: it serves canned data,
//! echoes requested pages back and records what the screens asked for.

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use terrui::api::{Organization, Paged, Pagination, Plan, Run, TeamAccess, TfeApi, Variable, Workspace};
use terrui::config::Config;
use terrui::tui::apps::{ListScreen, OrganizationSource, WorkspaceScreen, WorkspaceSource};
use terrui::tui::{Context, PageController, Screen, ScreenId};

/// One `list_workspaces` call as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceQuery {
    pub search: String,
    pub page: Option<u32>,
}

pub struct FakeTfe {
    pub organizations: Vec<Organization>,
    pub workspaces: Vec<Workspace>,
    /// Page reported when the caller leaves the page unset
    pub start_page: u32,
    pub total_pages: u32,
    pub workspace: Workspace,
    pub variables: Vec<Variable>,
    pub runs: Vec<Run>,
    pub accesses: Vec<TeamAccess>,
    pub plan: Plan,
    pub plan_log: Option<String>,
    pub apply_log: Option<String>,
    pub fail_workspace: bool,
    pub workspace_queries: Mutex<Vec<WorkspaceQuery>>,
}

impl Default for FakeTfe {
    fn default() -> Self {
        Self {
            organizations: vec![organization("acme"), organization("globex")],
            workspaces: vec![workspace("networking"), workspace("database")],
            start_page: 1,
            total_pages: 1,
            workspace: workspace_with_run("networking"),
            variables: vec![
                variable("region", "eu-west-1", false),
                variable("db_password", "hunter2", true),
            ],
            runs: vec![run("run-1", "applied"), run("run-2", "errored")],
            accesses: vec![TeamAccess {
                team_id: "team-1".to_string(),
                team_name: "owners".to_string(),
                access: "admin".to_string(),
            }],
            plan: Plan {
                id: "plan-1".to_string(),
                status: "finished".to_string(),
                resource_additions: 2,
                resource_changes: 1,
                resource_destructions: 0,
            },
            plan_log: Some("{\"@message\":\"Plan: 2 to add\"}\nraw line".to_string()),
            apply_log: Some("{\"@message\":\"Apply complete!\"}".to_string()),
            fail_workspace: false,
            workspace_queries: Mutex::new(Vec::new()),
        }
    }
}

impl FakeTfe {
    pub fn workspace_queries(&self) -> Vec<WorkspaceQuery> {
        self.workspace_queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn last_workspace_query(&self) -> Option<WorkspaceQuery> {
        self.workspace_queries().last().cloned()
    }
}

#[async_trait]
impl TfeApi for FakeTfe {
    async fn list_organizations(&self, page: Option<u32>) -> Result<Paged<Organization>> {
        let pagination = Pagination {
            current_page: page.unwrap_or(1),
            total_pages: 1,
            total_count: self.organizations.len() as u32,
        };
        Ok(Paged::new(self.organizations.clone(), pagination))
    }

    async fn list_workspaces(&self, _organization: &str, search: &str, page: Option<u32>) -> Result<Paged<Workspace>> {
        if let Ok(mut queries) = self.workspace_queries.lock() {
            queries.push(WorkspaceQuery {
                search: search.to_string(),
                page,
            });
        }
        let pagination = Pagination {
            current_page: page.unwrap_or(self.start_page),
            total_pages: self.total_pages,
            total_count: self.workspaces.len() as u32 * self.total_pages,
        };
        Ok(Paged::new(self.workspaces.clone(), pagination))
    }

    async fn read_workspace(&self, _organization: &str, name: &str) -> Result<Workspace> {
        if self.fail_workspace {
            bail!("workspace {} not found", name);
        }
        Ok(self.workspace.clone())
    }

    async fn list_workspace_variables(&self, _id: &str) -> Result<Vec<Variable>> {
        Ok(self.variables.clone())
    }

    async fn list_workspace_runs(&self, _id: &str) -> Result<Vec<Run>> {
        Ok(self.runs.clone())
    }

    async fn list_workspace_team_accesses(&self, _id: &str) -> Result<Vec<TeamAccess>> {
        Ok(self.accesses.clone())
    }

    async fn read_run(&self, id: &str) -> Result<Run> {
        match self.runs.iter().find(|r| r.id == id) {
            Some(run) => Ok(run.clone()),
            None => bail!("run {} not found", id),
        }
    }

    async fn read_plan(&self, _id: &str) -> Result<Plan> {
        Ok(self.plan.clone())
    }

    async fn read_plan_logs(&self, _id: &str) -> Result<String> {
        match &self.plan_log {
            Some(log) => Ok(log.clone()),
            None => bail!("plan log unavailable"),
        }
    }

    async fn read_apply_logs(&self, _id: &str) -> Result<String> {
        match &self.apply_log {
            Some(log) => Ok(log.clone()),
            None => bail!("apply log unavailable"),
        }
    }
}

pub fn organization(name: &str) -> Organization {
    Organization {
        name: name.to_string(),
        external_id: format!("org-{}", name),
        email: format!("admin@{}.example", name),
    }
}

pub fn workspace(name: &str) -> Workspace {
    Workspace {
        id: format!("ws-{}", name),
        name: name.to_string(),
        tag_names: vec!["prod".to_string()],
        terraform_version: "1.9.5".to_string(),
        resource_count: 12,
        ..Workspace::default()
    }
}

pub fn workspace_with_run(name: &str) -> Workspace {
    let mut current = run("run-1", "applied");
    current.created_by = Some("alice".to_string());
    current.plan = Some(Plan {
        id: "plan-1".to_string(),
        status: "finished".to_string(),
        resource_additions: 2,
        resource_changes: 1,
        resource_destructions: 0,
    });
    Workspace {
        runs_count: 2,
        current_run: Some(current),
        ..workspace(name)
    }
}

pub fn run(id: &str, status: &str) -> Run {
    Run {
        id: id.to_string(),
        message: format!("triggered {}", id),
        status: status.to_string(),
        source: "tfe-api".to_string(),
        plan_id: Some("plan-1".to_string()),
        apply_id: Some("apply-1".to_string()),
        ..Run::default()
    }
}

pub fn variable(key: &str, value: &str, sensitive: bool) -> Variable {
    Variable {
        id: format!("var-{}", key),
        key: key.to_string(),
        value: value.to_string(),
        category: "terraform".to_string(),
        sensitive,
    }
}

/// A controller over `api` with the given selection, not yet started.
pub fn controller(api: Arc<FakeTfe>, organization: &str, workspace: &str) -> PageController {
    let mut config = Config::in_memory();
    config.organization = organization.to_string();
    config.workspace = workspace.to_string();
    PageController::new(Context::new(config, api))
}

/// Wait for the next load to be applied.
pub async fn settle(controller: &mut PageController) {
    let applied = tokio::time::timeout(Duration::from_secs(5), controller.wait_for_load())
        .await
        .expect("load did not complete in time");
    assert!(applied, "load queue closed");
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn press(controller: &mut PageController, event: KeyEvent) {
    controller.handle_key(event).expect("key handling failed");
}

pub fn type_text(controller: &mut PageController, text: &str) {
    for c in text.chars() {
        press(controller, key(KeyCode::Char(c)));
    }
}

pub fn organizations_screen(controller: &PageController) -> &ListScreen<OrganizationSource> {
    match controller.screen(ScreenId::Organizations) {
        Some(Screen::Organizations(screen)) => screen,
        _ => panic!("organizations screen not registered"),
    }
}

pub fn workspaces_screen(controller: &PageController) -> &ListScreen<WorkspaceSource> {
    match controller.screen(ScreenId::Workspaces) {
        Some(Screen::Workspaces(screen)) => screen,
        _ => panic!("workspaces screen not registered"),
    }
}

pub fn workspace_screen(controller: &PageController) -> &WorkspaceScreen {
    match controller.screen(ScreenId::Workspace) {
        Some(Screen::Workspace(screen)) => screen,
        _ => panic!("workspace screen not registered"),
    }
}
