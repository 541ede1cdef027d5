use log::{debug, warn};
use std::sync::Arc;

use crate::api::TfeApi;
use crate::config::Config;
use crate::tui::screen::ScreenId;

/// What the user has drilled into so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    pub organization: String,
    pub workspace: String,
    pub run_id: String,
}

/// Everything a screen may read or change while handling an action.
///
/// Owned by the controller for the lifetime of the process and lent to
/// screens; selection changes are persisted to the config as they happen.
pub struct Context {
    pub config: Config,
    pub nav: Navigation,
    pub client: Arc<dyn TfeApi>,
}

impl Context {
    pub fn new(config: Config, client: Arc<dyn TfeApi>) -> Self {
        let nav = Navigation {
            organization: config.organization.clone(),
            workspace: config.workspace.clone(),
            run_id: String::new(),
        };

        Self { config, nav, client }
    }

    pub fn select_organization(&mut self, organization: impl Into<String>) {
        self.nav.organization = organization.into();
        self.nav.workspace.clear();
        self.nav.run_id.clear();
        self.persist();
    }

    pub fn clear_organization(&mut self) {
        self.select_organization(String::new());
    }

    pub fn select_workspace(&mut self, workspace: impl Into<String>) {
        self.nav.workspace = workspace.into();
        self.nav.run_id.clear();
        self.persist();
    }

    pub fn clear_workspace(&mut self) {
        self.select_workspace(String::new());
    }

    pub fn select_run(&mut self, run_id: impl Into<String>) {
        self.nav.run_id = run_id.into();
        self.persist();
    }

    pub fn clear_run(&mut self) {
        self.select_run(String::new());
    }

    /// The screen to open when nothing else was asked for.
    pub fn startup_screen(&self) -> ScreenId {
        if !self.nav.workspace.is_empty() {
            ScreenId::Workspace
        } else if !self.nav.organization.is_empty() {
            ScreenId::Workspaces
        } else {
            ScreenId::Organizations
        }
    }

    fn persist(&mut self) {
        self.config.organization = self.nav.organization.clone();
        self.config.workspace = self.nav.workspace.clone();

        match self.config.save() {
            Ok(()) => debug!(
                "Saved selection org='{}' workspace='{}'",
                self.config.organization, self.config.workspace
            ),
            Err(e) => warn!("Failed to save config: {:#}", e),
        }
    }
}
