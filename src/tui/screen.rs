use anyhow::{bail, Result};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use crate::api::{Organization, Paged, Workspace};
use crate::tui::apps::{
    HelpScreen, ListScreen, OrganizationSource, RunScreen, RunSnapshot, WorkspaceScreen,
    WorkspaceSnapshot, WorkspaceSource,
};
use crate::tui::command::Command;
use crate::tui::context::Context;
use crate::tui::keys::{KeyActionRegistry, KeyActions, ScreenAction};
use crate::tui::Theme;

/// Unique identifier for each screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Organizations,
    Workspaces,
    Workspace,
    Run,
    Help,
}

impl ScreenId {
    pub const ALL: [ScreenId; 5] = [
        ScreenId::Organizations,
        ScreenId::Workspaces,
        ScreenId::Workspace,
        ScreenId::Run,
        ScreenId::Help,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScreenId::Organizations => "organizations",
            ScreenId::Workspaces => "workspaces",
            ScreenId::Workspace => "workspace",
            ScreenId::Run => "run",
            ScreenId::Help => "help",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        match ScreenId::ALL.iter().find(|id| id.name() == wanted) {
            Some(id) => Ok(*id),
            None => bail!("unknown screen '{}'", s),
        }
    }
}

/// Result of a screen's fetch, handed back to the render thread.
pub enum Loaded {
    Organizations(Paged<Organization>),
    Workspaces(Paged<Workspace>),
    Workspace(Box<WorkspaceSnapshot>),
    Run(Box<RunSnapshot>),
    Nothing,
}

impl Loaded {
    pub fn kind(&self) -> &'static str {
        match self {
            Loaded::Organizations(_) => "organizations",
            Loaded::Workspaces(_) => "workspaces",
            Loaded::Workspace(_) => "workspace",
            Loaded::Run(_) => "run",
            Loaded::Nothing => "nothing",
        }
    }
}

/// A fetch running off the render thread. It owns everything it touches.
pub type LoadTask = Pin<Box<dyn Future<Output = Result<Loaded>> + Send>>;

pub fn ready(loaded: Loaded) -> LoadTask {
    Box::pin(async move { Ok(loaded) })
}

/// The contract every navigable screen fulfils.
///
/// `load` only builds the fetch; the controller runs it and passes the
/// outcome to `apply` and then `view` on the render thread.
pub trait Page {
    fn id(&self) -> ScreenId;

    fn load(&self, ctx: &Context) -> LoadTask;

    /// Store freshly fetched data.
    fn apply(&mut self, loaded: Loaded) -> Result<()>;

    /// Rebuild the view from stored data and return a status message.
    fn view(&mut self, keys: &KeyActionRegistry) -> String;

    fn bind_keys(&self) -> KeyActions;

    fn crumb(&self) -> Vec<String>;

    /// Static hint shown on the footer; empty means the default hint.
    fn footer(&self) -> &str {
        ""
    }

    fn handle_action(&mut self, action: ScreenAction, ctx: &mut Context) -> Command;

    /// Keys not claimed by the registry (text entry, scrolling, row movement).
    fn handle_input(&mut self, _key: KeyEvent, _ctx: &mut Context) -> Command {
        Command::PassThrough
    }

    /// True while a text input owns plain character keys.
    fn captures_input(&self) -> bool {
        false
    }

    /// Overlay matching the currently focused sub-widget, re-installed on activation.
    fn focus_overlay(&self) -> Option<(&'static str, KeyActions)> {
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

pub enum Screen {
    Organizations(ListScreen<OrganizationSource>),
    Workspaces(ListScreen<WorkspaceSource>),
    Workspace(WorkspaceScreen),
    Run(RunScreen),
    Help(HelpScreen),
}

impl Screen {
    /// Build a fresh screen for `id` from the current navigation.
    ///
    /// `return_to` is where Help goes back to.
    pub fn build(id: ScreenId, ctx: &Context, return_to: Option<ScreenId>) -> Result<Self> {
        let nav = &ctx.nav;
        let screen = match id {
            ScreenId::Organizations => Screen::Organizations(ListScreen::new(OrganizationSource::new())),
            ScreenId::Workspaces => {
                if nav.organization.is_empty() {
                    bail!("no organization selected");
                }
                Screen::Workspaces(ListScreen::new(WorkspaceSource::new(&nav.organization)))
            }
            ScreenId::Workspace => {
                if nav.workspace.is_empty() {
                    bail!("no workspace selected");
                }
                Screen::Workspace(WorkspaceScreen::new(
                    &nav.organization,
                    &nav.workspace,
                    ctx.config.workspace_show_vars,
                ))
            }
            ScreenId::Run => {
                if nav.run_id.is_empty() {
                    bail!("no run selected");
                }
                Screen::Run(RunScreen::new(&nav.organization, &nav.workspace, &nav.run_id))
            }
            ScreenId::Help => Screen::Help(HelpScreen::new(return_to)),
        };
        Ok(screen)
    }

    pub fn id(&self) -> ScreenId {
        self.page().id()
    }

    pub fn page(&self) -> &dyn Page {
        match self {
            Screen::Organizations(s) => s,
            Screen::Workspaces(s) => s,
            Screen::Workspace(s) => s,
            Screen::Run(s) => s,
            Screen::Help(s) => s,
        }
    }

    pub fn page_mut(&mut self) -> &mut dyn Page {
        match self {
            Screen::Organizations(s) => s,
            Screen::Workspaces(s) => s,
            Screen::Workspace(s) => s,
            Screen::Run(s) => s,
            Screen::Help(s) => s,
        }
    }
}
