use anyhow::{bail, Context as _, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::api::{Run, TeamAccess, Variable, Workspace};
use crate::tui::command::Command;
use crate::tui::context::Context;
use crate::tui::keys::{KeyActionRegistry, KeyActions, KeyBinding, ScreenAction};
use crate::tui::screen::{LoadTask, Loaded, Page, ScreenId};
use crate::tui::widgets::fields::{field_lines, fmt_duration_ms, fmt_time, run_status_icon};
use crate::tui::Theme;

/// Maximum number of variables and runs listed.
pub const MAX_LISTED: usize = 10;

pub const RUNS_SCOPE: &str = "runs";
pub const VARIABLES_SCOPE: &str = "variables";

const SENSITIVE_MASK: &str = "******";

/// Everything the workspace screen shows, fetched in one go.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceSnapshot {
    pub workspace: Workspace,
    pub variables: Vec<Variable>,
    pub runs: Vec<Run>,
    pub accesses: Vec<TeamAccess>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Details,
    Tags,
    Accesses,
    Variables,
    Runs,
}

impl Section {
    fn overlay(&self) -> Option<(&'static str, KeyActions)> {
        match self {
            Section::Runs => Some((
                RUNS_SCOPE,
                KeyActions::new().with(KeyCode::Enter, "select run", ScreenAction::ShowRun),
            )),
            Section::Variables => Some((
                VARIABLES_SCOPE,
                KeyActions::new().with(KeyCode::Enter, "show variable", ScreenAction::ShowVariable),
            )),
            _ => None,
        }
    }
}

/// A two-line list entry: main text plus a dimmed detail line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub main: String,
    pub secondary: String,
}

pub fn details_fields(ws: &Workspace) -> Vec<(&'static str, String)> {
    vec![
        ("ID", ws.id.clone()),
        ("Name", ws.name.clone()),
        ("Description", ws.description.clone()),
        ("Resource Count", ws.resource_count.to_string()),
        ("Terraform Version", ws.terraform_version.clone()),
        ("Updated", fmt_time(ws.updated_at)),
        ("Locked", ws.locked.to_string()),
        ("Working Directory", ws.working_directory.clone()),
        ("Execution Mode", ws.execution_mode.clone()),
        ("Auto Apply", ws.auto_apply.to_string()),
    ]
}

/// Summary of the current run; all fields stay empty/zero when there is none.
pub fn last_run_fields(ws: &Workspace) -> Vec<(&'static str, String)> {
    let run = ws.current_run.as_ref();
    let plan = run.and_then(|r| r.plan.as_ref());

    let by = run.and_then(|r| r.created_by.clone()).unwrap_or_default();
    let when = match run {
        Some(r) if r.created_by.is_some() => fmt_time(r.created_at),
        _ => String::new(),
    };

    vec![
        ("By", by),
        ("When", when),
        ("Status", run.map(|r| r.status.clone()).unwrap_or_default()),
        ("Resources Added", plan.map_or(0, |p| p.resource_additions).to_string()),
        ("Resources Updated", plan.map_or(0, |p| p.resource_changes).to_string()),
        ("Resources Deleted", plan.map_or(0, |p| p.resource_destructions).to_string()),
    ]
}

pub fn metrics_fields(ws: &Workspace) -> Vec<(&'static str, String)> {
    vec![
        ("Average Apply Duration", fmt_duration_ms(ws.apply_duration_average)),
        ("Average Plan Duration", fmt_duration_ms(ws.plan_duration_average)),
        ("Total Failed Runs", ws.run_failures.to_string()),
    ]
}

pub fn variable_entries(variables: &[Variable]) -> Vec<ListEntry> {
    variables
        .iter()
        .take(MAX_LISTED)
        .map(|v| {
            let value = if v.sensitive { SENSITIVE_MASK } else { v.value.as_str() };
            let mut secondary = v.category.clone();
            if v.sensitive {
                secondary.push_str(", sensitive");
            }
            ListEntry {
                main: format!("{} = {}", v.key, value),
                secondary,
            }
        })
        .collect()
}

pub fn run_entries(runs: &[Run]) -> Vec<ListEntry> {
    runs.iter()
        .take(MAX_LISTED)
        .map(|r| {
            let mut secondary = r.id.clone();
            if let Some(by) = &r.created_by {
                secondary.push_str(&format!(" | {}", by));
            }
            if r.is_destroy {
                secondary.push_str(" | destroy run 💣");
            }
            secondary.push_str(&format!(" | {}", fmt_time(r.created_at)));

            ListEntry {
                main: format!("{} · {}{}", r.message, run_status_icon(&r.status), r.status),
                secondary,
            }
        })
        .collect()
}

/// Precomputed panel contents, rebuilt on every view.
#[derive(Debug, Clone, Default)]
struct Panels {
    details: Vec<(&'static str, String)>,
    tags: Vec<String>,
    accesses: Vec<ListEntry>,
    last_run: Vec<(&'static str, String)>,
    metrics: Vec<(&'static str, String)>,
    metrics_title: String,
    variables: Vec<ListEntry>,
    runs: Vec<ListEntry>,
}

/// Workspace detail: details, tags, accesses, last run, metrics and (optionally)
/// recent variables and runs.
pub struct WorkspaceScreen {
    organization: String,
    workspace: String,
    show_variables: bool,
    snapshot: Option<WorkspaceSnapshot>,
    panels: Option<Panels>,
    focus: Option<Section>,
    selected_tag: usize,
    selected_access: usize,
    selected_variable: usize,
    selected_run: usize,
}

impl WorkspaceScreen {
    pub fn new(organization: &str, workspace: &str, show_variables: bool) -> Self {
        Self {
            organization: organization.to_string(),
            workspace: workspace.to_string(),
            show_variables,
            snapshot: None,
            panels: None,
            focus: None,
            selected_tag: 0,
            selected_access: 0,
            selected_variable: 0,
            selected_run: 0,
        }
    }

    pub fn snapshot(&self) -> Option<&WorkspaceSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn focus(&self) -> Option<Section> {
        self.focus
    }

    pub fn selected_run(&self) -> usize {
        self.selected_run
    }

    /// Focusable sections in Tab order.
    pub fn sections(&self) -> Vec<Section> {
        let mut sections = vec![Section::Details, Section::Tags, Section::Accesses];
        if self.show_variables {
            sections.extend([Section::Variables, Section::Runs]);
        }
        sections
    }

    /// Move focus to the next section; past the last one focus returns to the screen.
    fn focus_next(&mut self) -> Command {
        let sections = self.sections();
        let next = match self.focus {
            None => sections.first().copied(),
            Some(current) => sections
                .iter()
                .position(|s| *s == current)
                .and_then(|i| sections.get(i + 1).copied()),
        };

        let mut commands = Vec::new();
        if let Some((scope, _)) = self.focus.and_then(|s| s.overlay()) {
            commands.push(Command::PopKeys(scope));
        }
        self.focus = next;
        if let Some((scope, actions)) = self.focus_overlay() {
            commands.push(Command::PushKeys { scope, actions });
        }

        Command::batch(commands)
    }

    fn list_len(&self, section: Section) -> usize {
        let Some(snapshot) = &self.snapshot else {
            return 0;
        };
        match section {
            Section::Details => 0,
            Section::Tags => snapshot.workspace.tag_names.len(),
            Section::Accesses => snapshot.accesses.len(),
            Section::Variables => snapshot.variables.len().min(MAX_LISTED),
            Section::Runs => snapshot.runs.len().min(MAX_LISTED),
        }
    }

    fn selection_mut(&mut self, section: Section) -> Option<&mut usize> {
        match section {
            Section::Details => None,
            Section::Tags => Some(&mut self.selected_tag),
            Section::Accesses => Some(&mut self.selected_access),
            Section::Variables => Some(&mut self.selected_variable),
            Section::Runs => Some(&mut self.selected_run),
        }
    }

    /// Move within the focused list, wrapping around at both ends.
    fn move_selection(&mut self, section: Section, delta: isize) {
        let len = self.list_len(section) as isize;
        if let Some(selected) = self.selection_mut(section) {
            if len > 0 {
                *selected = (*selected as isize + delta).rem_euclid(len) as usize;
            }
        }
    }

    fn jump_to(&mut self, section: Section, index: usize) {
        let len = self.list_len(section);
        if let Some(selected) = self.selection_mut(section) {
            if index < len {
                *selected = index;
            }
        }
    }

    fn show_run(&self, ctx: &mut Context) -> Command {
        let run = self
            .snapshot
            .as_ref()
            .and_then(|s| s.runs.get(self.selected_run));
        match run {
            Some(run) => {
                ctx.select_run(run.id.clone());
                Command::navigate_to(ScreenId::Run)
            }
            None => Command::notify("no run selected"),
        }
    }

    fn show_variable(&self) -> Command {
        let variable = self
            .snapshot
            .as_ref()
            .and_then(|s| s.variables.get(self.selected_variable));
        match variable {
            Some(v) => {
                let value = if v.sensitive { SENSITIVE_MASK } else { v.value.as_str() };
                Command::notify(format!("{} = {} ({})", v.key, value, v.category))
            }
            None => Command::notify("no variable selected"),
        }
    }

    fn render_fields(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        title: &str,
        fields: &[(&str, String)],
        section: Option<Section>,
    ) {
        let focused = section.is_some() && self.focus == section;
        let paragraph = Paragraph::new(field_lines(fields, theme)).block(panel(title, focused, theme));
        frame.render_widget(paragraph, area);
    }

    #[allow(clippy::too_many_arguments)]
    fn render_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        title: &str,
        entries: &[ListEntry],
        section: Section,
        selected: usize,
        shortcuts: bool,
    ) {
        let focused = self.focus == Some(section);
        let items: Vec<ListItem> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut main = Vec::new();
                if shortcuts {
                    main.push(Span::styled(format!("({}) ", i), theme.field_key()));
                }
                main.push(Span::styled(
                    entry.main.clone(),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ));

                let mut lines = vec![Line::from(main)];
                if !entry.secondary.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("    {}", entry.secondary),
                        theme.secondary(),
                    )));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(panel(title, focused, theme))
            .highlight_style(theme.selection());

        let mut state = ListState::default();
        if focused && !entries.is_empty() {
            state.select(Some(selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn panel<'a>(title: &str, focused: bool, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Thick } else { BorderType::Plain })
        .border_style(theme.border(focused))
        .title(Span::styled(format!(" {} ", title), theme.title()))
}

impl Page for WorkspaceScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Workspace
    }

    fn load(&self, ctx: &Context) -> LoadTask {
        let client = ctx.client.clone();
        let organization = self.organization.clone();
        let name = self.workspace.clone();

        Box::pin(async move {
            let workspace = client
                .read_workspace(&organization, &name)
                .await
                .context("error reading the workspace")?;

            let (variables, runs, accesses) = tokio::try_join!(
                async {
                    client
                        .list_workspace_variables(&workspace.id)
                        .await
                        .context("error reading the workspace variables")
                },
                async {
                    client
                        .list_workspace_runs(&workspace.id)
                        .await
                        .context("error reading the workspace runs")
                },
                async {
                    client
                        .list_workspace_team_accesses(&workspace.id)
                        .await
                        .context("error reading the workspace accesses")
                },
            )?;

            Ok(Loaded::Workspace(Box::new(WorkspaceSnapshot {
                workspace,
                variables,
                runs,
                accesses,
            })))
        })
    }

    fn apply(&mut self, loaded: Loaded) -> Result<()> {
        match loaded {
            Loaded::Workspace(snapshot) => {
                self.snapshot = Some(*snapshot);
                self.selected_tag = 0;
                self.selected_access = 0;
                self.selected_variable = 0;
                self.selected_run = 0;
                Ok(())
            }
            other => bail!("workspace screen cannot show {}", other.kind()),
        }
    }

    fn view(&mut self, _keys: &KeyActionRegistry) -> String {
        let Some(snapshot) = &self.snapshot else {
            self.panels = None;
            return String::new();
        };
        let ws = &snapshot.workspace;

        self.panels = Some(Panels {
            details: details_fields(ws),
            tags: ws.tag_names.clone(),
            accesses: snapshot
                .accesses
                .iter()
                .map(|a| ListEntry {
                    main: a.team_name.clone(),
                    secondary: a.access.clone(),
                })
                .collect(),
            last_run: last_run_fields(ws),
            metrics: metrics_fields(ws),
            metrics_title: format!("metrics (last {} runs)", ws.runs_count),
            variables: variable_entries(&snapshot.variables),
            runs: run_entries(&snapshot.runs),
        });

        "workspace loaded".to_string()
    }

    fn bind_keys(&self) -> KeyActions {
        KeyActions::new()
            .with(KeyBinding::ctrl('l'), "list workspaces", ScreenAction::ListWorkspaces)
            .with(KeyCode::Tab, "focus next section", ScreenAction::FocusNext)
    }

    fn crumb(&self) -> Vec<String> {
        vec![self.organization.clone(), self.workspace.clone()]
    }

    fn handle_action(&mut self, action: ScreenAction, ctx: &mut Context) -> Command {
        match action {
            ScreenAction::ListWorkspaces => {
                ctx.clear_workspace();
                Command::navigate_to(ScreenId::Workspaces)
            }
            ScreenAction::FocusNext => self.focus_next(),
            ScreenAction::ShowRun => self.show_run(ctx),
            ScreenAction::ShowVariable => self.show_variable(),
            _ => Command::PassThrough,
        }
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &mut Context) -> Command {
        let Some(section) = self.focus else {
            return Command::PassThrough;
        };

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(section, 1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(section, -1),
            KeyCode::Char(c @ '0'..='9')
                if matches!(section, Section::Variables | Section::Runs) =>
            {
                self.jump_to(section, (c as u8 - b'0') as usize)
            }
            _ => return Command::PassThrough,
        }
        Command::None
    }

    fn focus_overlay(&self) -> Option<(&'static str, KeyActions)> {
        self.focus.and_then(|s| s.overlay())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(panels) = self.panels.clone() else {
            frame.render_widget(Paragraph::new("").block(panel("workspace", false, theme)), area);
            return;
        };

        let columns = if self.show_variables {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area)
        } else {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(100)])
                .split(area)
        };

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Ratio(2, 4), // Details
                Constraint::Ratio(1, 4), // Tags and accesses
                Constraint::Ratio(1, 4), // Last run and metrics
            ])
            .split(columns[0]);
        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(left[1]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(left[2]);

        self.render_fields(frame, left[0], theme, "workspace details", &panels.details, Some(Section::Details));

        let tags: Vec<ListEntry> = panels
            .tags
            .iter()
            .map(|t| ListEntry {
                main: t.clone(),
                secondary: String::new(),
            })
            .collect();
        self.render_list(frame, middle[0], theme, "tags", &tags, Section::Tags, self.selected_tag, false);
        self.render_list(
            frame,
            middle[1],
            theme,
            "accesses",
            &panels.accesses,
            Section::Accesses,
            self.selected_access,
            false,
        );

        self.render_fields(frame, bottom[0], theme, "last run", &panels.last_run, None);
        self.render_fields(frame, bottom[1], theme, &panels.metrics_title, &panels.metrics, None);

        if self.show_variables {
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(columns[1]);
            self.render_list(
                frame,
                right[0],
                theme,
                "variables (most recent)",
                &panels.variables,
                Section::Variables,
                self.selected_variable,
                true,
            );
            self.render_list(
                frame,
                right[1],
                theme,
                "runs (most recent)",
                &panels.runs,
                Section::Runs,
                self.selected_run,
                true,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Plan;

    fn variable(key: &str, value: &str, sensitive: bool) -> Variable {
        Variable {
            id: format!("var-{}", key),
            key: key.into(),
            value: value.into(),
            category: "terraform".into(),
            sensitive,
        }
    }

    #[test]
    fn test_last_run_without_current_run_is_zeroed() {
        let fields = last_run_fields(&Workspace::default());
        assert_eq!(
            fields,
            vec![
                ("By", String::new()),
                ("When", String::new()),
                ("Status", String::new()),
                ("Resources Added", "0".to_string()),
                ("Resources Updated", "0".to_string()),
                ("Resources Deleted", "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_last_run_reads_plan_counts() {
        let ws = Workspace {
            current_run: Some(Run {
                status: "applied".into(),
                plan: Some(Plan {
                    resource_additions: 3,
                    resource_changes: 2,
                    resource_destructions: 1,
                    ..Plan::default()
                }),
                ..Run::default()
            }),
            ..Workspace::default()
        };

        let fields = last_run_fields(&ws);
        assert_eq!(fields[2], ("Status", "applied".to_string()));
        assert_eq!(fields[3].1, "3");
        assert_eq!(fields[5].1, "1");
    }

    #[test]
    fn test_sensitive_variables_are_masked() {
        let entries = variable_entries(&[variable("region", "eu-west-1", false), variable("token", "s3cr3t", true)]);
        assert_eq!(entries[0].main, "region = eu-west-1");
        assert_eq!(entries[1].main, "token = ******");
        assert_eq!(entries[1].secondary, "terraform, sensitive");
    }

    #[test]
    fn test_lists_are_capped() {
        let variables: Vec<_> = (0..15).map(|i| variable(&format!("k{}", i), "v", false)).collect();
        assert_eq!(variable_entries(&variables).len(), MAX_LISTED);

        let runs: Vec<_> = (0..12)
            .map(|i| Run {
                id: format!("run-{}", i),
                ..Run::default()
            })
            .collect();
        assert_eq!(run_entries(&runs).len(), MAX_LISTED);
    }

    #[test]
    fn test_focus_cycle_without_variables() {
        let mut screen = WorkspaceScreen::new("acme", "networking", false);
        let mut seen = Vec::new();
        for _ in 0..4 {
            let _ = screen.focus_next();
            seen.push(screen.focus());
        }
        assert_eq!(
            seen,
            vec![Some(Section::Details), Some(Section::Tags), Some(Section::Accesses), None]
        );
    }

    #[test]
    fn test_runs_focus_pushes_and_pops_overlay() {
        let mut screen = WorkspaceScreen::new("acme", "networking", true);
        for _ in 0..4 {
            let _ = screen.focus_next();
        }
        assert_eq!(screen.focus(), Some(Section::Variables));
        assert_eq!(screen.focus_overlay().map(|(scope, _)| scope), Some(VARIABLES_SCOPE));

        match screen.focus_next() {
            Command::Batch(commands) => assert!(matches!(
                commands.as_slice(),
                [Command::PopKeys(VARIABLES_SCOPE), Command::PushKeys { scope: RUNS_SCOPE, .. }]
            )),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(screen.focus(), Some(Section::Runs));
        assert_eq!(screen.focus_overlay().map(|(scope, _)| scope), Some(RUNS_SCOPE));

        match screen.focus_next() {
            Command::Batch(commands) => {
                assert!(matches!(commands.as_slice(), [Command::PopKeys(RUNS_SCOPE)]));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(screen.focus(), None);
    }
}
