use anyhow::{bail, Context as _, Result};
use crossterm::event::{KeyCode, KeyEvent};
use log::warn;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::api::{log_messages, Plan, Run};
use crate::tui::command::Command;
use crate::tui::context::Context;
use crate::tui::keys::{KeyActionRegistry, KeyActions, KeyBinding, ScreenAction};
use crate::tui::screen::{LoadTask, Loaded, Page, ScreenId};
use crate::tui::widgets::fields::{field_lines, fmt_time};
use crate::tui::Theme;

/// Log output of one run phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseLog {
    Lines(Vec<String>),
    Unavailable,
}

impl PhaseLog {
    fn lines(&self, phase: LogPane) -> Vec<String> {
        match self {
            PhaseLog::Lines(lines) => lines.clone(),
            PhaseLog::Unavailable => vec![format!("{} details could not be loaded!", phase.name())],
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub run: Run,
    pub plan: Plan,
    pub plan_log: PhaseLog,
    pub apply_log: PhaseLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogPane {
    Plan,
    Apply,
}

impl LogPane {
    pub fn name(&self) -> &'static str {
        match self {
            LogPane::Plan => "plan",
            LogPane::Apply => "apply",
        }
    }
}

pub fn run_fields(run: &Run, plan: &Plan) -> Vec<(&'static str, String)> {
    vec![
        ("ID", run.id.clone()),
        ("Message", run.message.clone()),
        ("Created At", fmt_time(run.created_at)),
        ("Source", run.source.clone()),
        ("Status", run.status.clone()),
        ("Auto Apply", run.auto_apply.to_string()),
        ("Is Destroy", run.is_destroy.to_string()),
        (
            "Plan",
            format!(
                "{} (+{} ~{} -{})",
                plan.status, plan.resource_additions, plan.resource_changes, plan.resource_destructions
            ),
        ),
    ]
}

async fn fetch_log(fetch: impl std::future::Future<Output = Result<String>>, phase: LogPane) -> PhaseLog {
    match fetch.await {
        Ok(raw) => PhaseLog::Lines(log_messages(&raw)),
        Err(e) => {
            warn!("Could not read {} logs: {:#}", phase.name(), e);
            PhaseLog::Unavailable
        }
    }
}

/// Run detail with its plan and apply logs.
pub struct RunScreen {
    organization: String,
    workspace: String,
    run_id: String,
    snapshot: Option<RunSnapshot>,
    details: Vec<(&'static str, String)>,
    plan_lines: Vec<String>,
    apply_lines: Vec<String>,
    focus: Option<LogPane>,
    scroll: [u16; 2],
}

impl RunScreen {
    pub fn new(organization: &str, workspace: &str, run_id: &str) -> Self {
        Self {
            organization: organization.to_string(),
            workspace: workspace.to_string(),
            run_id: run_id.to_string(),
            snapshot: None,
            details: Vec::new(),
            plan_lines: Vec::new(),
            apply_lines: Vec::new(),
            focus: None,
            scroll: [0, 0],
        }
    }

    pub fn snapshot(&self) -> Option<&RunSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn plan_lines(&self) -> &[String] {
        &self.plan_lines
    }

    pub fn apply_lines(&self) -> &[String] {
        &self.apply_lines
    }

    pub fn focus(&self) -> Option<LogPane> {
        self.focus
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            None => Some(LogPane::Plan),
            Some(LogPane::Plan) => Some(LogPane::Apply),
            Some(LogPane::Apply) => None,
        };
    }

    fn scroll_by(&mut self, pane: LogPane, delta: i32) {
        let len = match pane {
            LogPane::Plan => self.plan_lines.len(),
            LogPane::Apply => self.apply_lines.len(),
        };
        let max = len.saturating_sub(1).min(u16::MAX as usize) as i32;
        let slot = &mut self.scroll[pane as usize];
        *slot = (*slot as i32 + delta).clamp(0, max) as u16;
    }

    fn render_log(&self, frame: &mut Frame, area: Rect, theme: &Theme, pane: LogPane) {
        let focused = self.focus == Some(pane);
        let lines = match pane {
            LogPane::Plan => &self.plan_lines,
            LogPane::Apply => &self.apply_lines,
        };
        let text: Vec<Line> = lines.iter().map(|l| Line::raw(l.as_str())).collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if focused { BorderType::Thick } else { BorderType::Plain })
            .border_style(theme.border(focused))
            .title(ratatui::text::Span::styled(format!(" {} ", pane.name()), theme.title()));

        frame.render_widget(
            Paragraph::new(text)
                .block(block)
                .style(theme.cell_style(Default::default()))
                .scroll((self.scroll[pane as usize], 0)),
            area,
        );
    }
}

impl Page for RunScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Run
    }

    fn load(&self, ctx: &Context) -> LoadTask {
        let client = ctx.client.clone();
        let run_id = self.run_id.clone();

        Box::pin(async move {
            let run = client.read_run(&run_id).await.context("error reading the run")?;

            let Some(plan_id) = run.plan_id.clone() else {
                bail!("run {} has no plan", run.id);
            };
            let plan = client.read_plan(&plan_id).await.context("error reading the plan")?;

            let apply_logs = async {
                match &run.apply_id {
                    Some(apply_id) => client.read_apply_logs(apply_id).await,
                    None => bail!("run {} has no apply", run.id),
                }
            };
            let (plan_log, apply_log) = tokio::join!(
                fetch_log(client.read_plan_logs(&plan_id), LogPane::Plan),
                fetch_log(apply_logs, LogPane::Apply),
            );

            Ok(Loaded::Run(Box::new(RunSnapshot {
                run,
                plan,
                plan_log,
                apply_log,
            })))
        })
    }

    fn apply(&mut self, loaded: Loaded) -> Result<()> {
        match loaded {
            Loaded::Run(snapshot) => {
                self.snapshot = Some(*snapshot);
                self.scroll = [0, 0];
                Ok(())
            }
            other => bail!("run screen cannot show {}", other.kind()),
        }
    }

    fn view(&mut self, _keys: &KeyActionRegistry) -> String {
        let Some(snapshot) = &self.snapshot else {
            return String::new();
        };

        self.details = run_fields(&snapshot.run, &snapshot.plan);
        self.plan_lines = snapshot.plan_log.lines(LogPane::Plan);
        self.apply_lines = snapshot.apply_log.lines(LogPane::Apply);

        "run loaded".to_string()
    }

    fn bind_keys(&self) -> KeyActions {
        KeyActions::new()
            .with(KeyBinding::ctrl('w'), "go back to the workspace", ScreenAction::ReturnToWorkspace)
            .with(KeyCode::Tab, "focus plan and apply cells", ScreenAction::FocusNext)
    }

    fn crumb(&self) -> Vec<String> {
        vec![
            self.organization.clone(),
            self.workspace.clone(),
            "runs".to_string(),
            self.run_id.clone(),
        ]
    }

    fn handle_action(&mut self, action: ScreenAction, ctx: &mut Context) -> Command {
        match action {
            ScreenAction::ReturnToWorkspace => {
                ctx.clear_run();
                Command::navigate_to(ScreenId::Workspace)
            }
            ScreenAction::FocusNext => {
                self.focus_next();
                Command::None
            }
            _ => Command::PassThrough,
        }
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &mut Context) -> Command {
        let Some(pane) = self.focus else {
            return Command::PassThrough;
        };

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(pane, 1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(pane, -1),
            KeyCode::PageDown => self.scroll_by(pane, 20),
            KeyCode::PageUp => self.scroll_by(pane, -20),
            KeyCode::Home => self.scroll[pane as usize] = 0,
            KeyCode::End => self.scroll_by(pane, i32::MAX / 2),
            _ => return Command::PassThrough,
        }
        Command::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Ratio(1, 6), // Details
                Constraint::Ratio(5, 6), // Plan and apply
            ])
            .split(area);
        let logs = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let details = Paragraph::new(field_lines(&self.details, theme)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border(false))
                .title(ratatui::text::Span::styled(" run details ", theme.title())),
        );
        frame.render_widget(details, chunks[0]);

        self.render_log(frame, logs[0], theme, LogPane::Plan);
        self.render_log(frame, logs[1], theme, LogPane::Apply);
    }
}
