use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders},
    Frame,
};

use crate::tui::command::Command;
use crate::tui::context::Context;
use crate::tui::keys::{KeyActionRegistry, KeyActions, ScreenAction};
use crate::tui::screen::{ready, LoadTask, Loaded, Page, ScreenId};
use crate::tui::widgets::TableModel;
use crate::tui::Theme;

pub const HELP_FOOTER: &str = "💡press <esc> to go back";

/// Live listing of the key registry as it stood when help was opened.
pub struct HelpScreen {
    return_to: Option<ScreenId>,
    table: TableModel,
    selected: usize,
}

impl HelpScreen {
    pub fn new(return_to: Option<ScreenId>) -> Self {
        Self {
            return_to,
            table: TableModel::new(),
            selected: 0,
        }
    }

    pub fn return_to(&self) -> Option<ScreenId> {
        self.return_to
    }

    pub fn table(&self) -> &TableModel {
        &self.table
    }
}

impl Page for HelpScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Help
    }

    fn load(&self, _ctx: &Context) -> LoadTask {
        ready(Loaded::Nothing)
    }

    fn apply(&mut self, _loaded: Loaded) -> Result<()> {
        Ok(())
    }

    fn view(&mut self, keys: &KeyActionRegistry) -> String {
        self.table.clear();
        self.table.column("KEY", 1);
        self.table.column("ACTION", 2);

        for (key, action) in keys.entries() {
            if !action.visible {
                continue;
            }
            self.table.push_row(vec![key.to_string().into(), action.description.into()]);
        }
        self.selected = 0;

        String::new()
    }

    fn bind_keys(&self) -> KeyActions {
        KeyActions::new().with(KeyCode::Esc, "exit help", ScreenAction::ExitHelp)
    }

    fn crumb(&self) -> Vec<String> {
        vec!["help".to_string()]
    }

    fn footer(&self) -> &str {
        HELP_FOOTER
    }

    fn handle_action(&mut self, action: ScreenAction, ctx: &mut Context) -> Command {
        match action {
            ScreenAction::ExitHelp => {
                Command::ReturnTo(self.return_to.unwrap_or_else(|| ctx.startup_screen()))
            }
            _ => Command::PassThrough,
        }
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &mut Context) -> Command {
        let last = self.table.row_count().saturating_sub(1);
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.selected = (self.selected + 1).min(last),
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            _ => return Command::PassThrough,
        }
        Command::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border(true))
            .title(Span::styled(" help ", theme.title()));
        let selected = (self.table.row_count() > 0).then_some(self.selected);
        self.table.render(frame, area, theme, block, selected);
    }
}
