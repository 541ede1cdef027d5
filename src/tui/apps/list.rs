use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::command::Command;
use crate::tui::context::Context;
use crate::tui::keys::{KeyActionRegistry, KeyActions, KeyBinding, ScreenAction};
use crate::tui::screen::{LoadTask, Loaded, Page, ScreenId};
use crate::tui::widgets::TableModel;
use crate::tui::Theme;

/// The per-resource plug-in a `ListScreen` delegates fetching and rendering to.
pub trait ListSource {
    fn id(&self) -> ScreenId;

    /// Singular resource name, e.g. `workspace`.
    fn name(&self) -> &'static str;

    /// Plural resource name, e.g. `workspaces`.
    fn name_list(&self) -> &'static str;

    fn crumb(&self) -> Vec<String>;

    fn supports_search(&self) -> bool;

    /// Fetch one page matching `text`; `page` is `None` to let the server pick.
    fn search(&self, ctx: &Context, text: &str, page: Option<u32>) -> LoadTask;

    /// Take ownership of a finished fetch.
    fn accept(&mut self, loaded: Loaded) -> Result<()>;

    fn render_header(&self, table: &mut TableModel);

    fn render_rows(&self, table: &mut TableModel);

    fn empty(&self) -> bool;

    fn current_page(&self) -> u32;

    fn total_pages(&self) -> u32;

    fn total_count(&self) -> u32;

    /// Act on the item at `row` (zero based).
    fn select(&self, row: usize, ctx: &mut Context) -> Command;
}

/// Pagination and filter state of one list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCursor {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u32,
    /// Confirmed filter, used by every fetch
    pub search_text: String,
}

impl Default for ListCursor {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            search_text: String::new(),
        }
    }
}

impl ListCursor {
    /// The page after the current one, wrapping to the first.
    pub fn next_page(&self) -> u32 {
        let page = self.current_page + 1;
        if page > self.total_pages {
            1
        } else {
            page
        }
    }

    /// The page before the current one, wrapping to the last.
    pub fn prev_page(&self) -> u32 {
        if self.current_page <= 1 {
            self.total_pages.max(1)
        } else {
            self.current_page - 1
        }
    }
}

/// Generic paginated, searchable table screen.
pub struct ListScreen<S: ListSource> {
    source: S,
    cursor: ListCursor,
    table: TableModel,
    pagination: String,
    selected: usize,
    searching: bool,
    /// Text being typed; becomes the filter only when confirmed
    draft: String,
}

impl<S: ListSource> ListScreen<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cursor: ListCursor::default(),
            table: TableModel::new(),
            pagination: String::new(),
            selected: 0,
            searching: false,
            draft: String::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cursor(&self) -> &ListCursor {
        &self.cursor
    }

    pub fn table(&self) -> &TableModel {
        &self.table
    }

    pub fn pagination(&self) -> &str {
        &self.pagination
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    fn reload(&self, ctx: &Context, page: Option<u32>) -> Command {
        debug!(
            "Reloading {} (search='{}', page={:?})",
            self.source.name_list(),
            self.cursor.search_text,
            page
        );
        Command::Reload(self.source.search(ctx, &self.cursor.search_text, page))
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.table.row_count();
        if rows == 0 {
            self.selected = 0;
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, rows as isize - 1) as usize;
    }

    fn handle_search_input(&mut self, key: KeyEvent, ctx: &mut Context) -> Command {
        match key.code {
            KeyCode::Enter => {
                self.searching = false;
                self.cursor.search_text = std::mem::take(&mut self.draft);
                self.reload(ctx, None)
            }
            KeyCode::Esc => {
                // Abandon the draft, the confirmed filter stays
                self.searching = false;
                self.draft.clear();
                Command::None
            }
            KeyCode::Backspace => {
                self.draft.pop();
                Command::None
            }
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.draft.push(c);
                Command::None
            }
            _ => Command::None,
        }
    }
}

impl<S: ListSource> Page for ListScreen<S> {
    fn id(&self) -> ScreenId {
        self.source.id()
    }

    fn load(&self, ctx: &Context) -> LoadTask {
        self.source.search(ctx, "", None)
    }

    fn apply(&mut self, loaded: Loaded) -> Result<()> {
        self.source.accept(loaded)?;
        self.cursor.current_page = self.source.current_page();
        self.cursor.total_pages = self.source.total_pages();
        self.cursor.total_count = self.source.total_count();
        Ok(())
    }

    fn view(&mut self, _keys: &KeyActionRegistry) -> String {
        self.table.clear();
        self.source.render_header(&mut self.table);

        if self.source.empty() {
            self.selected = 0;
            self.pagination.clear();
            return format!("no {} found", self.source.name_list());
        }

        self.source.render_rows(&mut self.table);
        self.move_selection(0);

        self.pagination = format!(
            "page {} of {}, total {}: {}",
            self.cursor.current_page,
            self.cursor.total_pages,
            self.source.name_list(),
            self.cursor.total_count
        );

        format!("{} loaded", self.source.name_list())
    }

    fn bind_keys(&self) -> KeyActions {
        let mut actions = KeyActions::new()
            .with(
                KeyCode::Enter,
                format!("select {}", self.source.name()),
                ScreenAction::Select,
            )
            .with(KeyBinding::ctrl('j'), "next page", ScreenAction::NextPage)
            .with(KeyBinding::ctrl('k'), "previous page", ScreenAction::PrevPage);

        if self.source.supports_search() {
            actions.add(
                KeyActions::new()
                    .with(
                        KeyCode::Char('/'),
                        format!("search {}", self.source.name_list()),
                        ScreenAction::Search,
                    )
                    .with(
                        KeyCode::Esc,
                        "cancel search if search results are active",
                        ScreenAction::CancelSearch,
                    ),
            );
        }

        actions
    }

    fn crumb(&self) -> Vec<String> {
        self.source.crumb()
    }

    fn handle_action(&mut self, action: ScreenAction, ctx: &mut Context) -> Command {
        match action {
            ScreenAction::Select => {
                // Enter belongs to the search input while it is being edited
                if self.searching {
                    return Command::PassThrough;
                }
                if self.source.empty() {
                    return Command::None;
                }
                self.source.select(self.selected, ctx)
            }
            // Paging is suspended while the search input is open
            ScreenAction::NextPage | ScreenAction::PrevPage if self.searching => Command::None,
            ScreenAction::NextPage => self.reload(ctx, Some(self.cursor.next_page())),
            ScreenAction::PrevPage => self.reload(ctx, Some(self.cursor.prev_page())),
            ScreenAction::Search => {
                if !self.source.supports_search() {
                    return Command::PassThrough;
                }
                self.searching = true;
                self.draft = self.cursor.search_text.clone();
                Command::None
            }
            ScreenAction::CancelSearch => {
                if self.searching || self.cursor.search_text.is_empty() {
                    return Command::PassThrough;
                }
                self.searching = false;
                self.cursor.search_text.clear();
                self.reload(ctx, None)
            }
            _ => Command::PassThrough,
        }
    }

    fn handle_input(&mut self, key: KeyEvent, ctx: &mut Context) -> Command {
        if self.searching {
            return self.handle_search_input(key, ctx);
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.table.row_count().saturating_sub(1)
            }
            _ => return Command::PassThrough,
        }
        Command::None
    }

    fn captures_input(&self) -> bool {
        self.searching
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Search input and pagination
                Constraint::Min(3),    // Table
            ])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);

        let search = if self.searching {
            Line::from(vec![
                Span::raw("🔎 "),
                Span::styled(format!("{}▏", self.draft), theme.input_active()),
            ])
        } else if !self.cursor.search_text.is_empty() {
            Line::from(vec![
                Span::styled("filter: ", theme.secondary()),
                Span::raw(self.cursor.search_text.clone()),
            ])
        } else {
            Line::default()
        };
        frame.render_widget(Paragraph::new(search), top[0]);

        frame.render_widget(
            Paragraph::new(self.pagination.as_str())
                .style(theme.secondary())
                .alignment(Alignment::Right),
            top[1],
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border(!self.searching))
            .title(Span::styled(format!(" {} ", self.source.name_list()), theme.title()));
        let selected = (self.table.row_count() > 0).then_some(self.selected);
        self.table.render(frame, chunks[1], theme, block, selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(current_page: u32, total_pages: u32) -> ListCursor {
        ListCursor {
            current_page,
            total_pages,
            ..ListCursor::default()
        }
    }

    #[test]
    fn test_next_page_wraps_to_first() {
        for total in 1..=6 {
            assert_eq!(cursor(total, total).next_page(), 1);
        }
        assert_eq!(cursor(3, 5).next_page(), 4);
    }

    #[test]
    fn test_prev_page_wraps_to_last() {
        for total in 1..=6 {
            assert_eq!(cursor(1, total).prev_page(), total);
        }
        assert_eq!(cursor(3, 5).prev_page(), 2);
    }

    #[test]
    fn test_walk_from_page_three_of_five() {
        let mut c = cursor(3, 5);
        let mut visited = Vec::new();
        for _ in 0..3 {
            c.current_page = c.next_page();
            visited.push(c.current_page);
        }
        assert_eq!(visited, vec![4, 5, 1]);
    }
}
