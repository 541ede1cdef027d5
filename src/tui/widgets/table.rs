use ratatui::{
    layout::{Constraint, Rect},
    text::Text,
    widgets::{Block, Cell, Row, Table, TableState},
    Frame,
};

use crate::tui::Theme;

/// Semantic coloring of a cell; the theme picks the actual color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellTone {
    #[default]
    Plain,
    Success,
    Warning,
    Error,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub tone: CellTone,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: CellTone::Plain,
        }
    }

    pub fn toned(text: impl Into<String>, tone: CellTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

impl From<String> for TableCell {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for TableCell {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Header + rows, filled by a list source and drawn by the list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableModel {
    header: Vec<(String, u16)>,
    rows: Vec<Vec<TableCell>>,
}

impl TableModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.header.clear();
        self.rows.clear();
    }

    /// Add a header column with a relative width.
    pub fn column(&mut self, title: impl Into<String>, weight: u16) {
        self.header.push((title.into(), weight));
    }

    pub fn push_row(&mut self, cells: Vec<TableCell>) {
        self.rows.push(cells);
    }

    pub fn header(&self) -> Vec<&str> {
        self.header.iter().map(|(title, _)| title.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<TableCell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        block: Block,
        selected: Option<usize>,
    ) {
        let header = Row::new(
            self.header
                .iter()
                .map(|(title, _)| Cell::from(title.as_str())),
        )
        .style(theme.table_header());

        let rows = self.rows.iter().map(|cells| {
            Row::new(cells.iter().map(|cell| {
                Cell::from(Text::from(cell.text.as_str())).style(theme.cell_style(cell.tone))
            }))
        });

        let widths: Vec<Constraint> = self
            .header
            .iter()
            .map(|(_, weight)| Constraint::Fill(*weight))
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .highlight_style(theme.selection())
            .column_spacing(2);

        let mut state = TableState::default().with_selected(selected);
        frame.render_stateful_widget(table, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_header_and_rows() {
        let mut table = TableModel::new();
        table.column("ID", 1);
        table.push_row(vec!["org-1".into()]);
        table.clear();

        assert!(table.header().is_empty());
        assert_eq!(table.row_count(), 0);
    }
}
