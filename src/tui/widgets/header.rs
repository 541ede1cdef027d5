use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::Theme;

pub const LOGO: &str = "terrui";

/// Breadcrumb bar: the logo followed by the active screen's crumb.
#[derive(Debug, Clone)]
pub struct Header {
    breadcrumb: Vec<String>,
}

impl Header {
    pub fn new() -> Self {
        Self {
            breadcrumb: vec![LOGO.to_string()],
        }
    }

    pub fn set_crumb(&mut self, crumb: Vec<String>) {
        self.breadcrumb = std::iter::once(LOGO.to_string()).chain(crumb).collect();
    }

    /// Segments as displayed: lower-cased with spaces removed.
    pub fn segments(&self) -> Vec<String> {
        self.breadcrumb
            .iter()
            .map(|s| s.to_lowercase().replace(' ', ""))
            .collect()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let segments = self.segments();
        let last = segments.len().saturating_sub(1);

        let mut spans = vec![Span::raw(" ")];
        for (i, segment) in segments.iter().enumerate() {
            let style = if i == 0 {
                theme.crumb_logo()
            } else if i == last {
                theme.crumb_active()
            } else {
                theme.crumb_middle()
            };
            spans.push(Span::styled(format!(" <{}> ", segment), style));
            spans.push(Span::styled(" ", Style::default()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}
