use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::{Duration, Instant};

use crate::tui::Theme;

pub const DEFAULT_FOOTER: &str = "💡press ? for help";
pub const LOADING_TEXT: &str = "⏳ loading...";

/// How long a flashed message stays before the persistent text returns.
pub const FLASH_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterTone {
    Normal,
    Status,
    Error,
}

#[derive(Debug, Clone)]
struct Flash {
    text: String,
    tone: FooterTone,
    expires_at: Instant,
}

/// Status line: a persistent hint plus a transient flash that reverts on its own.
#[derive(Debug, Clone)]
pub struct Footer {
    text: String,
    flash: Option<Flash>,
}

impl Footer {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: initial.into(),
            flash: None,
        }
    }

    /// Replace the persistent text. Any pending flash is dropped.
    pub fn show_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.flash = None;
    }

    pub fn show(&mut self, text: impl Into<String>, tone: FooterTone) {
        self.show_at(text, tone, Instant::now());
    }

    pub fn show_at(&mut self, text: impl Into<String>, tone: FooterTone, now: Instant) {
        self.flash = Some(Flash {
            text: text.into(),
            tone,
            expires_at: now + FLASH_TIMEOUT,
        });
    }

    pub fn show_status(&mut self, text: impl Into<String>) {
        self.show(text, FooterTone::Status);
    }

    pub fn show_error(&mut self, text: impl AsRef<str>) {
        self.show(format!("ERROR: {}", text.as_ref()), FooterTone::Error);
    }

    pub fn show_loading(&mut self) {
        self.show(LOADING_TEXT, FooterTone::Status);
    }

    /// Expire the flash once its timeout has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.flash.as_ref().is_some_and(|f| now >= f.expires_at) {
            self.flash = None;
        }
    }

    /// What is on screen right now.
    pub fn current(&self) -> (&str, FooterTone) {
        match &self.flash {
            Some(flash) => (&flash.text, flash.tone),
            None => (&self.text, FooterTone::Normal),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (text, tone) = self.current();
        let line = Line::from(vec![Span::raw(" "), Span::styled(text, theme.footer_style(tone))]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Default for Footer {
    fn default() -> Self {
        Self::new(DEFAULT_FOOTER)
    }
}
