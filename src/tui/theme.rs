/*
Catppuccin Color Palette

Mocha
Rosewater,f5e0dc
Red,f38ba8
Peach,fab387
Yellow,f9e2af
Green,a6e3a1
Teal,94e2d5
Blue,89b4fa
Lavender,b4befe
Mauve,cba6f7
Text,cdd6f4
Subtext 1,bac2de
Subtext 0,a6adc8
Overlay 1,7f849c
Surface 2,585b70
Surface 1,45475a
Surface 0,313244
Base,1e1e2e
Crust,11111b

*/

use ratatui::style::{Color, Modifier, Style};

use crate::tui::widgets::footer::FooterTone;
use crate::tui::widgets::table::CellTone;

/// The subset of the Catppuccin palette the screens draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    pub rosewater: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub teal: Color,
    pub blue: Color,
    pub lavender: Color,
    pub mauve: Color,
    pub text: Color,
    pub subtext1: Color,
    pub subtext0: Color,
    pub overlay1: Color,
    pub surface2: Color,
    pub surface1: Color,
    pub surface0: Color,
    pub base: Color,
    pub crust: Color,
}

impl Theme {
    fn mocha() -> Self {
        Self {
            rosewater: Color::Rgb(0xf5, 0xe0, 0xdc),
            red: Color::Rgb(0xf3, 0x8b, 0xa8),
            peach: Color::Rgb(0xfa, 0xb3, 0x87),
            yellow: Color::Rgb(0xf9, 0xe2, 0xaf),
            green: Color::Rgb(0xa6, 0xe3, 0xa1),
            teal: Color::Rgb(0x94, 0xe2, 0xd5),
            blue: Color::Rgb(0x89, 0xb4, 0xfa),
            lavender: Color::Rgb(0xb4, 0xbe, 0xfe),
            mauve: Color::Rgb(0xcb, 0xa6, 0xf7),
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            subtext1: Color::Rgb(0xba, 0xc2, 0xde),
            subtext0: Color::Rgb(0xa6, 0xad, 0xc8),
            overlay1: Color::Rgb(0x7f, 0x84, 0x9c),
            surface2: Color::Rgb(0x58, 0x5b, 0x70),
            surface1: Color::Rgb(0x45, 0x47, 0x5a),
            surface0: Color::Rgb(0x31, 0x32, 0x44),
            base: Color::Rgb(0x1e, 0x1e, 0x2e),
            crust: Color::Rgb(0x11, 0x11, 0x1b),
        }
    }

    /// First breadcrumb segment (the logo).
    pub fn crumb_logo(&self) -> Style {
        Style::default().fg(self.crust).bg(self.red).add_modifier(Modifier::BOLD)
    }

    pub fn crumb_middle(&self) -> Style {
        Style::default().fg(self.crust).bg(self.yellow).add_modifier(Modifier::BOLD)
    }

    /// Last breadcrumb segment (the active screen).
    pub fn crumb_active(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface1).add_modifier(Modifier::BOLD)
    }

    pub fn footer_style(&self, tone: FooterTone) -> Style {
        match tone {
            FooterTone::Normal => Style::default().fg(self.subtext0),
            FooterTone::Status => Style::default().fg(self.teal),
            FooterTone::Error => Style::default().fg(self.peach),
        }
    }

    pub fn cell_style(&self, tone: CellTone) -> Style {
        match tone {
            CellTone::Plain => Style::default().fg(self.text),
            CellTone::Success => Style::default().fg(self.green),
            CellTone::Warning => Style::default().fg(self.yellow),
            CellTone::Error => Style::default().fg(self.red),
            CellTone::Muted => Style::default().fg(self.overlay1),
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.lavender)
        } else {
            Style::default().fg(self.surface2)
        }
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.subtext1).add_modifier(Modifier::BOLD)
    }

    pub fn field_key(&self) -> Style {
        Style::default().fg(self.blue)
    }

    pub fn field_value(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn table_header(&self) -> Style {
        Style::default().fg(self.mauve).add_modifier(Modifier::BOLD)
    }

    pub fn selection(&self) -> Style {
        Style::default().bg(self.surface0).fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.overlay1)
    }

    /// Search input while it is being edited.
    pub fn input_active(&self) -> Style {
        Style::default().bg(self.surface0).fg(self.rosewater)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}
