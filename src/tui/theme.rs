//! Theme and styling definitions
//!
//! Centralized colors for the TUI panes.

use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,
    pub text_primary: Color,
    pub text_label: Color,
    pub list_selected_fg: Color,
    pub list_selected_bg: Color,
    pub tab_selected: Color,
    pub event_warning: Color,
    pub status_error: Color,
    pub footer_key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            title: Color::White,
            text_primary: Color::Gray,
            text_label: Color::Blue,
            list_selected_fg: Color::Black,
            list_selected_bg: Color::Cyan,
            tab_selected: Color::Green,
            event_warning: Color::Red,
            status_error: Color::Red,
            footer_key: Color::Yellow,
        }
    }
}

impl Theme {
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.list_selected_fg)
            .bg(self.list_selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }
}
