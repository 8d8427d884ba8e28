//! Status bar component.
//!
//! Displays keybindings and status messages at the bottom of the screen.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Component;
use super::styles::{Palette, dim_style, key_style};

#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyBinding {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub struct StatusBar {
    message: String,
    bindings: Vec<KeyBinding>,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            message: String::new(),
            bindings: vec![
                KeyBinding::new("1-4", "Tab"),
                KeyBinding::new("/", "Search"),
                KeyBinding::new("f/s", "Filter/Sort"),
                KeyBinding::new("n/p", "Page"),
                KeyBinding::new("r", "Refresh"),
                KeyBinding::new("?", "Help"),
                KeyBinding::new("q", "Quit"),
            ],
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Component for StatusBar {
    fn draw(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let mut spans: Vec<Span> = Vec::new();

        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", dim_style(palette)));
            }
            spans.push(Span::styled(format!(" {} ", binding.key), key_style(palette)));
            spans.push(Span::styled(binding.action, Style::default().fg(palette.text)));
        }

        if !self.message.is_empty() {
            spans.push(Span::styled(" │ ", dim_style(palette)));
            spans.push(Span::styled(
                self.message.clone(),
                Style::default().fg(palette.success),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(dim_style(palette)),
        );

        frame.render_widget(paragraph, area);
    }
}
