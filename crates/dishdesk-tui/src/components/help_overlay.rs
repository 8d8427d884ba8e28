//! Help overlay component.
//!
//! Displays a modal overlay showing all available keybindings.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::modal_area::centered_rect;
use super::styles::{Palette, border_style, dim_style, key_style, title_style};

pub struct HelpOverlay;

impl HelpOverlay {
    const GLOBAL_KEYS: &'static [(&'static str, &'static str)] = &[
        ("q / Ctrl+C", "Quit application"),
        ("1 2 3 4", "Orders, Foods, Categories, Customers"),
        ("Tab", "Next tab (Shift+Tab: previous)"),
        ("r", "Refresh data"),
        ("t", "Toggle light/dark theme"),
        ("?", "Toggle help"),
    ];

    const TABLE_KEYS: &'static [(&'static str, &'static str)] = &[
        ("↑ / k  ↓ / j", "Move selection"),
        ("/", "Search all columns"),
        ("f", "Filter by column"),
        ("s", "Sort by column (again to flip)"),
        ("c", "Clear search, filters and sort"),
        ("n / p", "Next / previous page"),
        ("g / G", "First / last page"),
        ("v", "Toggle virtualized scrolling"),
        ("d", "Delete selected (Foods, Categories)"),
    ];

    pub fn render(frame: &mut Frame, area: Rect, palette: &Palette) {
        let popup_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let mut lines: Vec<Line> = vec![Line::from("")];
        Self::push_section(&mut lines, "Global", Self::GLOBAL_KEYS, palette);
        lines.push(Line::from(""));
        Self::push_section(&mut lines, "Tables", Self::TABLE_KEYS, palette);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Press ? or Esc to close",
            dim_style(palette),
        )));

        let help_text = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Help ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(border_style(palette, true)),
            )
            .alignment(Alignment::Left);

        frame.render_widget(help_text, popup_area);
    }

    fn push_section(lines: &mut Vec<Line<'static>>, title: &'static str, keys: &[(&str, &str)], palette: &Palette) {
        lines.push(Line::from(Span::styled(format!("  {}", title), title_style(palette))));
        lines.push(Line::from("  ──────────────────────────────────"));
        for (key, action) in keys {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    format!("{:<16}", key),
                    key_style(palette).add_modifier(Modifier::BOLD),
                ),
                Span::raw(action.to_string()),
            ]));
        }
    }
}
