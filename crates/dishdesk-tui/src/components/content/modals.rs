//! Overlays drawn on top of the table panel:
//! - search bar (bottom line while searching or a search is active)
//! - filter column list and filter value input
//! - sort column list
//! - delete confirmation

use dishdesk_core::table::{ColumnKey, TableRow};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{InputMode, TablePanel};
use crate::components::modal_area::centered_fixed;
use crate::components::styles::{Palette, dim_style, input_text_style, key_style, selected_style};

impl<R: TableRow> TablePanel<R> {
    pub(super) fn shows_search_bar(&self) -> bool {
        self.input == InputMode::Search || !self.table.query().search_text().is_empty()
    }

    pub(super) fn render_search_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let editing = self.input == InputMode::Search;
        let text = if editing {
            format!("{}_", self.search_input)
        } else {
            self.table.query().search_text().to_string()
        };
        let hint = if editing {
            "  Enter: keep  Esc: clear"
        } else {
            "  /: edit"
        };
        let line = Line::from(vec![
            Span::styled(" / ", key_style(palette)),
            Span::styled(text, input_text_style(palette)),
            Span::styled(hint, dim_style(palette)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    pub(super) fn render_modals(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        if let Some(pending) = self.modal.pending() {
            self.render_delete_confirmation(frame, area, &pending.prompt(), palette);
            return;
        }
        match &self.input {
            InputMode::FilterColumn { selection } => {
                let keys = self.table.filter_keys();
                let items = keys
                    .iter()
                    .map(|key| (self.column_title(*key), self.table.query().filter(*key).is_some()))
                    .collect();
                render_column_list(frame, area, " Filter by Column ", items, *selection, "Enter: Next", palette);
            }
            InputMode::FilterValue { column, text } => {
                self.render_filter_input(frame, area, *column, text, palette);
            }
            InputMode::Sort { selection } => {
                let sorted = self.table.query().sort_column();
                let items = self
                    .table
                    .columns()
                    .sortable_keys()
                    .into_iter()
                    .map(|key| (self.column_title(key), sorted == Some(key)))
                    .collect();
                render_column_list(frame, area, " Sort by Column ", items, *selection, "Enter: Sort  x: Clear", palette);
            }
            InputMode::Normal | InputMode::Search => {}
        }
    }

    fn column_title(&self, key: R::Column) -> String {
        self.table
            .columns()
            .get(key)
            .map(|def| def.title.clone())
            .unwrap_or_else(|| key.as_str().to_string())
    }

    fn render_filter_input(&self, frame: &mut Frame, area: Rect, column: R::Column, text: &str, palette: &Palette) {
        let modal_area = centered_fixed(50, 6, area);
        frame.render_widget(Clear, modal_area);

        let lines = vec![
            Line::from(vec![
                Span::styled(" > ", key_style(palette)),
                Span::styled(format!("{}_", text), input_text_style(palette)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter", key_style(palette)),
                Span::styled(": Apply (empty clears)  ", dim_style(palette)),
                Span::styled("Esc", key_style(palette)),
                Span::styled(": Cancel", dim_style(palette)),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(modal_block(format!(" Filter: {} ", self.column_title(column)), palette))
            .style(Style::default().bg(palette.background));
        frame.render_widget(paragraph, modal_area);
    }

    fn render_delete_confirmation(&self, frame: &mut Frame, area: Rect, prompt: &str, palette: &Palette) {
        let modal_area = centered_fixed(56, 7, area);
        frame.render_widget(Clear, modal_area);

        let lines = vec![
            Line::from(Span::styled(
                prompt.to_string(),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", key_style(palette)),
                Span::styled(": Delete  ", dim_style(palette)),
                Span::styled("n/Esc", key_style(palette)),
                Span::styled(": Keep", dim_style(palette)),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Confirm Delete ")
                    .title_style(Style::default().fg(palette.error).add_modifier(Modifier::BOLD))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.error)),
            )
            .style(Style::default().bg(palette.background));
        frame.render_widget(paragraph, modal_area);
    }
}

fn modal_block(title: String, palette: &Palette) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(palette.modal).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.modal))
}

/// A column picker; `marked` entries are the active filter or sort columns.
fn render_column_list(
    frame: &mut Frame,
    area: Rect,
    title: &'static str,
    items: Vec<(String, bool)>,
    selection: usize,
    hint: &'static str,
    palette: &Palette,
) {
    let height = (items.len() as u16).saturating_add(3);
    let modal_area = centered_fixed(40, height, area);
    frame.render_widget(Clear, modal_area);

    let mut lines: Vec<Line> = items
        .into_iter()
        .enumerate()
        .map(|(i, (name, marked))| {
            let prefix = if i == selection { "► " } else { "  " };
            let marker = if marked { " ●" } else { "" };
            let style = if i == selection {
                selected_style(palette)
            } else if marked {
                Style::default().fg(palette.modal)
            } else {
                Style::default().fg(palette.text)
            };
            Line::from(Span::styled(format!("{}{}{}", prefix, name, marker), style))
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled(hint, key_style(palette)),
        Span::styled("  Esc: Cancel", dim_style(palette)),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(modal_block(title.to_string(), palette))
        .style(Style::default().bg(palette.background));
    frame.render_widget(paragraph, modal_area);
}
