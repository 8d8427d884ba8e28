//! Key handling for the table panel, one function per input mode.

use crossterm::event::{KeyCode, KeyEvent};
use dishdesk_core::table::{ColumnKey, RowKey, TableRow};

use super::{InputMode, PanelOutcome, TablePanel};

impl<R: TableRow> TablePanel<R> {
    pub fn handle_key(&mut self, key: KeyEvent) -> PanelOutcome {
        if self.modal.is_open() {
            return self.handle_delete_key(key.code);
        }
        match self.input.clone() {
            InputMode::Normal => self.handle_normal_key(key.code),
            InputMode::Search => self.handle_search_key(key.code),
            InputMode::FilterColumn { selection } => self.handle_filter_column_key(key.code, selection),
            InputMode::FilterValue { column, text } => self.handle_filter_value_key(key.code, column, text),
            InputMode::Sort { selection } => self.handle_sort_key(key.code, selection),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> PanelOutcome {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.selected -= 1;
                } else {
                    self.table.scroll_rows(-1);
                }
                PanelOutcome::Handled
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.visible_row_count() {
                    self.selected += 1;
                } else {
                    self.table.scroll_rows(1);
                }
                PanelOutcome::Handled
            }
            KeyCode::PageUp => {
                self.table.scroll_rows(-i64::from(self.visible_rows));
                PanelOutcome::Handled
            }
            KeyCode::PageDown => {
                self.table.scroll_rows(i64::from(self.visible_rows));
                PanelOutcome::Handled
            }
            KeyCode::Char('n') => {
                let moved = self.table.next_page();
                self.page_moved(moved)
            }
            KeyCode::Char('p') => {
                let moved = self.table.prev_page();
                self.page_moved(moved)
            }
            KeyCode::Char('g') | KeyCode::Home => {
                let moved = self.table.first_page();
                self.page_moved(moved)
            }
            KeyCode::Char('G') | KeyCode::End => {
                let moved = self.table.last_page();
                self.page_moved(moved)
            }
            KeyCode::Char('/') => {
                self.search_input = self.table.query().search_text().to_string();
                self.input = InputMode::Search;
                PanelOutcome::Handled
            }
            KeyCode::Char('f') => {
                if self.table.filter_keys().is_empty() {
                    return PanelOutcome::Status(format!("{} has no filterable columns", self.title));
                }
                self.input = InputMode::FilterColumn { selection: 0 };
                PanelOutcome::Handled
            }
            KeyCode::Char('s') => {
                let keys = self.table.columns().sortable_keys();
                if keys.is_empty() {
                    return PanelOutcome::Status(format!("{} has no sortable columns", self.title));
                }
                let selection = self
                    .table
                    .query()
                    .sort_column()
                    .and_then(|column| keys.iter().position(|k| *k == column))
                    .unwrap_or(0);
                self.input = InputMode::Sort { selection };
                PanelOutcome::Handled
            }
            KeyCode::Char('c') => {
                self.table.set_search("");
                self.table.clear_filters();
                self.table.clear_sort();
                self.selected = 0;
                PanelOutcome::Status("Cleared search, filters and sort".to_string())
            }
            KeyCode::Char('v') => match self.toggle_virtual() {
                Ok(true) => PanelOutcome::Status("Virtualized scrolling on".to_string()),
                Ok(false) => PanelOutcome::Status("Virtualized scrolling off".to_string()),
                Err(e) => PanelOutcome::Status(e.to_string()),
            },
            KeyCode::Char('d') => self.open_delete(),
            _ => PanelOutcome::Ignored,
        }
    }

    fn page_moved(&mut self, moved: bool) -> PanelOutcome {
        if moved {
            self.selected = 0;
        }
        PanelOutcome::Handled
    }

    fn handle_search_key(&mut self, code: KeyCode) -> PanelOutcome {
        match code {
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.apply_search();
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.apply_search();
            }
            KeyCode::Enter => {
                self.input = InputMode::Normal;
            }
            KeyCode::Esc => {
                self.search_input.clear();
                self.apply_search();
                self.input = InputMode::Normal;
            }
            _ => {}
        }
        PanelOutcome::Handled
    }

    fn apply_search(&mut self) {
        self.table.set_search(self.search_input.as_str());
        self.selected = 0;
    }

    fn handle_filter_column_key(&mut self, code: KeyCode, selection: usize) -> PanelOutcome {
        let keys = self.table.filter_keys();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.input = InputMode::FilterColumn {
                    selection: selection.saturating_sub(1),
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.input = InputMode::FilterColumn {
                    selection: (selection + 1).min(keys.len().saturating_sub(1)),
                };
            }
            KeyCode::Enter => {
                if let Some(column) = keys.get(selection).copied() {
                    let text = self
                        .table
                        .query()
                        .filter(column)
                        .and_then(|value| value.coerce_string())
                        .unwrap_or_default();
                    self.input = InputMode::FilterValue { column, text };
                }
            }
            KeyCode::Esc => {
                self.input = InputMode::Normal;
            }
            _ => {}
        }
        PanelOutcome::Handled
    }

    fn handle_filter_value_key(&mut self, code: KeyCode, column: R::Column, mut text: String) -> PanelOutcome {
        match code {
            KeyCode::Char(c) => {
                text.push(c);
                self.input = InputMode::FilterValue { column, text };
            }
            KeyCode::Backspace => {
                text.pop();
                self.input = InputMode::FilterValue { column, text };
            }
            KeyCode::Enter => {
                self.input = InputMode::Normal;
                self.selected = 0;
                let value = text.trim();
                if value.is_empty() {
                    self.table.clear_filter(column);
                    return PanelOutcome::Status(format!("Cleared filter on {}", column.as_str()));
                }
                return match self.table.set_filter(column, value) {
                    Ok(()) => PanelOutcome::Status(format!("Filter: {}={}", column.as_str(), value)),
                    Err(e) => PanelOutcome::Status(e.to_string()),
                };
            }
            KeyCode::Esc => {
                self.input = InputMode::Normal;
            }
            _ => {}
        }
        PanelOutcome::Handled
    }

    fn handle_sort_key(&mut self, code: KeyCode, selection: usize) -> PanelOutcome {
        let keys = self.table.columns().sortable_keys();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.input = InputMode::Sort {
                    selection: selection.saturating_sub(1),
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.input = InputMode::Sort {
                    selection: (selection + 1).min(keys.len().saturating_sub(1)),
                };
            }
            KeyCode::Enter => {
                self.input = InputMode::Normal;
                if let Some(column) = keys.get(selection).copied() {
                    self.selected = 0;
                    if let Err(e) = self.table.toggle_sort(column) {
                        return PanelOutcome::Status(e.to_string());
                    }
                }
            }
            KeyCode::Char('x') | KeyCode::Backspace => {
                self.input = InputMode::Normal;
                self.table.clear_sort();
                return PanelOutcome::Status("Sort cleared".to_string());
            }
            KeyCode::Esc => {
                self.input = InputMode::Normal;
            }
            _ => {}
        }
        PanelOutcome::Handled
    }

    fn open_delete(&mut self) -> PanelOutcome {
        let Some(label_column) = self.delete_label else {
            return PanelOutcome::Ignored;
        };
        let label_index = self.table.columns().position(label_column);
        let selected = self.selected;
        let view = self.current_view();
        let Some(row) = view.rows.get(selected) else {
            return PanelOutcome::Status("Nothing selected".to_string());
        };
        let RowKey::Id(id) = &row.key else {
            return PanelOutcome::Status("Selected row has no id".to_string());
        };
        let label = label_index
            .and_then(|index| row.cells.get(index))
            .map(|cell| cell.text.clone())
            .unwrap_or_else(|| id.clone());
        self.modal.open_delete(id.clone(), label);
        PanelOutcome::Handled
    }

    fn handle_delete_key(&mut self, code: KeyCode) -> PanelOutcome {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let label = self
                    .modal
                    .pending()
                    .map(|pending| pending.label.clone())
                    .unwrap_or_default();
                match self.modal.confirm() {
                    Some(id) => PanelOutcome::Delete { id, label },
                    None => PanelOutcome::Handled,
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.modal.cancel();
                PanelOutcome::Status("Delete cancelled".to_string())
            }
            _ => PanelOutcome::Handled,
        }
    }
}
