//! Table panel: one tab's [`DataTable`] plus its rows, selection and modals.
//!
//! ## Module Structure
//! - `mod.rs`: panel state and table drawing
//! - `key_handler.rs`: key handling per input mode
//! - `modals.rs`: search bar, filter, sort and delete-confirmation overlays
//! - `types.rs`: input modes and key outcomes

mod key_handler;
mod modals;
mod types;

pub use types::{InputMode, PanelOutcome};

use crossterm::event::KeyEvent;
use dishdesk_core::display::TableDisplay;
use dishdesk_core::error::TableError;
use dishdesk_core::modal::ModalManager;
use dishdesk_core::table::{Align, ColumnKey, DataTable, TableRow, TableView, VirtualWindow};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::Component;
use super::styles::{
    HIGHLIGHT_SYMBOL, Palette, border_style, dim_style, header_style, key_style, row_highlight_style, title_style,
};
use crate::layout::table::{FLEX_MIN_WIDTH, HEADER_LINES, ROW_HEIGHT};
use crate::service::LoadState;

/// Object-safe face of a [`TablePanel`], so the app can address the
/// active tab without knowing its row type.
pub trait TablePage: Component {
    fn handle_key(&mut self, key: KeyEvent) -> PanelOutcome;

    /// Whether a modal or the search box is reading keys.
    fn is_capturing_input(&self) -> bool;
}

pub struct TablePanel<R: TableRow> {
    title: &'static str,
    pub(crate) table: DataTable<R>,
    pub(crate) rows: LoadState<Vec<R>>,
    /// Index into the rows currently on screen
    selected: usize,
    input: InputMode<R::Column>,
    search_input: String,
    /// Column whose text names a row in the delete prompt; `None` disables delete
    delete_label: Option<R::Column>,
    pub(crate) modal: ModalManager<String>,
    /// Body rows available at the last draw
    visible_rows: u32,
}

impl<R: TableRow> TablePanel<R> {
    pub fn new(title: &'static str, table: DataTable<R>) -> Self {
        Self {
            title,
            table,
            rows: LoadState::Idle,
            selected: 0,
            input: InputMode::Normal,
            search_input: String::new(),
            delete_label: None,
            modal: ModalManager::new(),
            visible_rows: 20,
        }
    }

    /// Allow `d` to delete the selected row, naming it by `label_column`.
    pub fn deletable(mut self, label_column: R::Column) -> Self {
        self.delete_label = Some(label_column);
        self
    }

    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = LoadState::Loaded(rows);
        let shown = self.visible_row_count();
        if self.selected >= shown {
            self.selected = shown.saturating_sub(1);
        }
    }

    /// Mark as loading; rows already shown stay until the new ones arrive.
    pub fn set_loading(&mut self) {
        if !self.rows.is_loaded() {
            self.rows = LoadState::Loading;
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.rows = LoadState::Error(message);
    }

    #[cfg(test)]
    pub fn input_mode(&self) -> &InputMode<R::Column> {
        &self.input
    }

    #[cfg(test)]
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn current_view(&mut self) -> TableView<R::Column> {
        let rows = self.rows.data().map(Vec::as_slice).unwrap_or(&[]);
        self.table.view(rows)
    }

    /// Rows the user can move the selection across.
    fn visible_row_count(&mut self) -> usize {
        let limit = if self.table.is_virtualized() {
            self.visible_rows as usize
        } else {
            usize::MAX
        };
        self.current_view().rows.len().min(limit)
    }

    /// Switch between pagination and virtualized scrolling.
    ///
    /// Returns whether virtualization is now on.
    pub fn toggle_virtual(&mut self) -> Result<bool, TableError> {
        self.selected = 0;
        if self.table.is_virtualized() {
            self.table.set_virtual_window(None);
            Ok(false)
        } else {
            let window = VirtualWindow::new(ROW_HEIGHT, self.visible_rows.max(1) * ROW_HEIGHT)?;
            self.table.set_virtual_window(Some(window));
            Ok(true)
        }
    }

    /// Search, filters and sort in one line for the panel title.
    fn query_summary(&self) -> String {
        let query = self.table.query();
        let mut parts = Vec::new();
        if !query.search_text().is_empty() {
            parts.push(format!("search: \"{}\"", query.search_text()));
        }
        for (column, value) in query.filters() {
            parts.push(format!(
                "{}={}",
                column.as_str(),
                value.coerce_string().unwrap_or_default()
            ));
        }
        if let Some((column, direction)) = query.sort() {
            parts.push(format!("sort: {} {}", column.as_str(), direction.arrow()));
        }
        parts.join(" │ ")
    }

    fn draw_table(&mut self, frame: &mut Frame, body: Rect, footer: Rect, palette: &Palette) {
        self.visible_rows = u32::from(body.height.saturating_sub(HEADER_LINES)).max(1);
        self.table.set_container_height(self.visible_rows * ROW_HEIGHT);

        let view = self.current_view();
        let shown = if self.table.is_virtualized() {
            view.rows.len().min(self.visible_rows as usize)
        } else {
            view.rows.len()
        };
        if self.selected >= shown {
            self.selected = shown.saturating_sub(1);
        }

        let header = Row::new(view.headers.iter().map(|h| Cell::from(h.label()))).style(header_style(palette));
        let widths: Vec<Constraint> = view
            .headers
            .iter()
            .map(|h| match h.width {
                Some(width) => Constraint::Length(width),
                None => Constraint::Min(FLEX_MIN_WIDTH),
            })
            .collect();
        let rows = view.rows.iter().map(|row| {
            Row::new(
                row.cells
                    .iter()
                    .map(|cell| Cell::from(Line::from(cell.text.clone()).alignment(alignment(cell.align)))),
            )
        });

        let table = Table::new(rows, widths)
            .header(header)
            .style(Style::default().fg(palette.text))
            .row_highlight_style(row_highlight_style(palette))
            .highlight_symbol(HIGHLIGHT_SYMBOL);
        let mut state = TableState::default().with_selected((shown > 0).then_some(self.selected));
        frame.render_stateful_widget(table, body, &mut state);

        let mut spans = vec![Span::styled(TableDisplay::new().footer(&view), dim_style(palette))];
        if self.table.is_virtualized() {
            spans.push(Span::styled("  [virtual]", key_style(palette)));
        }
        if self.table.is_delegated() {
            spans.push(Span::styled("  [server]", key_style(palette)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), footer);
    }

    fn draw_placeholder(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let (text, style) = match &self.rows {
            LoadState::Idle => ("Press r to load".to_string(), dim_style(palette)),
            LoadState::Loading => (
                format!("Loading {}...", self.title.to_lowercase()),
                Style::default().fg(palette.warning),
            ),
            LoadState::Error(message) => (message.clone(), Style::default().fg(palette.error)),
            LoadState::Loaded(_) => (String::new(), Style::default()),
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, style))).alignment(Alignment::Center),
            area,
        );
    }
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

impl<R: TableRow> Component for TablePanel<R> {
    fn draw(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let summary = self.query_summary();
        let mut title = vec![Span::styled(format!(" {} ", self.title), title_style(palette))];
        if !summary.is_empty() {
            title.push(Span::styled(format!("│ {} ", summary), dim_style(palette)));
        }
        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(border_style(palette, true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let search_height = u16::from(self.shows_search_bar());
        let [body, footer, search_bar] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(search_height),
        ])
        .areas(inner);

        if self.rows.is_loaded() {
            self.draw_table(frame, body, footer, palette);
        } else {
            self.draw_placeholder(frame, body, palette);
        }

        if search_height > 0 {
            self.render_search_bar(frame, search_bar, palette);
        }
        self.render_modals(frame, area, palette);
    }
}

impl<R: TableRow> TablePage for TablePanel<R> {
    fn handle_key(&mut self, key: KeyEvent) -> PanelOutcome {
        TablePanel::handle_key(self, key)
    }

    fn is_capturing_input(&self) -> bool {
        self.modal.is_open() || self.input != InputMode::Normal
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use dishdesk_core::api::models::{FoodColumn, FoodItem};
    use ratatui::{Terminal, backend::TestBackend};

    pub(crate) fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub(crate) fn type_text<R: TableRow>(panel: &mut TablePanel<R>, text: &str) {
        for c in text.chars() {
            panel.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn food(id: &str, name: &str, category: &str, price: f64) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price,
            category: Some(category.to_string()),
            available: true,
            image_url: None,
        }
    }

    pub(crate) fn food_panel() -> TablePanel<FoodItem> {
        let table = DataTable::<FoodItem>::local(FoodItem::columns().unwrap())
            .with_renderer(FoodItem::renderer())
            .with_page_size(2)
            .unwrap();
        let mut panel = TablePanel::new("Foods", table).deletable(FoodColumn::Name);
        panel.set_rows(vec![
            food("f1", "Margherita", "Pizza", 9.5),
            food("f2", "Lemonade", "Drinks", 3.0),
            food("f3", "Pepperoni", "Pizza", 11.0),
            food("f4", "Cola", "Drinks", 2.5),
            food("f5", "Calzone", "Pizza", 12.0),
        ]);
        panel
    }

    fn names(panel: &mut TablePanel<FoodItem>) -> Vec<String> {
        panel
            .current_view()
            .rows
            .iter()
            .map(|row| row.cells[1].text.clone())
            .collect()
    }

    #[test]
    fn test_draw_renders_rows_and_footer() {
        let mut panel = food_panel();
        let palette = Palette::for_theme(Default::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|frame| panel.draw(frame, frame.area(), &palette))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Margherita"));
        assert!(text.contains("Showing 1-2 of 5 | page 1/3"));
        assert!(!text.contains("Pepperoni"));
    }

    #[test]
    fn test_draw_placeholder_before_load() {
        let table = DataTable::<FoodItem>::local(FoodItem::columns().unwrap());
        let mut panel = TablePanel::new("Foods", table);
        let palette = Palette::for_theme(Default::default());
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        terminal
            .draw(|frame| panel.draw(frame, frame.area(), &palette))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Press r to load"));
    }

    #[test]
    fn test_live_search_narrows_rows() {
        let mut panel = food_panel();
        panel.handle_key(key(KeyCode::Char('/')));
        assert!(panel.is_capturing_input());
        type_text(&mut panel, "pizza");
        assert_eq!(panel.table.query().search_text(), "pizza");
        assert_eq!(panel.current_view().total_count, 3);

        panel.handle_key(key(KeyCode::Backspace));
        assert_eq!(panel.table.query().search_text(), "pizz");

        panel.handle_key(key(KeyCode::Enter));
        assert!(!panel.is_capturing_input());
        assert_eq!(panel.table.query().search_text(), "pizz");

        panel.handle_key(key(KeyCode::Char('/')));
        panel.handle_key(key(KeyCode::Esc));
        assert_eq!(panel.table.query().search_text(), "");
    }

    #[test]
    fn test_page_keys() {
        let mut panel = food_panel();
        panel.handle_key(key(KeyCode::Char('n')));
        assert_eq!(names(&mut panel), vec!["Pepperoni", "Cola"]);
        panel.handle_key(key(KeyCode::Char('G')));
        assert_eq!(names(&mut panel), vec!["Calzone"]);
        panel.handle_key(key(KeyCode::Char('p')));
        assert_eq!(panel.table.query().page(), 2);
        panel.handle_key(key(KeyCode::Char('g')));
        assert_eq!(panel.table.query().page(), 1);
    }

    #[test]
    fn test_virtual_toggle_shows_all_rows() {
        let mut panel = food_panel();
        panel.handle_key(key(KeyCode::Char('v')));
        assert!(panel.table.is_virtualized());
        let view = panel.current_view();
        assert!(view.page.is_none());
        assert_eq!(view.rows.len(), 5);

        panel.handle_key(key(KeyCode::Char('v')));
        assert!(!panel.table.is_virtualized());
        assert_eq!(panel.current_view().rows.len(), 2);
    }

    #[test]
    fn test_selection_stays_on_page() {
        let mut panel = food_panel();
        panel.handle_key(key(KeyCode::Down));
        panel.handle_key(key(KeyCode::Down));
        assert_eq!(panel.selected(), 1);
        panel.handle_key(key(KeyCode::Char('k')));
        panel.handle_key(key(KeyCode::Char('k')));
        assert_eq!(panel.selected(), 0);
    }
}
