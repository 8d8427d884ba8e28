use crate::table::{Align, ColumnKey, PageInfo, TableView};
use crate::utils::text::truncate_text;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use crossterm::terminal;

const MAX_CELL_WIDTH: usize = 48;

/// Terminal rendering of a [`TableView`] for the CLI.
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn header_cell(&self, text: &str) -> Cell {
        let cell = Cell::new(text).add_attribute(Attribute::Bold);
        if self.use_colors { cell.fg(Color::Cyan) } else { cell }
    }

    pub fn render<C: ColumnKey>(&self, view: &TableView<C>) -> String {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(width as u16);
        }

        table.set_header(
            view.headers
                .iter()
                .map(|header| self.header_cell(&header.label()))
                .collect::<Vec<_>>(),
        );

        for row in &view.rows {
            table.add_row(
                row.cells
                    .iter()
                    .map(|cell| {
                        Cell::new(truncate_text(&cell.text, MAX_CELL_WIDTH)).set_alignment(alignment(cell.align))
                    })
                    .collect::<Vec<_>>(),
            );
        }

        let mut output = table.to_string();
        output.push('\n');
        output.push_str(&self.footer(view));
        output
    }

    /// Summary line below the table.
    pub fn footer<C: ColumnKey>(&self, view: &TableView<C>) -> String {
        if view.total_count == 0 {
            return if view.unfiltered_count > 0 {
                format!("No rows match ({} hidden by search/filters)", view.unfiltered_count)
            } else {
                "No rows".to_string()
            };
        }

        let mut footer = match &view.page {
            Some(page) => page_summary(page),
            None => format!("{} rows", view.total_count),
        };
        if view.is_filtered() {
            footer.push_str(&format!(" (filtered from {})", view.unfiltered_count));
        }
        footer
    }
}

fn page_summary(page: &PageInfo) -> String {
    format!(
        "Showing {}-{} of {} | page {}/{}",
        page.first_row,
        page.last_row,
        page.total,
        page.page,
        page.total_pages.max(1)
    )
}

fn alignment(align: Align) -> CellAlignment {
    match align {
        Align::Left => CellAlignment::Left,
        Align::Center => CellAlignment::Center,
        Align::Right => CellAlignment::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DataTable;
    use crate::table::testing::{Dish, menu};

    fn display() -> TableDisplay {
        TableDisplay::new().with_max_width(100).with_colors(false)
    }

    #[test]
    fn test_render_contains_headers_rows_and_footer() {
        let rows = menu();
        let mut table = DataTable::<Dish>::local(Dish::columns());
        table.set_search("pizza");
        let output = display().render(&table.view(&rows));

        assert!(output.contains("Name"));
        assert!(output.contains("Margherita Pizza"));
        assert!(output.ends_with("Showing 1-3 of 3 | page 1/1 (filtered from 25)"));
    }

    #[test]
    fn test_footer_for_empty_results() {
        let rows = menu();
        let mut table = DataTable::<Dish>::local(Dish::columns());
        table.set_search("no such dish");
        assert_eq!(
            display().footer(&table.view(&rows)),
            "No rows match (25 hidden by search/filters)"
        );
        assert_eq!(display().footer(&table.view(&[])), "No rows");
    }
}
