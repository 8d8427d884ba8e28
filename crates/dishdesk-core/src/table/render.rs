//! Maps processed rows and column descriptors to display cells.

use std::collections::HashMap;

use super::{Align, CellValue, ColumnKey, Columns, ProcessedRow, QueryState, RowKey, SortDirection, TableRow};

/// Caller-supplied formatter for one column.
pub type CellFormatter<R> = Box<dyn Fn(&R, &CellValue) -> String + Send + Sync>;

/// A header cell with its sort indicator state.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell<C: ColumnKey> {
    pub key: C,
    pub title: String,
    pub align: Align,
    pub width: Option<u16>,
    pub sortable: bool,
    /// Set on the currently sorted column.
    pub sort: Option<SortDirection>,
}

impl<C: ColumnKey> HeaderCell<C> {
    /// Title with a trailing sort arrow when sorted.
    pub fn label(&self) -> String {
        match self.sort {
            Some(direction) => format!("{} {}", self.title, direction.arrow()),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub text: String,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub key: RowKey,
    pub cells: Vec<RenderedCell>,
    /// Absolute offset when rendered through a virtual window.
    pub offset: Option<u64>,
}

/// Per-table renderer holding the optional column formatters.
pub struct Renderer<R: TableRow> {
    formatters: HashMap<R::Column, CellFormatter<R>>,
}

impl<R: TableRow> Default for Renderer<R> {
    fn default() -> Self {
        Self {
            formatters: HashMap::new(),
        }
    }
}

impl<R: TableRow> Renderer<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a formatter for one column. Columns without one use the
    /// value's own display form (`-` for empty values).
    pub fn with_formatter<F>(mut self, column: R::Column, formatter: F) -> Self
    where
        F: Fn(&R, &CellValue) -> String + Send + Sync + 'static,
    {
        self.formatters.insert(column, Box::new(formatter));
        self
    }

    pub fn headers(&self, columns: &Columns<R::Column>, state: &QueryState<R::Column>) -> Vec<HeaderCell<R::Column>> {
        columns
            .iter()
            .map(|def| HeaderCell {
                key: def.key,
                title: def.title.clone(),
                align: def.align,
                width: def.width,
                sortable: def.sortable,
                sort: (state.sort_column() == Some(def.key)).then(|| state.sort_direction()),
            })
            .collect()
    }

    pub fn row(&self, columns: &Columns<R::Column>, processed: ProcessedRow<'_, R>, offset: Option<u64>) -> RenderedRow {
        let cells = columns
            .iter()
            .map(|def| {
                let value = processed.row.cell(def.key);
                let text = match self.formatters.get(&def.key) {
                    Some(format) => format(processed.row, &value),
                    None => value.to_string(),
                };
                RenderedCell {
                    text,
                    align: def.align,
                }
            })
            .collect();

        RenderedRow {
            key: RowKey::for_row(processed.row, processed.index),
            cells,
            offset,
        }
    }
}
