//! Generic data-table engine.
//!
//! A [`DataTable`] owns the column descriptors and the query state (search,
//! filters, sort, paging) of one table. Rows stay with the caller: every render
//! pass borrows them through [`DataTable::view`].
//!
//! Two modes are supported:
//! - **Local**: rows are all in memory and the [`processor`] searches, filters,
//!   sorts and paginates them.
//! - **Delegated**: every query change is forwarded to a [`DelegatedSource`]
//!   which re-fetches; the table renders whatever page it is handed.
//!
//! Optional virtualization ([`VirtualWindow`]) replaces pagination with a
//! scroll-offset driven window over the full result.

mod column;
pub mod delegated;
mod engine;
pub mod processor;
mod query;
mod render;
mod value;
mod virtual_window;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt::Debug;
use std::hash::Hash;

pub use column::{Align, ColumnDef, Columns};
pub use delegated::{DelegatedRequest, DelegatedSource, PaginationInfo, RequestSeq, RequestSequencer};
pub use engine::{DataTable, PageInfo, TableMode, TableView};
pub use processor::{ProcessedRow, ProcessedRows, Windowing};
pub use query::{DEFAULT_PAGE_SIZE, QueryState, SortDirection};
pub use render::{CellFormatter, HeaderCell, RenderedCell, RenderedRow, Renderer};
pub use value::{CellValue, EMPTY_PLACEHOLDER};
pub use virtual_window::{VirtualSlice, VirtualWindow};

/// Identifier of a column within one row type.
///
/// Implemented by a plain enum per row type so that column keys are checked
/// at compile time.
pub trait ColumnKey: Copy + Eq + Hash + Debug + 'static {
    /// Stable key used in logs, URLs and CLI arguments.
    fn as_str(self) -> &'static str;

    /// Every key of this row type, in display order.
    fn all() -> &'static [Self];

    /// Parse a key from its [`as_str`](Self::as_str) form.
    fn parse(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
    }
}

/// A record that can be shown in a [`DataTable`].
pub trait TableRow {
    type Column: ColumnKey;

    /// Value of one cell.
    fn cell(&self, column: Self::Column) -> CellValue;

    /// Stable identifier, when the record has one.
    fn row_id(&self) -> Option<String> {
        None
    }
}

/// How a rendered row is identified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Id(String),
    /// Position in the caller's row slice.
    Index(usize),
}

impl RowKey {
    pub fn for_row<R: TableRow>(row: &R, index: usize) -> Self {
        match row.row_id() {
            Some(id) => RowKey::Id(id),
            None => RowKey::Index(index),
        }
    }
}
