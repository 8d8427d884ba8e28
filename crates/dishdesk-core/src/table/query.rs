//! Query state: search text, filters, sort and pagination cursor.

use indexmap::IndexMap;

use super::{CellValue, ColumnKey};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction for the sorted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Descending order (Z-A, 9-0)
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Current query of one table.
///
/// Fields are read-only from outside the crate; mutation goes through the
/// validated setters on [`DataTable`](super::DataTable).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<C: ColumnKey> {
    pub(super) search_text: String,
    pub(super) filters: IndexMap<C, CellValue>,
    pub(super) sort_column: Option<C>,
    pub(super) sort_direction: SortDirection,
    pub(super) page: usize,
    pub(super) page_size: usize,
}

impl<C: ColumnKey> Default for QueryState<C> {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl<C: ColumnKey> QueryState<C> {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            search_text: String::new(),
            filters: IndexMap::new(),
            sort_column: None,
            sort_direction: SortDirection::Ascending,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Active filters in the order they were applied.
    pub fn filters(&self) -> &IndexMap<C, CellValue> {
        &self.filters
    }

    pub fn filter(&self, key: C) -> Option<&CellValue> {
        self.filters.get(&key)
    }

    pub fn sort_column(&self) -> Option<C> {
        self.sort_column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Sorted column and direction, if a sort is active.
    pub fn sort(&self) -> Option<(C, SortDirection)> {
        self.sort_column.map(|column| (column, self.sort_direction))
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether search or any filter narrows the result.
    pub fn is_narrowed(&self) -> bool {
        !self.search_text.is_empty() || !self.filters.is_empty()
    }

    /// Number of pages needed for `total` rows.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Half-open row range of the current page.
    pub fn page_range(&self) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.page_size);
        (start, start.saturating_add(self.page_size))
    }

    pub(super) fn toggle_sort(&mut self, column: C) {
        if self.sort_column == Some(column) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_column = Some(column);
            self.sort_direction = SortDirection::Ascending;
        }
    }

    pub(super) fn set_filter(&mut self, key: C, value: CellValue) {
        if value.is_blank() {
            self.filters.shift_remove(&key);
        } else {
            self.filters.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::testing::DishColumn;

    #[test]
    fn test_defaults() {
        let state: QueryState<DishColumn> = QueryState::default();
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(state.sort(), None);
        assert!(!state.is_narrowed());
    }

    #[test]
    fn test_toggle_sort_same_column_flips() {
        let mut state: QueryState<DishColumn> = QueryState::default();
        state.toggle_sort(DishColumn::Price);
        assert_eq!(state.sort(), Some((DishColumn::Price, SortDirection::Ascending)));
        state.toggle_sort(DishColumn::Price);
        assert_eq!(state.sort(), Some((DishColumn::Price, SortDirection::Descending)));
        state.toggle_sort(DishColumn::Price);
        assert_eq!(state.sort(), Some((DishColumn::Price, SortDirection::Ascending)));
    }

    #[test]
    fn test_toggle_sort_new_column_resets_to_ascending() {
        let mut state: QueryState<DishColumn> = QueryState::default();
        state.toggle_sort(DishColumn::Price);
        state.toggle_sort(DishColumn::Price);
        state.toggle_sort(DishColumn::Name);
        assert_eq!(state.sort(), Some((DishColumn::Name, SortDirection::Ascending)));
    }

    #[test]
    fn test_blank_filter_is_removed() {
        let mut state: QueryState<DishColumn> = QueryState::default();
        state.set_filter(DishColumn::Category, CellValue::text("pizza"));
        assert!(state.is_narrowed());
        state.set_filter(DishColumn::Category, CellValue::text(""));
        assert!(state.filters().is_empty());
        state.set_filter(DishColumn::Category, CellValue::Null);
        assert!(state.filters().is_empty());
    }

    #[test]
    fn test_total_pages() {
        let state: QueryState<DishColumn> = QueryState::with_page_size(10);
        assert_eq!(state.total_pages(0), 0);
        assert_eq!(state.total_pages(25), 3);
        assert_eq!(state.total_pages(30), 3);
    }
}
