//! Local-mode row processing: search, filter, sort, paginate.
//!
//! Works on borrowed rows and never clones them; the output is a list of
//! references paired with their position in the input slice.

use super::{Columns, QueryState, SortDirection, TableRow};

/// Whether the processor slices out the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Windowing {
    #[default]
    Paginate,
    /// Keep every matching row; a virtual window owns windowing instead.
    All,
}

/// A row that survived processing, with its index in the input slice.
#[derive(Debug)]
pub struct ProcessedRow<'a, R> {
    pub index: usize,
    pub row: &'a R,
}

impl<R> Clone for ProcessedRow<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ProcessedRow<'_, R> {}

/// Result of one processing pass.
#[derive(Debug, Clone)]
pub struct ProcessedRows<'a, R> {
    pub rows: Vec<ProcessedRow<'a, R>>,
    /// Matching rows after search and filter, before pagination.
    pub total_count: usize,
}

/// Run search, filter, sort and pagination over `rows`.
pub fn process<'a, R: TableRow>(
    rows: &'a [R],
    state: &QueryState<R::Column>,
    columns: &Columns<R::Column>,
    windowing: Windowing,
) -> ProcessedRows<'a, R> {
    let needle = state.search_text().to_lowercase();

    let mut matched: Vec<ProcessedRow<'a, R>> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| needle.is_empty() || matches_search(*row, columns, &needle))
        .filter(|(_, row)| matches_filters(*row, state))
        .map(|(index, row)| ProcessedRow { index, row })
        .collect();

    if let Some((column, direction)) = state.sort() {
        // sort_by is stable: equal keys keep input order
        matched.sort_by(|a, b| {
            let cmp = a.row.cell(column).sort_cmp(&b.row.cell(column));
            match direction {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        });
    }

    let total_count = matched.len();

    if windowing == Windowing::Paginate {
        let (start, end) = state.page_range();
        let end = end.min(total_count);
        if start >= end {
            matched.clear();
        } else {
            matched.truncate(end);
            matched.drain(..start);
        }
    }

    ProcessedRows {
        rows: matched,
        total_count,
    }
}

fn matches_search<R: TableRow>(row: &R, columns: &Columns<R::Column>, needle_lower: &str) -> bool {
    columns
        .keys()
        .any(|key| row.cell(key).matches_search(needle_lower))
}

fn matches_filters<R: TableRow>(row: &R, state: &QueryState<R::Column>) -> bool {
    state
        .filters()
        .iter()
        .all(|(key, wanted)| row.cell(*key).matches_filter(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::testing::{Dish, DishColumn, menu};
    use crate::table::CellValue;

    fn ids(processed: &ProcessedRows<'_, Dish>) -> Vec<u32> {
        processed.rows.iter().filter_map(|r| r.row.id).collect()
    }

    #[test]
    fn test_no_query_keeps_input_order() {
        let rows = menu();
        let state = QueryState::with_page_size(100);
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert_eq!(processed.total_count, 25);
        assert_eq!(ids(&processed), (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_query_with_sort_only_reorders() {
        let rows = menu();
        let mut state = QueryState::with_page_size(100);
        state.toggle_sort(DishColumn::Price);
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert_eq!(processed.total_count, rows.len());

        let mut expected: Vec<u32> = ids(&processed);
        expected.sort_unstable();
        assert_eq!(expected, (1..=25).collect::<Vec<_>>());

        let prices: Vec<f64> = processed.rows.iter().map(|r| r.row.price).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_search_matches_any_column() {
        let rows = menu();
        let mut state = QueryState::with_page_size(100);
        state.search_text = "SALADS".to_string();
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert_eq!(ids(&processed), vec![2]);
    }

    #[test]
    fn test_search_treats_rendered_cells_as_matching() {
        let mut rows = vec![Dish::new(1, "Soup", "Starters", 4.0)];
        rows[0].badge = Some("NEW".to_string());
        rows.push(Dish::new(2, "Bread", "Starters", 2.0));

        let mut state = QueryState::with_page_size(10);
        state.search_text = "zzz".to_string();
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert_eq!(ids(&processed), vec![1]);
    }

    #[test]
    fn test_filters_combine() {
        let rows = menu();
        let mut state = QueryState::with_page_size(100);
        state.set_filter(DishColumn::Category, CellValue::text("piz"));
        state.set_filter(DishColumn::Price, CellValue::text("14"));
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert_eq!(ids(&processed), vec![3]);
    }

    #[test]
    fn test_descending_sort() {
        let rows = menu();
        let mut state = QueryState::with_page_size(3);
        state.toggle_sort(DishColumn::Price);
        state.toggle_sort(DishColumn::Price);
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert_eq!(ids(&processed), vec![25, 24, 23]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let rows = menu();
        let mut state = QueryState::with_page_size(100);
        state.toggle_sort(DishColumn::Category);
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        let pizzas: Vec<u32> = processed
            .rows
            .iter()
            .filter(|r| r.row.category == "Pizza")
            .filter_map(|r| r.row.id)
            .collect();
        assert_eq!(pizzas, vec![1, 3, 5]);
    }

    #[test]
    fn test_last_page_holds_remainder() {
        let rows = menu();
        let mut state = QueryState::with_page_size(10);
        state.page = 3;
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert_eq!(processed.rows.len(), 25 % 10);

        let rows: Vec<Dish> = menu().into_iter().take(20).collect();
        state.page = 2;
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert_eq!(processed.rows.len(), 10);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let rows = menu();
        let mut state = QueryState::with_page_size(10);
        state.page = 7;
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert!(processed.rows.is_empty());
        assert_eq!(processed.total_count, 25);
    }

    #[test]
    fn test_windowing_all_skips_pagination() {
        let rows = menu();
        let state = QueryState::with_page_size(10);
        let processed = process(&rows, &state, &Dish::columns(), Windowing::All);
        assert_eq!(processed.rows.len(), 25);
    }

    #[test]
    fn test_pizza_scenario() {
        let rows = menu();
        let mut state = QueryState::with_page_size(10);
        state.toggle_sort(DishColumn::Price);
        state.search_text = "pizza".to_string();
        let processed = process(&rows, &state, &Dish::columns(), Windowing::Paginate);
        assert_eq!(processed.total_count, 3);
        assert_eq!(processed.rows.len(), 3);
        assert_eq!(ids(&processed), vec![5, 1, 3]);
    }
}
