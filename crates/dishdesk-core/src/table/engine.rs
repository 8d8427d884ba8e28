//! The table engine: validated query setters, mode dispatch and view building.

use super::delegated::{DelegatedRequest, DelegatedSource, PaginationInfo, RequestSeq, RequestSequencer};
use super::processor::{self, ProcessedRow, Windowing};
use super::{
    CellValue, ColumnKey, Columns, HeaderCell, QueryState, RenderedRow, Renderer, TableRow, VirtualWindow,
};
use crate::error::TableError;

/// Where search, filter, sort and paging are carried out.
pub enum TableMode<C: ColumnKey> {
    /// All rows are in memory and processed by the table.
    Local,
    /// Query changes are forwarded to an external source.
    Delegated(Box<dyn DelegatedSource<C>>),
}

impl<C: ColumnKey> std::fmt::Debug for TableMode<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableMode::Local => f.write_str("Local"),
            TableMode::Delegated(_) => f.write_str("Delegated"),
        }
    }
}

/// Footer data for paginated views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    /// 1-based index of the first row on this page, 0 when empty.
    pub first_row: usize,
    /// 1-based index of the last row on this page, 0 when empty.
    pub last_row: usize,
}

impl PageInfo {
    fn new(page: usize, page_size: usize, total: usize, total_pages: usize, shown: usize) -> Self {
        let first_row = if shown == 0 {
            0
        } else {
            (page - 1) * page_size + 1
        };
        let last_row = if shown == 0 { 0 } else { first_row + shown - 1 };
        Self {
            page,
            page_size,
            total,
            total_pages,
            first_row,
            last_row,
        }
    }
}

/// Everything needed to draw one frame of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<C: ColumnKey> {
    pub headers: Vec<HeaderCell<C>>,
    pub rows: Vec<RenderedRow>,
    /// Rows matching search and filters (the server's total in delegated mode).
    pub total_count: usize,
    /// Rows supplied before narrowing. Equal to `total_count` in delegated mode.
    pub unfiltered_count: usize,
    /// Pagination footer; `None` while virtualized.
    pub page: Option<PageInfo>,
    /// Height of the full-size spacer while virtualized.
    pub spacer_height: Option<u64>,
}

impl<C: ColumnKey> TableView<C> {
    /// Whether search or filters hide some of the supplied rows.
    pub fn is_filtered(&self) -> bool {
        self.total_count != self.unfiltered_count
    }
}

/// A table instance: columns, query state and rendering for one row type.
pub struct DataTable<R: TableRow> {
    columns: Columns<R::Column>,
    state: QueryState<R::Column>,
    mode: TableMode<R::Column>,
    renderer: Renderer<R>,
    /// Filter keys accepted in delegated mode beyond the filterable columns.
    external_filters: Vec<R::Column>,
    virtual_window: Option<VirtualWindow>,
    scroll_offset: u64,
    sequencer: RequestSequencer,
    pagination: Option<PaginationInfo>,
    last_total: usize,
}

impl<R: TableRow> DataTable<R> {
    /// A table that processes in-memory rows itself.
    pub fn local(columns: Columns<R::Column>) -> Self {
        Self::with_mode(columns, TableMode::Local)
    }

    /// A table that forwards query changes to `source`.
    pub fn delegated(columns: Columns<R::Column>, source: Box<dyn DelegatedSource<R::Column>>) -> Self {
        Self::with_mode(columns, TableMode::Delegated(source))
    }

    fn with_mode(columns: Columns<R::Column>, mode: TableMode<R::Column>) -> Self {
        Self {
            columns,
            state: QueryState::default(),
            mode,
            renderer: Renderer::new(),
            external_filters: Vec::new(),
            virtual_window: None,
            scroll_offset: 0,
            sequencer: RequestSequencer::new(),
            pagination: None,
            last_total: 0,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Result<Self, TableError> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize);
        }
        self.state.page_size = page_size;
        Ok(self)
    }

    pub fn with_renderer(mut self, renderer: Renderer<R>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Extra filter keys the delegated source understands.
    pub fn with_external_filters(mut self, keys: Vec<R::Column>) -> Self {
        self.external_filters = keys;
        self
    }

    pub fn with_virtual_window(mut self, window: VirtualWindow) -> Self {
        self.virtual_window = Some(window);
        self
    }

    // === Accessors ===

    pub fn columns(&self) -> &Columns<R::Column> {
        &self.columns
    }

    pub fn query(&self) -> &QueryState<R::Column> {
        &self.state
    }

    pub fn mode(&self) -> &TableMode<R::Column> {
        &self.mode
    }

    pub fn is_delegated(&self) -> bool {
        matches!(self.mode, TableMode::Delegated(_))
    }

    pub fn pagination(&self) -> Option<PaginationInfo> {
        self.pagination
    }

    pub fn is_virtualized(&self) -> bool {
        self.virtual_window.is_some()
    }

    pub fn virtual_window(&self) -> Option<VirtualWindow> {
        self.virtual_window
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Whether `key` may be used as a filter in the current mode.
    pub fn accepts_filter(&self, key: R::Column) -> bool {
        self.columns.is_filterable(key) || (self.is_delegated() && self.external_filters.contains(&key))
    }

    /// Filter keys offered to the user.
    pub fn filter_keys(&self) -> Vec<R::Column> {
        let mut keys = self.columns.filterable_keys();
        if self.is_delegated() {
            for key in &self.external_filters {
                if !keys.contains(key) {
                    keys.push(*key);
                }
            }
        }
        keys
    }

    /// Total pages as last observed by [`view`](Self::view) or reported by the source.
    pub fn total_pages(&self) -> usize {
        match (&self.mode, self.pagination) {
            (TableMode::Delegated(_), Some(info)) => info.total_pages,
            _ => self.state.total_pages(self.last_total),
        }
    }

    // === Query setters ===

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
        self.forward_reset(|source, request| {
            source.on_search(request, request.state.search_text());
        });
    }

    pub fn set_filter(&mut self, key: R::Column, value: impl Into<CellValue>) -> Result<(), TableError> {
        if !self.accepts_filter(key) {
            return Err(TableError::NotFilterable {
                column: key.as_str().to_string(),
            });
        }
        self.state.set_filter(key, value.into());
        self.forward_filters();
        Ok(())
    }

    pub fn clear_filter(&mut self, key: R::Column) {
        if self.state.filters.shift_remove(&key).is_some() {
            self.forward_filters();
        }
    }

    pub fn clear_filters(&mut self) {
        if !self.state.filters.is_empty() {
            self.state.filters.clear();
            self.forward_filters();
        }
    }

    /// Sort by `column`: flips direction on the sorted column, otherwise
    /// starts ascending.
    pub fn toggle_sort(&mut self, column: R::Column) -> Result<(), TableError> {
        if !self.columns.is_sortable(column) {
            return Err(TableError::NotSortable {
                column: column.as_str().to_string(),
            });
        }
        self.state.toggle_sort(column);
        self.forward_sort();
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        if self.state.sort_column.take().is_some() {
            self.state.sort_direction = Default::default();
            self.forward_sort();
        }
    }

    /// Jump to `page` (1-based).
    pub fn set_page(&mut self, page: usize) -> Result<(), TableError> {
        if page == 0 {
            return Err(TableError::InvalidPage { page });
        }
        self.state.page = page;
        self.forward(|source, request| source.on_page_change(request, page));
        Ok(())
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), TableError> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize);
        }
        self.state.page_size = page_size;
        self.forward_reset(|source, request| source.on_limit_change(request, page_size));
        Ok(())
    }

    /// Pull a page stranded past the end back onto the last page.
    pub fn clamp_page(&mut self, total: usize) {
        let total_pages = self.state.total_pages(total).max(1);
        if self.state.page > total_pages {
            self.state.page = total_pages;
        }
    }

    pub fn next_page(&mut self) -> bool {
        let page = self.state.page;
        page < self.total_pages() && self.set_page(page + 1).is_ok()
    }

    pub fn prev_page(&mut self) -> bool {
        let page = self.state.page;
        page > 1 && self.set_page(page - 1).is_ok()
    }

    pub fn first_page(&mut self) -> bool {
        self.state.page != 1 && self.set_page(1).is_ok()
    }

    pub fn last_page(&mut self) -> bool {
        let last = self.total_pages();
        last > 0 && self.state.page != last && self.set_page(last).is_ok()
    }

    // === Delegated responses ===

    /// Ask the delegated source to fetch the current query again.
    ///
    /// Returns the sequence number of the request, or `None` in local mode.
    pub fn reload(&mut self) -> Option<RequestSeq> {
        let page = self.state.page;
        self.forward(|source, request| source.on_page_change(request, page))
    }

    /// Record the pagination info of a delegated response.
    ///
    /// Returns `false` (and ignores `info`) when `seq` is not the latest
    /// request; the caller must then drop the rows of that response too.
    pub fn accept_pagination(&mut self, seq: RequestSeq, info: PaginationInfo) -> bool {
        if !self.sequencer.is_current(seq) {
            log::debug!(
                "Discarding stale response {:?} (latest {:?})",
                seq,
                self.sequencer.latest()
            );
            return false;
        }
        self.pagination = Some(info);
        true
    }

    /// Whether a delegated response tagged `seq` is still wanted.
    pub fn is_current(&self, seq: RequestSeq) -> bool {
        self.sequencer.is_current(seq)
    }

    // === Virtualization ===

    /// Enable or disable virtualized scrolling. Pagination is suppressed
    /// while a window is set.
    pub fn set_virtual_window(&mut self, window: Option<VirtualWindow>) {
        self.virtual_window = window;
        self.scroll_offset = 0;
    }

    pub fn set_container_height(&mut self, height: u32) {
        if let Some(window) = self.virtual_window.as_mut() {
            window.set_container_height(height);
        }
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        let max = self
            .virtual_window
            .map(|w| w.max_scroll_offset(self.last_total))
            .unwrap_or(0);
        self.scroll_offset = offset.min(max);
    }

    /// Scroll by whole rows (negative scrolls up).
    pub fn scroll_rows(&mut self, delta: i64) {
        let Some(window) = self.virtual_window else {
            return;
        };
        let step = delta.unsigned_abs().saturating_mul(u64::from(window.item_height()));
        let target = if delta < 0 {
            self.scroll_offset.saturating_sub(step)
        } else {
            self.scroll_offset.saturating_add(step)
        };
        self.set_scroll_offset(target);
    }

    // === Rendering ===

    /// Build the view for this render pass.
    ///
    /// In local mode `rows` is the full data set; in delegated mode it is the
    /// page last returned by the source.
    pub fn view(&mut self, rows: &[R]) -> TableView<R::Column> {
        let headers = self.renderer.headers(&self.columns, &self.state);

        let (matched, total_count, unfiltered_count) = match &self.mode {
            TableMode::Local => {
                let windowing = if self.virtual_window.is_some() {
                    Windowing::All
                } else {
                    Windowing::Paginate
                };
                let mut processed = processor::process(rows, &self.state, &self.columns, windowing);
                if windowing == Windowing::Paginate
                    && processed.rows.is_empty()
                    && processed.total_count > 0
                {
                    self.clamp_page(processed.total_count);
                    processed = processor::process(rows, &self.state, &self.columns, windowing);
                }
                let total = processed.total_count;
                (processed.rows, total, rows.len())
            }
            TableMode::Delegated(_) => {
                let given: Vec<ProcessedRow<'_, R>> = rows
                    .iter()
                    .enumerate()
                    .map(|(index, row)| ProcessedRow { index, row })
                    .collect();
                let total = self.pagination.map(|p| p.total).unwrap_or(rows.len());
                (given, total, total)
            }
        };

        self.last_total = match (&self.mode, self.virtual_window) {
            (TableMode::Delegated(_), Some(_)) => matched.len(),
            _ => total_count,
        };

        if let Some(window) = self.virtual_window {
            self.set_scroll_offset(self.scroll_offset);
            let slice = window.slice(self.scroll_offset, matched.len());
            let rendered = matched[slice.start_index..slice.end_index]
                .iter()
                .zip(slice.positions())
                .map(|(row, (_, offset))| self.renderer.row(&self.columns, *row, Some(offset)))
                .collect();
            return TableView {
                headers,
                rows: rendered,
                total_count,
                unfiltered_count,
                page: None,
                spacer_height: Some(slice.total_height),
            };
        }

        let page = match (&self.mode, self.pagination) {
            (TableMode::Delegated(_), Some(info)) => {
                PageInfo::new(info.page.max(1), info.limit, info.total, info.total_pages, matched.len())
            }
            _ => PageInfo::new(
                self.state.page,
                self.state.page_size,
                total_count,
                self.state.total_pages(total_count),
                matched.len(),
            ),
        };

        let rendered = matched
            .iter()
            .map(|row| self.renderer.row(&self.columns, *row, None))
            .collect();

        TableView {
            headers,
            rows: rendered,
            total_count,
            unfiltered_count,
            page: Some(page),
            spacer_height: None,
        }
    }

    // === Delegation helpers ===

    fn forward_filters(&mut self) {
        self.forward_reset(|source, request| source.on_filter(request, request.state.filters()));
    }

    fn forward_sort(&mut self) {
        self.forward_reset(|source, request| {
            source.on_sort(request, request.state.sort_column(), request.state.sort_direction());
        });
    }

    /// Forward a change that invalidates the current page position.
    fn forward_reset<F>(&mut self, call: F) -> Option<RequestSeq>
    where
        F: FnOnce(&mut dyn DelegatedSource<R::Column>, &DelegatedRequest<'_, R::Column>),
    {
        if self.is_delegated() {
            self.state.page = 1;
        }
        self.forward(call)
    }

    fn forward<F>(&mut self, call: F) -> Option<RequestSeq>
    where
        F: FnOnce(&mut dyn DelegatedSource<R::Column>, &DelegatedRequest<'_, R::Column>),
    {
        let TableMode::Delegated(source) = &mut self.mode else {
            return None;
        };
        let seq = self.sequencer.next();
        log::debug!("Delegating query change as request {:?}", seq);
        let request = DelegatedRequest {
            seq,
            state: &self.state,
        };
        call(source.as_mut(), &request);
        Some(seq)
    }
}
