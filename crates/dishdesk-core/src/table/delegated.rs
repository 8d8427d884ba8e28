//! Delegated ("API") mode.
//!
//! The table forwards every query change to a [`DelegatedSource`] instead of
//! processing rows itself. Each forwarded change is tagged with a monotonic
//! [`RequestSeq`]; only the response to the latest request is applied, so a
//! slow response to an older query can never overwrite a newer one.

use serde::{Deserialize, Serialize};

use super::{CellValue, ColumnKey, QueryState, SortDirection};
use indexmap::IndexMap;

/// Sequence number of one delegated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestSeq(pub u64);

/// Issues request sequence numbers and recognizes the latest one.
#[derive(Debug, Default, Clone)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next sequence number; it becomes the only current one.
    pub fn next(&mut self) -> RequestSeq {
        self.latest = self.latest.wrapping_add(1);
        RequestSeq(self.latest)
    }

    pub fn latest(&self) -> RequestSeq {
        RequestSeq(self.latest)
    }

    pub fn is_current(&self, seq: RequestSeq) -> bool {
        seq.0 == self.latest
    }
}

/// Server-side paging info, displayed as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Context handed to every delegated callback.
#[derive(Debug)]
pub struct DelegatedRequest<'a, C: ColumnKey> {
    pub seq: RequestSeq,
    /// Full query after the change was applied.
    pub state: &'a QueryState<C>,
}

/// Receiver of query changes in delegated mode.
///
/// Calls are fire-and-forget: the implementor re-fetches and later hands the
/// rows back to its owner together with `request.seq`. Fetch failures are the
/// implementor's concern; the table keeps no error state for them.
pub trait DelegatedSource<C: ColumnKey> {
    fn on_search(&mut self, request: &DelegatedRequest<'_, C>, query: &str);

    fn on_filter(&mut self, request: &DelegatedRequest<'_, C>, filters: &IndexMap<C, CellValue>);

    fn on_sort(&mut self, request: &DelegatedRequest<'_, C>, column: Option<C>, direction: SortDirection);

    fn on_page_change(&mut self, request: &DelegatedRequest<'_, C>, page: usize);

    fn on_limit_change(&mut self, request: &DelegatedRequest<'_, C>, limit: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_only_latest_is_current() {
        let mut sequencer = RequestSequencer::new();
        let first = sequencer.next();
        let second = sequencer.next();
        assert!(first < second);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
        assert_eq!(sequencer.latest(), second);
    }

    #[test]
    fn test_pagination_info_deserializes_camel_case() {
        let info: PaginationInfo =
            serde_json::from_str(r#"{"page":2,"limit":10,"total":42,"totalPages":5}"#).unwrap();
        assert_eq!(
            info,
            PaginationInfo {
                page: 2,
                limit: 10,
                total: 42,
                total_pages: 5
            }
        );
    }
}
