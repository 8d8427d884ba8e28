//! Fixed-height virtualization window.
//!
//! Only the rows intersecting the viewport (plus one trailing row) are
//! rendered, each positioned at `index * item_height`; a spacer of
//! `row_count * item_height` keeps the scrollbar proportional to the full set.

use crate::error::TableError;

/// Viewport geometry for virtualized rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualWindow {
    item_height: u32,
    container_height: u32,
}

/// The slice of rows to render for one scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualSlice {
    pub start_index: usize,
    /// Exclusive.
    pub end_index: usize,
    /// Height of the full-size spacer.
    pub total_height: u64,
    item_height: u32,
}

impl VirtualWindow {
    pub fn new(item_height: u32, container_height: u32) -> Result<Self, TableError> {
        if item_height == 0 {
            return Err(TableError::InvalidItemHeight);
        }
        Ok(Self {
            item_height,
            container_height,
        })
    }

    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    pub fn container_height(&self) -> u32 {
        self.container_height
    }

    /// Resize the viewport (terminal resize, layout change).
    pub fn set_container_height(&mut self, container_height: u32) {
        self.container_height = container_height;
    }

    /// Whole rows that fit in the viewport.
    pub fn visible_count(&self) -> usize {
        (self.container_height / self.item_height) as usize
    }

    /// Largest useful scroll offset for `row_count` rows.
    pub fn max_scroll_offset(&self, row_count: usize) -> u64 {
        let total = row_count as u64 * u64::from(self.item_height);
        total.saturating_sub(u64::from(self.container_height))
    }

    /// Compute the rendered slice for a scroll offset.
    pub fn slice(&self, scroll_offset: u64, row_count: usize) -> VirtualSlice {
        let first_visible = (scroll_offset / u64::from(self.item_height)) as usize;
        let start_index = first_visible.min(row_count);
        let end_index = start_index
            .saturating_add(self.visible_count())
            .saturating_add(1)
            .min(row_count);

        VirtualSlice {
            start_index,
            end_index,
            total_height: row_count as u64 * u64::from(self.item_height),
            item_height: self.item_height,
        }
    }
}

impl VirtualSlice {
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Absolute offset of a row.
    pub fn offset_of(&self, index: usize) -> u64 {
        index as u64 * u64::from(self.item_height)
    }

    /// Row indices in this slice paired with their absolute offsets.
    pub fn positions(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        (self.start_index..self.end_index).map(|index| (index, self.offset_of(index)))
    }
}
