//! Layout constants for dishdesk-tui.

/// Main layout constants.
pub mod main {
    /// Header panel height in rows (includes tab bar).
    pub const HEADER_HEIGHT: u16 = 3;

    /// Status bar height in rows.
    pub const STATUS_BAR_HEIGHT: u16 = 3;
}

/// Table panel constants.
pub mod table {
    /// Height of one table row in terminal lines.
    pub const ROW_HEIGHT: u32 = 1;

    /// Lines used by the column header.
    pub const HEADER_LINES: u16 = 1;

    /// Width given to columns without a fixed width.
    pub const FLEX_MIN_WIDTH: u16 = 10;
}

/// New-order toast constants.
pub mod toast {
    pub const WIDTH: u16 = 52;

    /// Toasts drawn at once; older ones wait their turn.
    pub const MAX_VISIBLE: usize = 3;

    /// Seconds a toast stays on screen.
    pub const TTL_SECS: u64 = 6;
}
