//! Type definitions for the table panel.

/// What the panel is currently reading keys for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode<C> {
    #[default]
    Normal,
    /// Typing into the search box; every keystroke updates the query
    Search,
    /// Step 1 of the filter modal: choose a column
    FilterColumn { selection: usize },
    /// Step 2 of the filter modal: type the value
    FilterValue { column: C, text: String },
    /// Sort modal: choose a column; picking the sorted one flips direction
    Sort { selection: usize },
}

/// Result of a key press handed back to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutcome {
    /// Not a panel key; the app may handle it
    Ignored,
    Handled,
    /// Message for the status bar
    Status(String),
    /// A delete was confirmed in the page modal
    Delete { id: String, label: String },
}
