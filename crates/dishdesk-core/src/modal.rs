//! Page-owned modal state.
//!
//! Each page holds one [`ModalManager`], so at most one delete confirmation
//! is pending at a time and no state is shared between pages.

/// A pending delete confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteConfirmation<T> {
    pub target: T,
    /// Shown in the prompt, e.g. the item name.
    pub label: String,
}

impl<T> DeleteConfirmation<T> {
    pub fn prompt(&self) -> String {
        format!("Delete '{}'? This cannot be undone.", self.label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalManager<T> {
    pending: Option<DeleteConfirmation<T>>,
}

impl<T> Default for ModalManager<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> ModalManager<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a confirmation, replacing (and returning) any pending one.
    pub fn open_delete(&mut self, target: T, label: impl Into<String>) -> Option<DeleteConfirmation<T>> {
        self.pending.replace(DeleteConfirmation {
            target,
            label: label.into(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&DeleteConfirmation<T>> {
        self.pending.as_ref()
    }

    /// Close and hand back the confirmed target.
    pub fn confirm(&mut self) -> Option<T> {
        self.pending.take().map(|c| c.target)
    }

    /// Close without acting. Returns whether anything was open.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
