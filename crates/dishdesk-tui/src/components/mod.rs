//! UI Components for dishdesk-tui.

use ratatui::Frame;
use ratatui::layout::Rect;

mod content;
mod help_overlay;
mod modal_area;
mod status_bar;
pub mod styles;
mod toast;

pub use content::{PanelOutcome, TablePage, TablePanel};
pub use help_overlay::HelpOverlay;
pub use status_bar::StatusBar;
pub use toast::ToastNotifier;

/// Active tab for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Orders,
    Foods,
    Categories,
    Customers,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 4] = [
        ActiveTab::Orders,
        ActiveTab::Foods,
        ActiveTab::Categories,
        ActiveTab::Customers,
    ];

    pub fn index(self) -> usize {
        match self {
            ActiveTab::Orders => 0,
            ActiveTab::Foods => 1,
            ActiveTab::Categories => 2,
            ActiveTab::Customers => 3,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// Get the next tab (cycling).
    pub fn next(self) -> Self {
        Self::from_index((self.index() + 1) % Self::ALL.len())
    }

    /// Get the previous tab (cycling).
    pub fn previous(self) -> Self {
        Self::from_index((self.index() + Self::ALL.len() - 1) % Self::ALL.len())
    }

    /// Get display label with icon.
    pub fn label(self) -> &'static str {
        match self {
            ActiveTab::Orders => "🧾 Orders",
            ActiveTab::Foods => "🍕 Foods",
            ActiveTab::Categories => "📁 Categories",
            ActiveTab::Customers => "👥 Customers",
        }
    }
}

/// Common trait for all UI components.
pub trait Component {
    /// Takes `&mut self` to support stateful widgets like TableState.
    fn draw(&mut self, frame: &mut Frame, area: Rect, palette: &styles::Palette);
}
