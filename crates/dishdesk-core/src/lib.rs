//! # dishdesk-core
//!
//! Core library for the dishdesk food-ordering admin dashboard.
//!
//! This crate provides the shared functionality used by both `dishdesk` (CLI)
//! and `dishdesk-tui`: a generic data-table engine, the realtime new-order
//! listener, and the REST client for the ordering backend.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dishdesk_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> dishdesk_core::Result<()> {
//!     let config = Config::load(None)?;
//!     let client = DashboardClient::new("http://localhost:5000".to_string())?;
//!
//!     let foods = client.list_foods().await?;
//!     let mut table = DataTable::<FoodItem>::local(FoodItem::columns()?);
//!     table.set_page_size(config.page_size)?;
//!     table.set_search("pizza");
//!
//!     println!("{}", TableDisplay::new().render(&table.view(&foods)));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Table engine  │  Notifications │  query state, processing, rendering,
//! │                    │                │  realtime child-added listener
//! ├─────────────────────────────────────┤
//! │           API Layer                 │  REST client, resource models
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  configuration, seen-order set
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  text formatting, error helpers
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`table`]: Data-table engine (local and delegated modes, virtualization)
//! - [`notify`]: Realtime stores and the new-order notification listener
//! - [`modal`]: Page-owned modal state
//! - [`api`]: REST client and data models
//! - [`storage`]: Configuration and persisted state
//! - [`display`]: Terminal table output
//! - [`error`]: Hierarchical error system with severity levels

pub use error::AppError;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use dishdesk_core::prelude::*;
/// ```
pub mod prelude {
    // Error handling
    pub use crate::Result;
    pub use crate::error::AppError;

    // Table engine
    pub use crate::table::{
        CellValue, ColumnDef, ColumnKey, Columns, DataTable, DelegatedRequest, DelegatedSource, SortDirection,
        TableRow, TableView, VirtualWindow,
    };

    // API client and models
    pub use crate::api::client::{DashboardApi, DashboardClient, OrderQuery};
    pub use crate::api::models::{Category, Customer, FoodItem, Order, OrderStatus, Page};

    // Notifications
    pub use crate::notify::{Notifier, OrderNotification, OrderNotificationListener, RealtimeStore};

    // Storage
    pub use crate::storage::config::Config;

    // Display utilities
    pub use crate::display::TableDisplay;
}

/// Generic data-table engine.
pub mod table;

/// Realtime new-order notifications.
///
/// - [`notify::realtime`]: store interface, subscriptions, in-memory store
/// - [`notify::firebase`]: Firebase REST streaming store
pub mod notify;

/// Explicit modal state owned by a page.
pub mod modal;

/// API layer - REST client and data models.
///
/// - [`api::client`]: HTTP client for the ordering backend
/// - [`api::models`]: Resources and their table columns
pub mod api;

/// Storage layer - configuration and persisted notification state.
///
/// - [`storage::config`]: TOML configuration with environment fallbacks
/// - [`storage::seen`]: Notified-order set
pub mod storage;

/// Utilities layer - shared helpers.
pub mod utils;

/// Display layer - terminal output formatting.
pub mod display;

/// Error handling - hierarchical error system.
///
/// - Domain-specific error variants (API, Storage, Table, Realtime, CLI)
/// - Severity levels (Critical, High, Medium, Low)
pub mod error;

/// Convenient Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
