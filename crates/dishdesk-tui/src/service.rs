//! Service integration layer for dishdesk-core.
//!
//! Wraps the dashboard REST client for sharing across tokio tasks and turns
//! its errors into display strings.

use std::sync::Arc;

use dishdesk_core::api::client::{DashboardApi, DashboardClient, OrderQuery};
use dishdesk_core::api::models::{Category, Customer, FoodItem, Order, Page};
use dishdesk_core::storage::config::Config;

use crate::action::DeleteTarget;

/// Generic loading state for async data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// Loading failed with error message
    Error(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, LoadState::Idle)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Shared handle to the dashboard API.
#[derive(Clone)]
pub struct ServiceClient {
    api: Arc<dyn DashboardApi>,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: String) -> Result<Self, String> {
        let client =
            DashboardClient::new(base_url.clone()).map_err(|e| format!("Failed to create client: {}", e))?;
        Ok(Self::from_api(Arc::new(client), base_url))
    }

    /// Use any [`DashboardApi`] implementation.
    pub fn from_api(api: Arc<dyn DashboardApi>, base_url: String) -> Self {
        Self { api, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_orders(&self, query: &OrderQuery) -> Result<Page<Order>, String> {
        self.api
            .list_orders(query)
            .await
            .map_err(|e| format!("Failed to fetch orders: {}", e.display_friendly()))
    }

    pub async fn fetch_foods(&self) -> Result<Vec<FoodItem>, String> {
        self.api
            .list_foods()
            .await
            .map_err(|e| format!("Failed to fetch foods: {}", e.display_friendly()))
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, String> {
        self.api
            .list_categories()
            .await
            .map_err(|e| format!("Failed to fetch categories: {}", e.display_friendly()))
    }

    pub async fn fetch_customers(&self) -> Result<Vec<Customer>, String> {
        self.api
            .list_customers()
            .await
            .map_err(|e| format!("Failed to fetch customers: {}", e.display_friendly()))
    }

    pub async fn delete(&self, target: &DeleteTarget) -> Result<(), String> {
        let result = match target {
            DeleteTarget::Food(id) => self.api.delete_food(id).await,
            DeleteTarget::Category(id) => self.api.delete_category(id).await,
        };
        result.map_err(|e| format!("Failed to delete {}: {}", target, e.display_friendly()))
    }
}

/// Build the service client from the resolved API URL.
///
/// `Ok(None)` means no URL is configured; the UI still starts.
pub fn init_service(config: &Config) -> Result<Option<Arc<ServiceClient>>, String> {
    match config.resolve_api_url(None) {
        Some(url) => ServiceClient::new(url).map(|client| Some(Arc::new(client))),
        None => Ok(None),
    }
}

/// REST connection status for the header
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionStatus {
    /// No API URL configured
    #[default]
    Disconnected,
    Connected(String),
    Error(String),
}

/// Realtime subscription status for the header
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RealtimeStatus {
    /// Notifications disabled or no realtime URL
    #[default]
    Off,
    Listening,
    Error(String),
}
