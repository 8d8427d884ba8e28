//! Application actions for event-driven architecture.
//!
//! Background tasks and realtime callbacks never touch UI state directly;
//! they send an [`AppAction`] that the run loop applies on the UI thread.

use std::fmt;

use dishdesk_core::api::client::OrderQuery;
use dishdesk_core::api::models::{Category, Customer, FoodItem, Order, Page};
use dishdesk_core::notify::ChildAdded;
use dishdesk_core::table::RequestSeq;

#[derive(Debug, Clone)]
pub enum AppAction {
    /// Load data from API
    LoadData(DataRequest),

    /// Orders page for the request tagged with the sequence number
    OrdersLoaded(RequestSeq, Page<Order>),

    FoodsLoaded(Vec<FoodItem>),

    CategoriesLoaded(Vec<Category>),

    CustomersLoaded(Vec<Customer>),

    /// Data loading failed with context and error message
    LoadFailed(DataRequest, String),

    /// Delete confirmed in a page modal
    Delete(DeleteTarget),

    Deleted(DeleteTarget),

    DeleteFailed(DeleteTarget, String),

    /// A child appeared under the realtime orders path
    OrderAdded(ChildAdded),
}

/// Data loading requests
#[derive(Debug, Clone, PartialEq)]
pub enum DataRequest {
    Orders(RequestSeq, OrderQuery),
    Foods,
    Categories,
    Customers,
}

impl DataRequest {
    pub fn label(&self) -> &'static str {
        match self {
            DataRequest::Orders(..) => "orders",
            DataRequest::Foods => "foods",
            DataRequest::Categories => "categories",
            DataRequest::Customers => "customers",
        }
    }
}

/// What a confirmed delete removes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Food(String),
    Category(String),
}

impl fmt::Display for DeleteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteTarget::Food(id) => write!(f, "food {}", id),
            DeleteTarget::Category(id) => write!(f, "category {}", id),
        }
    }
}
