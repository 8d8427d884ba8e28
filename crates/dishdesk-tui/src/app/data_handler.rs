//! Async data loading with tokio tasks.

use super::App;
use crate::action::{AppAction, DataRequest, DeleteTarget};
use crate::components::ActiveTab;

const NO_SERVICE: &str = "API URL not configured (set DISHDESK_API_URL or run `dishdesk config set --api-url`)";

impl App {
    /// Load a tab's data unless something is already shown.
    pub(crate) fn request_tab_data(&mut self, tab: ActiveTab) {
        match tab {
            ActiveTab::Orders => {
                if self.orders.rows.is_idle() {
                    self.refresh_orders();
                }
            }
            ActiveTab::Foods => {
                if self.foods.rows.is_idle() {
                    let _ = self.action_tx.send(AppAction::LoadData(DataRequest::Foods));
                }
            }
            ActiveTab::Categories => {
                if self.categories.rows.is_idle() {
                    let _ = self.action_tx.send(AppAction::LoadData(DataRequest::Categories));
                }
            }
            ActiveTab::Customers => {
                if self.customers.rows.is_idle() {
                    let _ = self.action_tx.send(AppAction::LoadData(DataRequest::Customers));
                }
            }
        }
    }

    /// Fetch the active tab again.
    pub(crate) fn refresh_active_tab(&mut self) {
        match self.active_tab {
            ActiveTab::Orders => self.refresh_orders(),
            ActiveTab::Foods => self.handle_data_request(DataRequest::Foods),
            ActiveTab::Categories => self.handle_data_request(DataRequest::Categories),
            ActiveTab::Customers => self.handle_data_request(DataRequest::Customers),
        }
    }

    /// Re-issue the current orders query under a new sequence number.
    pub(crate) fn refresh_orders(&mut self) {
        self.orders.table.reload();
        self.poll_order_query();
    }

    /// Fetch the latest orders query change, if the table produced one.
    pub(crate) fn poll_order_query(&mut self) {
        if let Some((seq, query)) = self.orders_latch.take() {
            self.handle_data_request(DataRequest::Orders(seq, query));
        }
    }

    /// Spawn the fetch for `request`; its result comes back as an action.
    pub(crate) fn handle_data_request(&mut self, request: DataRequest) {
        let Some(service) = self.service.clone() else {
            self.set_load_error(&request, NO_SERVICE.to_string());
            return;
        };

        let tx = self.action_tx.clone();
        self.status_bar
            .set_message(format!("Loading {}...", request.label()));

        match request {
            DataRequest::Orders(seq, query) => {
                self.orders.set_loading();
                tokio::spawn(async move {
                    let action = match service.fetch_orders(&query).await {
                        Ok(page) => AppAction::OrdersLoaded(seq, page),
                        Err(e) => AppAction::LoadFailed(DataRequest::Orders(seq, query), e),
                    };
                    let _ = tx.send(action);
                });
            }
            DataRequest::Foods => {
                self.foods.set_loading();
                tokio::spawn(async move {
                    let action = match service.fetch_foods().await {
                        Ok(foods) => AppAction::FoodsLoaded(foods),
                        Err(e) => AppAction::LoadFailed(DataRequest::Foods, e),
                    };
                    let _ = tx.send(action);
                });
            }
            DataRequest::Categories => {
                self.categories.set_loading();
                tokio::spawn(async move {
                    let action = match service.fetch_categories().await {
                        Ok(categories) => AppAction::CategoriesLoaded(categories),
                        Err(e) => AppAction::LoadFailed(DataRequest::Categories, e),
                    };
                    let _ = tx.send(action);
                });
            }
            DataRequest::Customers => {
                self.customers.set_loading();
                tokio::spawn(async move {
                    let action = match service.fetch_customers().await {
                        Ok(customers) => AppAction::CustomersLoaded(customers),
                        Err(e) => AppAction::LoadFailed(DataRequest::Customers, e),
                    };
                    let _ = tx.send(action);
                });
            }
        }
    }

    pub(crate) fn handle_delete(&mut self, target: DeleteTarget) {
        let Some(service) = self.service.clone() else {
            self.status_bar.set_message(format!("Error: {}", NO_SERVICE));
            return;
        };

        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match service.delete(&target).await {
                Ok(()) => AppAction::Deleted(target),
                Err(e) => AppAction::DeleteFailed(target, e),
            };
            let _ = tx.send(action);
        });
    }

    pub(crate) fn set_load_error(&mut self, request: &DataRequest, error: String) {
        self.status_bar.set_message(format!("Error: {}", error));
        match request {
            DataRequest::Orders(..) => self.orders.set_error(error),
            DataRequest::Foods => self.foods.set_error(error),
            DataRequest::Categories => self.categories.set_error(error),
            DataRequest::Customers => self.customers.set_error(error),
        }
    }
}
