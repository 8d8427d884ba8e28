//! Action handling for the application.

use super::App;
use crate::action::{AppAction, DataRequest, DeleteTarget};

impl App {
    /// Apply one action on the UI thread.
    pub(crate) fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::LoadData(request) => {
                self.handle_data_request(request);
            }
            AppAction::OrdersLoaded(seq, page) => {
                if !self.orders.table.is_current(seq) {
                    log::debug!("Dropping stale orders response {:?}", seq);
                    return;
                }
                if let Some(info) = page.pagination {
                    self.orders.table.accept_pagination(seq, info);
                }
                let count = page.data.len();
                self.orders.set_rows(page.data);
                self.status_bar.set_message(format!("Loaded {} orders", count));
            }
            AppAction::FoodsLoaded(foods) => {
                let count = foods.len();
                self.foods.set_rows(foods);
                self.status_bar.set_message(format!("Loaded {} foods", count));
            }
            AppAction::CategoriesLoaded(categories) => {
                let count = categories.len();
                self.categories.set_rows(categories);
                self.status_bar
                    .set_message(format!("Loaded {} categories", count));
            }
            AppAction::CustomersLoaded(customers) => {
                let count = customers.len();
                self.customers.set_rows(customers);
                self.status_bar
                    .set_message(format!("Loaded {} customers", count));
            }
            AppAction::LoadFailed(request, error) => {
                if let DataRequest::Orders(seq, _) = &request {
                    if !self.orders.table.is_current(*seq) {
                        log::debug!("Ignoring failure of stale orders request {:?}: {}", seq, error);
                        return;
                    }
                }
                log::warn!("Loading {} failed: {}", request.label(), error);
                self.set_load_error(&request, error);
            }
            AppAction::Delete(target) => {
                self.status_bar.set_message(format!("Deleting {}...", target));
                self.handle_delete(target);
            }
            AppAction::Deleted(target) => {
                log::info!("Deleted {}", target);
                self.status_bar.set_message(format!("Deleted {}", target));
                let reload = match target {
                    DeleteTarget::Food(_) => DataRequest::Foods,
                    DeleteTarget::Category(_) => DataRequest::Categories,
                };
                let _ = self.action_tx.send(AppAction::LoadData(reload));
            }
            AppAction::DeleteFailed(target, error) => {
                log::warn!("Deleting {} failed: {}", target, error);
                self.status_bar.set_message(format!("Error: {}", error));
            }
            AppAction::OrderAdded(event) => {
                if let Some(notification) = self.listener.handle(&event) {
                    self.status_bar.set_message(notification.message());
                    self.orders_dirty = true;
                }
            }
        }
    }
}
