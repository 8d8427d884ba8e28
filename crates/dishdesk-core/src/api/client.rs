use crate::api::models::{Category, Customer, FoodItem, ListResponse, Order, OrderColumn, OrderStatus, Page};
use crate::error::{ApiError, AppError};
use crate::table::{CellValue, ColumnKey, DelegatedRequest, DelegatedSource, QueryState, RequestSeq, SortDirection};
use crate::utils::error_helpers::*;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("dishdesk/", env!("CARGO_PKG_VERSION"));

/// Server-side parameters for the orders list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderQuery {
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub sort: Option<(OrderColumn, SortDirection)>,
}

impl OrderQuery {
    /// Build from a delegated table's query state.
    ///
    /// A status filter that is not a known status is dropped.
    pub fn from_state(state: &QueryState<OrderColumn>) -> Self {
        let status = state
            .filter(OrderColumn::Status)
            .and_then(|value| value.coerce_string())
            .and_then(|s| s.parse().ok());
        let search = Some(state.search_text().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            page: state.page(),
            limit: state.page_size(),
            search,
            status,
            sort: state.sort(),
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        if let Some((column, direction)) = self.sort {
            params.push(("sortBy", column.as_str().to_string()));
            params.push(("sortOrder", direction.as_str().to_string()));
        }
        params
    }
}

/// Delegated source for the orders table.
///
/// Remembers only the latest query change so the owner can fetch it and tag
/// the response with its sequence number; earlier changes are superseded.
#[derive(Debug, Clone, Default)]
pub struct OrderQueryLatch {
    pending: Arc<Mutex<Option<(RequestSeq, OrderQuery)>>>,
}

impl OrderQueryLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the latest unfetched query, if any.
    pub fn take(&self) -> Option<(RequestSeq, OrderQuery)> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    fn store(&self, request: &DelegatedRequest<'_, OrderColumn>) {
        let query = OrderQuery::from_state(request.state);
        *self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some((request.seq, query));
    }
}

impl DelegatedSource<OrderColumn> for OrderQueryLatch {
    fn on_search(&mut self, request: &DelegatedRequest<'_, OrderColumn>, _query: &str) {
        self.store(request);
    }

    fn on_filter(&mut self, request: &DelegatedRequest<'_, OrderColumn>, _filters: &IndexMap<OrderColumn, CellValue>) {
        self.store(request);
    }

    fn on_sort(&mut self, request: &DelegatedRequest<'_, OrderColumn>, _column: Option<OrderColumn>, _direction: SortDirection) {
        self.store(request);
    }

    fn on_page_change(&mut self, request: &DelegatedRequest<'_, OrderColumn>, _page: usize) {
        self.store(request);
    }

    fn on_limit_change(&mut self, request: &DelegatedRequest<'_, OrderColumn>, _limit: usize) {
        self.store(request);
    }
}

/// Dashboard REST operations.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn list_orders(&self, query: &OrderQuery) -> Result<Page<Order>, AppError>;

    async fn list_foods(&self) -> Result<Vec<FoodItem>, AppError>;

    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError>;

    async fn delete_food(&self, id: &str) -> Result<(), AppError>;

    async fn delete_category(&self, id: &str) -> Result<(), AppError>;

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    pub base_url: String,
    timeout_secs: u64,
}

impl DashboardClient {
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init", timeout_secs))?;

        Ok(DashboardClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Send and map non-success statuses to [`ApiError`].
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, AppError> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Api(convert_request_error(e, endpoint, self.timeout_secs)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(AppError::Api(ApiError::Unauthorized {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                server_message: error_text,
            }))
        } else {
            Err(AppError::Api(ApiError::Http {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                message: error_text,
            }))
        }
    }

    async fn get_page<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Page<T>, AppError> {
        log::debug!("GET {} {:?}", endpoint, params);
        let request = self.build_request(Method::GET, endpoint).query(params);
        let response = self.send(request, endpoint).await?;
        let body: ListResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::Api(convert_json_error(e, endpoint)))?;
        Ok(body.into())
    }

    async fn delete(&self, endpoint: &str) -> Result<(), AppError> {
        log::debug!("DELETE {}", endpoint);
        self.send(self.build_request(Method::DELETE, endpoint), endpoint)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    /// List orders with server-side paging, search, status filter and sort
    async fn list_orders(&self, query: &OrderQuery) -> Result<Page<Order>, AppError> {
        self.get_page("/api/orders", &query.to_params()).await
    }

    async fn list_foods(&self) -> Result<Vec<FoodItem>, AppError> {
        Ok(self.get_page("/api/foods", &[]).await?.data)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.get_page("/api/categories", &[]).await?.data)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.get_page("/api/customers", &[]).await?.data)
    }

    async fn delete_food(&self, id: &str) -> Result<(), AppError> {
        self.delete(&format!("/api/foods/{}", id)).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), AppError> {
        self.delete(&format!("/api/categories/{}", id)).await
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<(), AppError> {
        let endpoint = format!("/api/orders/{}/status", id);
        log::debug!("PATCH {} -> {}", endpoint, status);
        let request = self
            .build_request(Method::PATCH, &endpoint)
            .json(&json!({ "status": status }));
        self.send(request, &endpoint).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DataTable;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_order_query_from_table_state() {
        let mut table = DataTable::<Order>::local(Order::columns().unwrap());
        table.set_search("  ada ");
        table.set_filter(OrderColumn::Status, "Delivered").unwrap();
        table.toggle_sort(OrderColumn::Total).unwrap();
        table.toggle_sort(OrderColumn::Total).unwrap();
        table.set_page_size(25).unwrap();

        let query = OrderQuery::from_state(table.query());
        assert_eq!(query.search.as_deref(), Some("ada"));
        assert_eq!(query.status, Some(OrderStatus::Delivered));
        assert_eq!(query.limit, 25);
        assert_eq!(
            query.to_params(),
            vec![
                ("page", "1".to_string()),
                ("limit", "25".to_string()),
                ("search", "ada".to_string()),
                ("status", "delivered".to_string()),
                ("sortBy", "total".to_string()),
                ("sortOrder", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_status_filter_dropped() {
        let mut table = DataTable::<Order>::local(Order::columns().unwrap());
        table.set_filter(OrderColumn::Status, "lost").unwrap();
        assert_eq!(OrderQuery::from_state(table.query()).status, None);
    }

    #[test]
    fn test_latch_keeps_latest_delegated_query() {
        let latch = OrderQueryLatch::new();
        let mut table = DataTable::<Order>::delegated(Order::columns().unwrap(), Box::new(latch.clone()));

        table.set_page(3).unwrap();
        table.set_search("ada");
        let (seq, query) = latch.take().unwrap();
        assert!(table.is_current(seq));
        assert_eq!(query.search.as_deref(), Some("ada"));
        assert_eq!(query.page, 1);
        assert!(latch.take().is_none());

        assert!(table.reload().is_some());
        let (next_seq, _) = latch.take().unwrap();
        assert!(!table.is_current(seq));
        assert!(table.is_current(next_seq));
    }

    #[tokio::test]
    async fn test_list_orders_sends_query_and_reads_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders"))
            .and(query_param("page", "2"))
            .and(query_param("status", "pending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "o1", "totalAmount": 12.5}],
                "pagination": {"page": 2, "limit": 10, "total": 11, "totalPages": 2}
            })))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).unwrap();
        let query = OrderQuery {
            page: 2,
            limit: 10,
            status: Some(OrderStatus::Pending),
            ..Default::default()
        };
        let page = client.list_orders(&query).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.map(|p| p.total_pages), Some(2));
    }

    #[tokio::test]
    async fn test_list_foods_accepts_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/foods"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "f1", "name": "Margherita", "price": 9.5}
            ])))
            .mount(&server)
            .await;

        let client = DashboardClient::new(format!("{}/", server.uri())).unwrap();
        let foods = client.list_foods().await.unwrap();
        assert_eq!(foods[0].name, "Margherita");
        assert!(foods[0].available);
    }

    #[tokio::test]
    async fn test_error_statuses_map_to_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/foods/f1"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/categories/c1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such category"))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).unwrap();
        match client.delete_food("f1").await {
            Err(AppError::Api(ApiError::Unauthorized { server_message, .. })) => {
                assert_eq!(server_message, "token expired")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        let err = client.delete_category("c1").await.unwrap_err();
        assert_eq!(err.display_friendly(), "Not found: no such category");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/customers"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).unwrap();
        let err = client.list_customers().await.unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_update_order_status_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/orders/o1/status"))
            .and(body_json(json!({"status": "preparing"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).unwrap();
        client
            .update_order_status("o1", OrderStatus::Preparing)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = DashboardClient::with_timeout("http://127.0.0.1:9".to_string(), 2).unwrap();
        let err = client.list_categories().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Api(ApiError::Network { .. } | ApiError::Timeout { .. })
        ));
    }
}
