//! REST resources and their table shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TableError;
use crate::table::{Align, CellValue, ColumnDef, ColumnKey, Columns, PaginationInfo, Renderer, TableRow};
use crate::utils::text::{format_datetime, format_money};

/// Accept ids sent either as strings or as numbers.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// A customer sent either as a bare name or as an embedded `{ "name": ... }`
/// record. Any other shape carries no name.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum CustomerRef {
    Name(String),
    Record {
        #[serde(default)]
        name: Option<String>,
    },
    Other(serde::de::IgnoredAny),
}

impl CustomerRef {
    pub(crate) fn into_name(self) -> Option<String> {
        match self {
            CustomerRef::Name(name) => Some(name),
            CustomerRef::Record { name } => name,
            CustomerRef::Other(_) => None,
        }
    }
}

fn customer_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CustomerRef>::deserialize(deserializer)?.and_then(CustomerRef::into_name))
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Present when the server paginated the result.
    pub pagination: Option<PaginationInfo>,
}

/// Wire shape of list endpoints: a bare array or a `{ data, pagination }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Wrapped {
        data: Vec<T>,
        #[serde(default)]
        pagination: Option<PaginationInfo>,
    },
    Bare(Vec<T>),
}

impl<T> From<ListResponse<T>> for Page<T> {
    fn from(response: ListResponse<T>) -> Self {
        match response {
            ListResponse::Wrapped { data, pagination } => Page { data, pagination },
            ListResponse::Bare(data) => Page {
                data,
                pagination: None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    OnTheWay,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OnTheWay => "on_the_way",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown order status '{}' (expected one of: {})", s, valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, alias = "customer", deserialize_with = "customer_name")]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, alias = "total")]
    pub total_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Order {
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderColumn {
    Id,
    Customer,
    Items,
    Total,
    Status,
    CreatedAt,
}

impl ColumnKey for OrderColumn {
    fn as_str(self) -> &'static str {
        match self {
            OrderColumn::Id => "id",
            OrderColumn::Customer => "customer",
            OrderColumn::Items => "items",
            OrderColumn::Total => "total",
            OrderColumn::Status => "status",
            OrderColumn::CreatedAt => "created_at",
        }
    }

    fn all() -> &'static [Self] {
        &[
            OrderColumn::Id,
            OrderColumn::Customer,
            OrderColumn::Items,
            OrderColumn::Total,
            OrderColumn::Status,
            OrderColumn::CreatedAt,
        ]
    }
}

impl Order {
    pub fn columns() -> Result<Columns<OrderColumn>, TableError> {
        Columns::new(vec![
            ColumnDef::new(OrderColumn::Id, "Order").width(12),
            ColumnDef::new(OrderColumn::Customer, "Customer").sortable(),
            ColumnDef::new(OrderColumn::Items, "Items").align(Align::Right).width(6),
            ColumnDef::new(OrderColumn::Total, "Total")
                .align(Align::Right)
                .width(10)
                .sortable(),
            ColumnDef::new(OrderColumn::Status, "Status")
                .width(12)
                .sortable()
                .filterable(),
            ColumnDef::new(OrderColumn::CreatedAt, "Placed").width(17).sortable(),
        ])
    }

    pub fn renderer() -> Renderer<Order> {
        Renderer::new().with_formatter(OrderColumn::Total, |order: &Order, _| format_money(order.total_amount))
    }
}

impl TableRow for Order {
    type Column = OrderColumn;

    fn cell(&self, column: OrderColumn) -> CellValue {
        match column {
            OrderColumn::Id => CellValue::text(&self.id),
            OrderColumn::Customer => self.customer_name.clone().into(),
            OrderColumn::Items => self.item_count().into(),
            OrderColumn::Total => CellValue::Float(self.total_amount),
            OrderColumn::Status => CellValue::text(self.status.as_str()),
            OrderColumn::CreatedAt => self.created_at.as_deref().map(format_datetime).into(),
        }
    }

    fn row_id(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

// ---------------------------------------------------------------------------
// Foods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodColumn {
    Image,
    Name,
    Category,
    Price,
    Available,
}

impl ColumnKey for FoodColumn {
    fn as_str(self) -> &'static str {
        match self {
            FoodColumn::Image => "photo",
            FoodColumn::Name => "name",
            FoodColumn::Category => "category",
            FoodColumn::Price => "price",
            FoodColumn::Available => "available",
        }
    }

    fn all() -> &'static [Self] {
        &[
            FoodColumn::Image,
            FoodColumn::Name,
            FoodColumn::Category,
            FoodColumn::Price,
            FoodColumn::Available,
        ]
    }
}

impl FoodItem {
    pub fn columns() -> Result<Columns<FoodColumn>, TableError> {
        Columns::new(vec![
            ColumnDef::new(FoodColumn::Image, "Photo").align(Align::Center).width(5),
            ColumnDef::new(FoodColumn::Name, "Name").sortable(),
            ColumnDef::new(FoodColumn::Category, "Category")
                .sortable()
                .filterable(),
            ColumnDef::new(FoodColumn::Price, "Price")
                .align(Align::Right)
                .width(10)
                .sortable()
                .filterable(),
            ColumnDef::new(FoodColumn::Available, "Available")
                .align(Align::Center)
                .width(9)
                .filterable(),
        ])
    }

    pub fn renderer() -> Renderer<FoodItem> {
        Renderer::new().with_formatter(FoodColumn::Price, |food: &FoodItem, _| format_money(food.price))
    }
}

impl TableRow for FoodItem {
    type Column = FoodColumn;

    fn cell(&self, column: FoodColumn) -> CellValue {
        match column {
            FoodColumn::Image => CellValue::Bool(self.image_url.is_some()),
            FoodColumn::Name => CellValue::text(&self.name),
            FoodColumn::Category => self.category.clone().into(),
            FoodColumn::Price => CellValue::Float(self.price),
            FoodColumn::Available => CellValue::Bool(self.available),
        }
    }

    fn row_id(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub item_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColumn {
    Name,
    Description,
    Items,
}

impl ColumnKey for CategoryColumn {
    fn as_str(self) -> &'static str {
        match self {
            CategoryColumn::Name => "name",
            CategoryColumn::Description => "description",
            CategoryColumn::Items => "items",
        }
    }

    fn all() -> &'static [Self] {
        &[CategoryColumn::Name, CategoryColumn::Description, CategoryColumn::Items]
    }
}

impl Category {
    pub fn columns() -> Result<Columns<CategoryColumn>, TableError> {
        Columns::new(vec![
            ColumnDef::new(CategoryColumn::Name, "Name").width(20).sortable(),
            ColumnDef::new(CategoryColumn::Description, "Description"),
            ColumnDef::new(CategoryColumn::Items, "Items")
                .align(Align::Right)
                .width(6)
                .sortable(),
        ])
    }
}

impl TableRow for Category {
    type Column = CategoryColumn;

    fn cell(&self, column: CategoryColumn) -> CellValue {
        match column {
            CategoryColumn::Name => CellValue::text(&self.name),
            CategoryColumn::Description => self.description.clone().into(),
            CategoryColumn::Items => self.item_count.into(),
        }
    }

    fn row_id(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub order_count: Option<u32>,
    #[serde(default, alias = "createdAt")]
    pub joined_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerColumn {
    Name,
    Email,
    Phone,
    Orders,
    Joined,
}

impl ColumnKey for CustomerColumn {
    fn as_str(self) -> &'static str {
        match self {
            CustomerColumn::Name => "name",
            CustomerColumn::Email => "email",
            CustomerColumn::Phone => "phone",
            CustomerColumn::Orders => "orders",
            CustomerColumn::Joined => "joined",
        }
    }

    fn all() -> &'static [Self] {
        &[
            CustomerColumn::Name,
            CustomerColumn::Email,
            CustomerColumn::Phone,
            CustomerColumn::Orders,
            CustomerColumn::Joined,
        ]
    }
}

impl Customer {
    pub fn columns() -> Result<Columns<CustomerColumn>, TableError> {
        Columns::new(vec![
            ColumnDef::new(CustomerColumn::Name, "Name").sortable(),
            ColumnDef::new(CustomerColumn::Email, "Email").sortable(),
            ColumnDef::new(CustomerColumn::Phone, "Phone").width(16),
            ColumnDef::new(CustomerColumn::Orders, "Orders")
                .align(Align::Right)
                .width(7)
                .sortable()
                .filterable(),
            ColumnDef::new(CustomerColumn::Joined, "Joined").width(17).sortable(),
        ])
    }
}

impl TableRow for Customer {
    type Column = CustomerColumn;

    fn cell(&self, column: CustomerColumn) -> CellValue {
        match column {
            CustomerColumn::Name => CellValue::text(&self.name),
            CustomerColumn::Email => self.email.clone().into(),
            CustomerColumn::Phone => self.phone.clone().into(),
            CustomerColumn::Orders => self.order_count.into(),
            CustomerColumn::Joined => self.joined_at.as_deref().map(format_datetime).into(),
        }
    }

    fn row_id(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DataTable, QueryState};
    use serde_json::json;

    #[test]
    fn test_list_response_accepts_both_shapes() {
        let bare: ListResponse<Category> =
            serde_json::from_value(json!([{"id": 1, "name": "Pizza"}])).unwrap();
        let page: Page<Category> = bare.into();
        assert_eq!(page.data[0].id, "1");
        assert!(page.pagination.is_none());

        let wrapped: ListResponse<Category> = serde_json::from_value(json!({
            "data": [{"_id": "c1", "name": "Pizza", "itemCount": 4}],
            "pagination": {"page": 1, "limit": 10, "total": 1, "totalPages": 1}
        }))
        .unwrap();
        let page: Page<Category> = wrapped.into();
        assert_eq!(page.data[0].id, "c1");
        assert_eq!(page.data[0].item_count, Some(4));
        assert_eq!(page.pagination.map(|p| p.total), Some(1));
    }

    #[test]
    fn test_order_deserializes_with_defaults() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o-1",
            "customer": "Ada",
            "items": [{"name": "Pizza", "quantity": 2, "price": 9.5}, {"name": "Cola"}],
            "totalAmount": 21.0,
            "status": "on_the_way",
            "createdAt": "2024-03-01T18:42:10Z"
        }))
        .unwrap();
        assert_eq!(order.customer_name.as_deref(), Some("Ada"));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.status, OrderStatus::OnTheWay);
        assert_eq!(order.cell(OrderColumn::CreatedAt), CellValue::text("2024-03-01 18:42"));
    }

    #[test]
    fn test_order_customer_shapes() {
        let customer = |value: serde_json::Value| {
            let order: Order =
                serde_json::from_value(json!({"_id": 7, "customer": value})).unwrap();
            order.customer_name
        };
        assert_eq!(customer(json!({"name": "Grace", "phone": "555"})).as_deref(), Some("Grace"));
        assert_eq!(customer(json!("Ada")).as_deref(), Some("Ada"));
        assert_eq!(customer(json!({"phone": "555"})), None);
        assert_eq!(customer(json!(null)), None);
        assert_eq!(customer(json!(42)), None);

        let order: Order = serde_json::from_value(json!({
            "id": "o-2",
            "customerName": {"name": "Linus"}
        }))
        .unwrap();
        assert_eq!(order.customer_name.as_deref(), Some("Linus"));
    }

    #[test]
    fn test_order_status_parsing() {
        assert_eq!("On The Way".parse::<OrderStatus>(), Ok(OrderStatus::OnTheWay));
        assert_eq!("DELIVERED".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert!("lost".parse::<OrderStatus>().unwrap_err().contains("pending"));
    }

    #[test]
    fn test_column_keys_parse() {
        assert_eq!(FoodColumn::parse("Price"), Some(FoodColumn::Price));
        assert_eq!(CustomerColumn::parse("joined"), Some(CustomerColumn::Joined));
        assert_eq!(OrderColumn::parse("nope"), None);
    }

    #[test]
    fn test_food_table_search_and_filter() {
        let foods: Vec<FoodItem> = serde_json::from_value(json!([
            {"id": "f1", "name": "Margherita", "price": 9.5, "category": "Pizza", "image": "m.png"},
            {"id": "f2", "name": "Pepperoni", "price": 11.0, "category": "Pizza", "available": false},
            {"id": "f3", "name": "Lemonade", "price": 3.0, "category": "Drinks"}
        ]))
        .unwrap();

        let mut table = DataTable::<FoodItem>::local(FoodItem::columns().unwrap()).with_renderer(FoodItem::renderer());
        table.set_filter(FoodColumn::Available, true).unwrap();
        let view = table.view(&foods);
        let names: Vec<&str> = view.rows.iter().map(|r| r.cells[1].text.as_str()).collect();
        assert_eq!(names, vec!["Margherita", "Lemonade"]);
        assert_eq!(view.rows[0].cells[0].text, "Yes");
        assert_eq!(view.rows[1].cells[0].text, "No");
        assert_eq!(view.rows[0].cells[3].text, "9.50");

        table.clear_filters();
        table.set_search("pizza");
        assert_eq!(table.view(&foods).total_count, 2);
    }

    #[test]
    fn test_order_total_sorts_numerically() {
        let orders: Vec<Order> = serde_json::from_value(json!([
            {"id": "a", "totalAmount": 100.0},
            {"id": "b", "totalAmount": 9.0},
            {"id": "c", "totalAmount": 25.5}
        ]))
        .unwrap();
        let mut table = DataTable::<Order>::local(Order::columns().unwrap()).with_renderer(Order::renderer());
        table.toggle_sort(OrderColumn::Total).unwrap();
        let view = table.view(&orders);
        let totals: Vec<&str> = view.rows.iter().map(|r| r.cells[3].text.as_str()).collect();
        assert_eq!(totals, vec!["9.00", "25.50", "100.00"]);
        assert!(QueryState::<OrderColumn>::default().sort().is_none());
    }
}
