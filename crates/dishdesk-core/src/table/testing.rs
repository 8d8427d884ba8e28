//! Shared fixtures for table tests.

use super::{Align, CellValue, ColumnDef, ColumnKey, Columns, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DishColumn {
    Name,
    Category,
    Price,
    Badge,
}

impl ColumnKey for DishColumn {
    fn as_str(self) -> &'static str {
        match self {
            DishColumn::Name => "name",
            DishColumn::Category => "category",
            DishColumn::Price => "price",
            DishColumn::Badge => "badge",
        }
    }

    fn all() -> &'static [Self] {
        &[
            DishColumn::Name,
            DishColumn::Category,
            DishColumn::Price,
            DishColumn::Badge,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    pub id: Option<u32>,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub badge: Option<String>,
}

impl Dish {
    pub fn new(id: u32, name: &str, category: &str, price: f64) -> Self {
        Self {
            id: Some(id),
            name: name.to_string(),
            category: category.to_string(),
            price,
            badge: None,
        }
    }

    pub fn columns() -> Columns<DishColumn> {
        Columns::new(vec![
            ColumnDef::new(DishColumn::Name, "Name").sortable(),
            ColumnDef::new(DishColumn::Category, "Category")
                .sortable()
                .filterable(),
            ColumnDef::new(DishColumn::Price, "Price")
                .align(Align::Right)
                .sortable()
                .filterable(),
            ColumnDef::new(DishColumn::Badge, "Badge"),
        ])
        .unwrap()
    }
}

impl TableRow for Dish {
    type Column = DishColumn;

    fn cell(&self, column: DishColumn) -> CellValue {
        match column {
            DishColumn::Name => CellValue::text(&self.name),
            DishColumn::Category => CellValue::text(&self.category),
            DishColumn::Price => CellValue::Float(self.price),
            DishColumn::Badge => match &self.badge {
                Some(badge) => CellValue::rendered(badge),
                None => CellValue::Null,
            },
        }
    }

    fn row_id(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }
}

/// 25 dishes; exactly three have "pizza" in their name.
pub fn menu() -> Vec<Dish> {
    let mut dishes = vec![
        Dish::new(1, "Margherita Pizza", "Pizza", 12.5),
        Dish::new(2, "Caesar Salad", "Salads", 8.0),
        Dish::new(3, "Pepperoni Pizza", "Pizza", 14.0),
        Dish::new(4, "Veggie Burger", "Burgers", 11.0),
        Dish::new(5, "Four Cheese PIZZA", "Pizza", 9.75),
    ];
    for id in 6..=25u32 {
        dishes.push(Dish::new(id, &format!("Side {}", id), "Sides", f64::from(id)));
    }
    dishes
}
