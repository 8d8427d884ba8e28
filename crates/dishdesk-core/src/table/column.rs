//! Column descriptors.

use std::collections::HashSet;

use super::ColumnKey;
use crate::error::TableError;

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Describes one column of a table. Immutable once the table is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef<C: ColumnKey> {
    pub key: C,
    pub title: String,
    pub align: Align,
    pub width: Option<u16>,
    pub sortable: bool,
    pub filterable: bool,
}

impl<C: ColumnKey> ColumnDef<C> {
    pub fn new(key: C, title: impl Into<String>) -> Self {
        Self {
            key,
            title: title.into(),
            align: Align::Left,
            width: None,
            sortable: false,
            filterable: false,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }
}

/// The ordered column set of one table; keys are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns<C: ColumnKey> {
    defs: Vec<ColumnDef<C>>,
}

impl<C: ColumnKey> Columns<C> {
    pub fn new(defs: Vec<ColumnDef<C>>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for def in &defs {
            if !seen.insert(def.key) {
                return Err(TableError::DuplicateColumn {
                    column: def.key.as_str().to_string(),
                });
            }
        }
        Ok(Self { defs })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDef<C>> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn get(&self, key: C) -> Option<&ColumnDef<C>> {
        self.defs.iter().find(|def| def.key == key)
    }

    pub fn at(&self, index: usize) -> Option<&ColumnDef<C>> {
        self.defs.get(index)
    }

    pub fn position(&self, key: C) -> Option<usize> {
        self.defs.iter().position(|def| def.key == key)
    }

    pub fn is_sortable(&self, key: C) -> bool {
        self.get(key).is_some_and(|def| def.sortable)
    }

    pub fn is_filterable(&self, key: C) -> bool {
        self.get(key).is_some_and(|def| def.filterable)
    }

    pub fn keys(&self) -> impl Iterator<Item = C> + '_ {
        self.defs.iter().map(|def| def.key)
    }

    pub fn sortable_keys(&self) -> Vec<C> {
        self.defs
            .iter()
            .filter(|def| def.sortable)
            .map(|def| def.key)
            .collect()
    }

    pub fn filterable_keys(&self) -> Vec<C> {
        self.defs
            .iter()
            .filter(|def| def.filterable)
            .map(|def| def.key)
            .collect()
    }
}

impl<'a, C: ColumnKey> IntoIterator for &'a Columns<C> {
    type Item = &'a ColumnDef<C>;
    type IntoIter = std::slice::Iter<'a, ColumnDef<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.defs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::testing::{Dish, DishColumn};

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = Columns::new(vec![
            ColumnDef::new(DishColumn::Name, "Name"),
            ColumnDef::new(DishColumn::Name, "Name again"),
        ]);
        assert_eq!(
            result,
            Err(TableError::DuplicateColumn {
                column: "name".to_string()
            })
        );
    }

    #[test]
    fn test_capability_lookup() {
        let columns = Dish::columns();
        assert!(columns.is_sortable(DishColumn::Price));
        assert!(!columns.is_sortable(DishColumn::Badge));
        assert!(columns.is_filterable(DishColumn::Category));
        assert_eq!(columns.position(DishColumn::Price), Some(2));
        assert_eq!(columns.at(0).map(|c| c.title.as_str()), Some("Name"));
    }
}
