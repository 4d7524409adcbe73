//! Table schemas: an ordered sequence of (column name, column type) pairs.

use crate::value::ColumnType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub col_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, col_type: ColumnType) -> Self {
        Column {
            name: name.into(),
            col_type,
        }
    }
}

/// Schema held by a `HeapTable`. Column order governs marshaling order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Schema { columns }
    }

    pub fn from_pairs(pairs: Vec<(&str, ColumnType)>) -> Self {
        let columns = pairs
            .into_iter()
            .map(|(name, col_type)| Column::new(name, col_type))
            .collect();
        Schema { columns }
    }

    /// Columns in schema (i.e. marshaling) order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}
