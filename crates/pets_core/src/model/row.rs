//! Row set returned by list queries.

use crate::model::fields::FieldValue;
use serde::Serialize;

/// Ordered query result: column names plus one value vector per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

/// Borrowed view of one row inside a [`RowSet`].
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a [String],
    values: &'a [FieldValue],
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Callers must supply one value per column.
    pub(crate) fn push(&mut self, values: Vec<FieldValue>) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(values);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|values| RowView {
            columns: &self.columns,
            values,
        })
    }

    pub fn first(&self) -> Option<RowView<'_>> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(|values| RowView {
            columns: &self.columns,
            values,
        })
    }
}

impl<'a> RowView<'a> {
    /// Value of `column`, or `None` when the column is not in the projection.
    pub fn get(&self, column: &str) -> Option<&'a FieldValue> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.values.get(index)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(FieldValue::as_integer)
    }

    pub fn get_string(&self, column: &str) -> Option<String> {
        self.get(column).and_then(FieldValue::as_string)
    }

    pub fn values(&self) -> &'a [FieldValue] {
        self.values
    }
}
