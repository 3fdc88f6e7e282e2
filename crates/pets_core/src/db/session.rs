//! Raw table primitives over an open connection.
//!
//! # Responsibility
//! - Translate (table, columns, selection, args, order) tuples into SQL.
//! - Report write failures as "no row id" / zero rows instead of raising.
//!
//! # Invariants
//! - Identifiers pass `check_identifier` before reaching SQL text.
//! - Selection clauses use positional `?` placeholders; their args are bound
//!   after any SET values.

use super::{check_identifier, DbResult};
use crate::model::fields::{FieldMap, FieldValue};
use crate::model::row::RowSet;
use log::{debug, error};
use rusqlite::{params_from_iter, Connection};

/// SQL `WHERE` clause with its bound arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<FieldValue>,
}

impl Selection {
    pub fn new(clause: impl Into<String>, args: Vec<FieldValue>) -> Self {
        Self {
            clause: clause.into(),
            args,
        }
    }

    /// `<column> = ?` bound to `value`.
    pub fn equals(column: &str, value: impl Into<FieldValue>) -> Self {
        Self::new(format!("{column} = ?"), vec![value.into()])
    }
}

/// Open, schema-ready database shared by all gateway operations.
#[derive(Debug)]
pub struct Session {
    conn: Connection,
}

impl Session {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Underlying connection, for callers that need SQL the primitives do not cover.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Current `PRAGMA user_version`.
    pub fn schema_version(&self) -> DbResult<u32> {
        let version = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        Ok(version)
    }

    /// Runs a `SELECT`. An empty `columns` slice selects every column.
    pub fn query(
        &self,
        table: &str,
        columns: &[&str],
        selection: Option<&Selection>,
        order_by: Option<&str>,
    ) -> DbResult<RowSet> {
        let table = check_identifier(table)?;
        let projection = if columns.is_empty() {
            "*".to_string()
        } else {
            columns
                .iter()
                .map(|column| check_identifier(column))
                .collect::<DbResult<Vec<_>>>()?
                .join(", ")
        };

        let mut sql = format!("SELECT {projection} FROM {table}");
        push_where(&mut sql, selection);
        if let Some(order_by) = order_by.filter(|order| !order.trim().is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let column_names = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let column_count = column_names.len();
        let mut result = RowSet::new(column_names);

        let mut rows = stmt.query(params_from_iter(selection_args(selection)))?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for index in 0..column_count {
                values.push(FieldValue::from(row.get_ref(index)?));
            }
            result.push(values);
        }

        debug!(
            "event=db_query module=db status=ok table={} rows={}",
            table,
            result.len()
        );
        Ok(result)
    }

    /// Inserts one row and returns its id.
    ///
    /// SQLite-level failures (constraints, unknown columns) are logged and
    /// reported as `Ok(None)`.
    pub fn insert(&self, table: &str, values: &FieldMap) -> DbResult<Option<i64>> {
        let table = check_identifier(table)?;
        let sql = if values.is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES")
        } else {
            let columns = values
                .keys()
                .map(check_identifier)
                .collect::<DbResult<Vec<_>>>()?;
            let placeholders = vec!["?"; columns.len()].join(", ");
            format!(
                "INSERT INTO {table} ({}) VALUES ({placeholders})",
                columns.join(", ")
            )
        };

        match self
            .conn
            .execute(&sql, params_from_iter(values.iter().map(|(_, value)| value)))
        {
            Ok(_) => {
                let row_id = self.conn.last_insert_rowid();
                debug!("event=db_insert module=db status=ok table={table} row_id={row_id}");
                Ok(Some(row_id))
            }
            Err(err @ rusqlite::Error::SqliteFailure(..)) => {
                error!(
                    "event=db_insert module=db status=error table={table} error_code=insert_failed error={err}"
                );
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Updates matching rows and returns how many changed.
    ///
    /// SQLite-level failures are logged and reported as zero rows changed.
    pub fn update(
        &self,
        table: &str,
        values: &FieldMap,
        selection: Option<&Selection>,
    ) -> DbResult<usize> {
        let table = check_identifier(table)?;
        if values.is_empty() {
            return Ok(0);
        }
        let assignments = values
            .keys()
            .map(|column| check_identifier(column).map(|column| format!("{column} = ?")))
            .collect::<DbResult<Vec<_>>>()?;

        let mut sql = format!("UPDATE {table} SET {}", assignments.join(", "));
        push_where(&mut sql, selection);

        let params = values
            .iter()
            .map(|(_, value)| value)
            .chain(selection_args(selection));
        match self.conn.execute(&sql, params_from_iter(params)) {
            Ok(changed) => {
                debug!("event=db_update module=db status=ok table={table} changed={changed}");
                Ok(changed)
            }
            Err(err @ rusqlite::Error::SqliteFailure(..)) => {
                error!(
                    "event=db_update module=db status=error table={table} error_code=update_failed error={err}"
                );
                Ok(0)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes matching rows; `None` selection deletes every row.
    ///
    /// SQLite-level failures are logged and reported as zero rows deleted.
    pub fn delete(&self, table: &str, selection: Option<&Selection>) -> DbResult<usize> {
        let table = check_identifier(table)?;
        let mut sql = format!("DELETE FROM {table}");
        push_where(&mut sql, selection);

        match self
            .conn
            .execute(&sql, params_from_iter(selection_args(selection)))
        {
            Ok(deleted) => {
                debug!("event=db_delete module=db status=ok table={table} deleted={deleted}");
                Ok(deleted)
            }
            Err(err @ rusqlite::Error::SqliteFailure(..)) => {
                error!(
                    "event=db_delete module=db status=error table={table} error_code=delete_failed error={err}"
                );
                Ok(0)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn push_where(sql: &mut String, selection: Option<&Selection>) {
    if let Some(selection) = selection.filter(|selection| !selection.clause.trim().is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(&selection.clause);
    }
}

fn selection_args(selection: Option<&Selection>) -> impl Iterator<Item = &FieldValue> {
    selection
        .filter(|selection| !selection.clause.trim().is_empty())
        .into_iter()
        .flat_map(|selection| selection.args.iter())
}
