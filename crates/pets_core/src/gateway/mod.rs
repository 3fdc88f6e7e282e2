//! Record gateway: address-based CRUD over the pets table.
//!
//! # Responsibility
//! - Define the list/insert/update/delete contract consumed by presentation code.
//! - Map addresses to "whole table" or "one row" targets.
//! - Enforce field rules before any write reaches storage.
//!
//! # Invariants
//! - Validation failures leave storage untouched.
//! - Storage write failures are reported as `None` ids or zero counts, never
//!   retried.

use crate::db::{DbError, Selection};
use crate::model::fields::FieldMap;
use crate::model::pet::{PetDecodeError, PetId, ValidationError};
use crate::model::row::RowSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod address;
mod pet_gateway;

pub use pet_gateway::PetGateway;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug)]
pub enum GatewayError {
    /// Address shape is not known to the address table, or not valid for the operation.
    InvalidAddress(String),
    Validation(ValidationError),
    Db(DbError),
    /// Persisted row breaks the pet record invariants.
    InvalidData(PetDecodeError),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(address) => write!(f, "unknown address: {address}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(err) => write!(f, "invalid persisted pet data: {err}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAddress(_) => None,
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(err) => Some(err),
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<PetDecodeError> for GatewayError {
    fn from(value: PetDecodeError) -> Self {
        Self::InvalidData(value)
    }
}

/// Options for listing rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Columns to return; empty returns every column.
    pub projection: Vec<String>,
    /// Ignored on single-row addresses.
    pub selection: Option<Selection>,
    pub sort_order: Option<String>,
}

impl ListQuery {
    pub fn with_projection(columns: &[&str]) -> Self {
        Self {
            projection: columns.iter().map(|column| (*column).to_string()).collect(),
            ..Self::default()
        }
    }
}

/// Address-based CRUD contract.
pub trait RecordGateway {
    /// Lists rows at `address`.
    ///
    /// On a single-row address the caller's selection is replaced by the id
    /// predicate; projection and sort order still apply.
    fn list(&self, address: &str, query: &ListQuery) -> GatewayResult<RowSet>;
    /// Inserts a validated row; `Ok(None)` when storage produced no id.
    fn insert(&self, address: &str, values: &FieldMap) -> GatewayResult<Option<PetId>>;
    /// Applies a partial update and returns the changed row count.
    fn update(
        &self,
        address: &str,
        values: &FieldMap,
        selection: Option<&Selection>,
    ) -> GatewayResult<usize>;
    /// Deletes rows and returns the removed row count.
    fn delete(&self, address: &str, selection: Option<&Selection>) -> GatewayResult<usize>;
    /// Content type string for `address`.
    fn content_type(&self, address: &str) -> GatewayResult<&'static str>;
}
