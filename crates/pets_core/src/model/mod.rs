//! Pet catalog domain model.
//!
//! # Responsibility
//! - Define the typed pet record, the field-map input and the row-set output.
//! - Own field validation shared by insert and update paths.
//!
//! # Invariants
//! - Every stored pet is identified by a storage-assigned, never reused id.
//! - Deletion is a hard delete; there are no tombstones.

pub mod fields;
pub mod pet;
pub mod row;
