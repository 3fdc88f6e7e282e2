//! Core data-access logic for the pet shelter catalog.
//! This crate owns the pet record invariants; presentation layers only call
//! into the gateway or the service.

pub mod contract;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod service;

pub use db::{open, open_db, open_db_in_memory, DbConfig, DbError, DbLocation, Selection, Session};
pub use gateway::address::{AddressTable, Route, Target};
pub use gateway::{GatewayError, GatewayResult, ListQuery, PetGateway, RecordGateway};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::fields::{FieldMap, FieldValue};
pub use model::pet::{Gender, Pet, PetDecodeError, PetDraft, PetId, ValidationError};
pub use model::row::{RowSet, RowView};
pub use service::pet_service::{
    PetForm, PetService, PetSummary, SaveOutcome, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
