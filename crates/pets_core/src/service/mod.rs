//! Core use-case services.
//!
//! # Responsibility
//! - Turn catalog/editor actions into gateway calls.
//! - Keep presentation code decoupled from addresses and field-maps.

pub mod pet_service;
