//! Domain model for storable records.
//!
//! # Responsibility
//! - Define the entity contract consumed by the generic store.
//! - Provide the concrete library book record.
//!
//! # Invariants
//! - Every stored record is identified by an immutable id.
//! - State changes only go through the record's transition methods.

pub mod book;
pub mod entity;
