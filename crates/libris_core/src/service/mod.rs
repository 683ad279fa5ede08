//! Controller services.
//!
//! # Responsibility
//! - Compose the book store with background persistence.
//! - Keep callers decoupled from store locking and file details.

pub mod autosave;
pub mod library;
