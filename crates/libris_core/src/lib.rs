//! Core record store for Libris.
//! Generic, thread-safe entity storage with line-oriented text persistence
//! and a background autosave controller.

pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use codec::{DecodeError, DELIMITER_SUBSTITUTE, FIELD_DELIMITER, LINE_BREAK_SUBSTITUTE};
pub use config::LibraryConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::book::{Book, BookId, BookStateError};
pub use model::entity::Entity;
pub use service::library::{Library, LibraryError, LibraryResult};
pub use store::{EntityHandle, LoadReport, Store, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
