//! Generic owning store and its file persistence.
//!
//! # Responsibility
//! - Hold every entity of one type behind a single mutual-exclusion lock.
//! - Save and load the whole collection through the entity codec.
//!
//! # Invariants
//! - Every store operation holds the collection lock for its full duration.
//! - Lock order is always collection, then entity. Handles never take the
//!   collection lock.
//! - Ids are unique by caller convention; inserts do not re-validate them.
//! - Every operation is O(n) under the lock, so large stores serialize all
//!   callers behind saves and scans.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod handle;
mod record_store;

pub use handle::EntityHandle;
pub use record_store::{LoadReport, Store};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error on `{}`: {source}", path.display()),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}
