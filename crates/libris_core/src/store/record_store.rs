//! Mutex-guarded owning container with line-oriented file persistence.
//!
//! # Responsibility
//! - Own every inserted entity and hand out shared handles to them.
//! - Persist the full collection to a text file and restore it.
//!
//! # Invariants
//! - Storage order is insertion order; nothing reorders entries.
//! - `load` never aborts on a malformed line; it skips and warns.
//! - A missing file on `load` is not an error and leaves contents untouched.
//!
//! # See also
//! - crate::codec for the record line format.

use super::handle::EntityHandle;
use super::{StoreError, StoreResult};
use crate::logging::sanitize_message;
use crate::model::entity::Entity;
use log::{debug, error, info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

const MAX_RECORD_PREVIEW_CHARS: usize = 80;

/// Outcome of one `Store::load` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Whether the target file existed.
    pub file_found: bool,
    pub loaded: usize,
    /// Non-blank lines dropped because they failed to decode.
    pub skipped: usize,
}

/// Generic owning store for one entity type.
///
/// Predicates passed to store operations run while the store lock is held and
/// must not call back into the same store.
pub struct Store<T: Entity> {
    entries: Mutex<Vec<EntityHandle<T>>>,
}

impl<T: Entity> Store<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Takes ownership of `entity`, appends it and returns a handle to it.
    ///
    /// No uniqueness check is performed on the entity id.
    pub fn insert(&self, entity: T) -> EntityHandle<T> {
        let handle = EntityHandle::new(entity);
        let mut entries = self.lock();
        entries.push(handle.clone());
        debug!(
            "event=store_insert module=store status=ok id={} len={}",
            handle.id(),
            entries.len()
        );
        handle
    }

    /// Removes every entity matching `predicate` and returns how many were removed.
    pub fn remove_where(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|handle| !handle.read(&mut predicate));
        let removed = before - entries.len();
        debug!("event=store_remove module=store status=ok removed={removed}");
        removed
    }

    /// Returns handles to all matching entities in storage order.
    pub fn find_where(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<EntityHandle<T>> {
        self.lock()
            .iter()
            .filter(|handle| handle.read(&mut predicate))
            .cloned()
            .collect()
    }

    /// Linear scan for the first entity with `id`.
    pub fn find_by_id(&self, id: T::Id) -> Option<EntityHandle<T>> {
        self.lock().iter().find(|handle| handle.id() == id).cloned()
    }

    /// Snapshot of handles to every entity, in storage order.
    pub fn all(&self) -> Vec<EntityHandle<T>> {
        self.lock().clone()
    }

    /// Snapshot of every id, in storage order.
    pub fn ids(&self) -> Vec<T::Id> {
        self.lock().iter().map(EntityHandle::id).collect()
    }

    pub fn max_id(&self) -> Option<T::Id> {
        self.lock().iter().map(EntityHandle::id).max()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Truncates `path` and writes one encoded line per entity.
    ///
    /// The store lock is held for the whole write. Returns the record count.
    ///
    /// # Errors
    /// - `StoreError::Io` when the file cannot be created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let entries = self.lock();

        let result = write_records(path, &entries);
        match &result {
            Ok(count) => debug!(
                "event=store_save module=store status=ok records={} duration_ms={} path={}",
                count,
                started_at.elapsed().as_millis(),
                path.display()
            ),
            Err(err) => error!(
                "event=store_save module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Replaces contents with the records decoded from `path`.
    ///
    /// # Errors
    /// - `StoreError::Io` when the file exists but cannot be read.
    pub fn load(&self, path: impl AsRef<Path>) -> StoreResult<LoadReport> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let mut entries = self.lock();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=store_load module=store status=skip reason=missing_file path={}",
                    path.display()
                );
                return Ok(LoadReport::default());
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=read_failed path={} error={}",
                    path.display(),
                    err
                );
                return Err(StoreError::io(path, err));
            }
        };

        entries.clear();
        let mut report = LoadReport {
            file_found: true,
            ..LoadReport::default()
        };

        let text = String::from_utf8_lossy(&bytes);
        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            match T::decode(line) {
                Ok(entity) => {
                    entries.push(EntityHandle::new(entity));
                    report.loaded += 1;
                }
                Err(err) => {
                    report.skipped += 1;
                    warn!(
                        "event=store_load_record module=store status=skip line={} error={} record={}",
                        index + 1,
                        err,
                        sanitize_message(line, MAX_RECORD_PREVIEW_CHARS)
                    );
                }
            }
        }

        info!(
            "event=store_load module=store status=ok loaded={} skipped={} duration_ms={}",
            report.loaded,
            report.skipped,
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EntityHandle<T>>> {
        // The vector has no cross-entry invariant a panic could break.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Entity> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn write_records<T: Entity>(path: &Path, entries: &[EntityHandle<T>]) -> StoreResult<usize> {
    let file = File::create(path).map_err(|err| StoreError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    for handle in entries {
        let line = handle.read(T::encode);
        writeln!(writer, "{line}").map_err(|err| StoreError::io(path, err))?;
    }
    writer.flush().map_err(|err| StoreError::io(path, err))?;
    Ok(entries.len())
}
