//! Library controller.
//!
//! # Responsibility
//! - Compose one book store with an id allocator and an autosave thread.
//! - Expose the only public surface external callers use.
//!
//! # Invariants
//! - `next_id` is always greater than every id currently in the store.
//! - `BookId::MAX` is never handed out by the allocator; reaching it means the
//!   id space is exhausted and `add_book` fails instead of wrapping.
//! - The autosave thread lives exactly as long as its `Library`; every
//!   teardown path stops and joins it before the final save.
//! - Per-record decode errors never reach callers; I/O and state errors do.

use crate::config::LibraryConfig;
use crate::model::book::{Book, BookId, BookStateError};
use crate::service::autosave::Autosave;
use crate::store::{EntityHandle, LoadReport, Store, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub type LibraryResult<T> = Result<T, LibraryError>;

#[derive(Debug)]
pub enum LibraryError {
    Store(StoreError),
    State(BookStateError),
    NotFound(BookId),
    IdSpaceExhausted,
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::State(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::IdSpaceExhausted => write!(f, "no book ids left to allocate"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::State(err) => Some(err),
            Self::NotFound(_) | Self::IdSpaceExhausted => None,
        }
    }
}

impl From<StoreError> for LibraryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<BookStateError> for LibraryError {
    fn from(value: BookStateError) -> Self {
        Self::State(value)
    }
}

/// Book store with autosave and id allocation.
///
/// Dropping a `Library` stops autosave and performs a final save, logging any
/// failure. Call [`Library::shutdown`] to observe the final save result.
pub struct Library {
    store: Arc<Store<Book>>,
    db_path: PathBuf,
    next_id: AtomicU64,
    autosave: Option<Autosave>,
}

impl Library {
    /// Loads persisted books, seeds the id allocator and starts autosave.
    ///
    /// A missing database file yields an empty library.
    ///
    /// # Errors
    /// - `LibraryError::Store` when the file exists but cannot be read, or the
    ///   autosave thread cannot be spawned.
    pub fn open(config: LibraryConfig) -> LibraryResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=library_open module=service status=start path={}",
            config.db_path.display()
        );

        let store: Arc<Store<Book>> = Arc::new(Store::new());
        let report = store.load(&config.db_path)?;
        let next_id = watermark_after(store.max_id());

        let autosave_store = Arc::clone(&store);
        let autosave_path = config.db_path.clone();
        let autosave = Autosave::spawn(
            config.autosave_interval,
            config.effective_poll(),
            move || autosave_store.save(&autosave_path),
        )?;

        info!(
            "event=library_open module=service status=ok loaded={} skipped={} next_id={} duration_ms={}",
            report.loaded,
            report.skipped,
            next_id,
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            store,
            db_path: config.db_path,
            next_id: AtomicU64::new(next_id),
            autosave: Some(autosave),
        })
    }

    /// Creates an available book with the next free id.
    ///
    /// # Errors
    /// - `IdSpaceExhausted` once the allocator reached `BookId::MAX`; the
    ///   allocator never wraps back to ids already in use.
    pub fn add_book(
        &self,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> LibraryResult<EntityHandle<Book>> {
        let id = self
            .next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (current < BookId::MAX).then_some(current + 1)
            })
            .map_err(|_| LibraryError::IdSpaceExhausted)?;
        Ok(self.store.insert(Book::new(id, title, author, year)))
    }

    /// Inserts a book with a caller-assigned id.
    ///
    /// Raises the allocator watermark past `book.id()`. The caller is
    /// responsible for id uniqueness.
    pub fn insert(&self, book: Book) -> EntityHandle<Book> {
        self.next_id
            .fetch_max(watermark_after(Some(book.id())), Ordering::SeqCst);
        self.store.insert(book)
    }

    /// # Errors
    /// - `NotFound` when no book has `id`.
    /// - `State(AlreadyCheckedOut)` when the book is not available.
    pub fn check_out(&self, id: BookId) -> LibraryResult<()> {
        let handle = self.require(id)?;
        handle.update(Book::check_out)?;
        Ok(())
    }

    /// # Errors
    /// - `NotFound` when no book has `id`.
    /// - `State(NotCheckedOut)` when the book is already available.
    pub fn return_book(&self, id: BookId) -> LibraryResult<()> {
        let handle = self.require(id)?;
        handle.update(Book::return_back)?;
        Ok(())
    }

    pub fn find_by_id(&self, id: BookId) -> Option<EntityHandle<Book>> {
        self.store.find_by_id(id)
    }

    pub fn find_where(&self, predicate: impl FnMut(&Book) -> bool) -> Vec<EntityHandle<Book>> {
        self.store.find_where(predicate)
    }

    pub fn all(&self) -> Vec<EntityHandle<Book>> {
        self.store.all()
    }

    pub fn remove_where(&self, predicate: impl FnMut(&Book) -> bool) -> usize {
        self.store.remove_where(predicate)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Id the next `add_book` call will assign, `None` once ids are exhausted.
    pub fn next_id(&self) -> Option<BookId> {
        let next = self.next_id.load(Ordering::SeqCst);
        (next < BookId::MAX).then_some(next)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Writes every book to the configured file and returns the record count.
    pub fn save(&self) -> LibraryResult<usize> {
        Ok(self.store.save(&self.db_path)?)
    }

    /// Replaces contents with the configured file and raises the id watermark.
    ///
    /// The watermark never moves backwards, so ids handed out before the
    /// reload are not reissued.
    pub fn load(&self) -> LibraryResult<LoadReport> {
        let report = self.store.load(&self.db_path)?;
        self.next_id
            .fetch_max(watermark_after(self.store.max_id()), Ordering::SeqCst);
        Ok(report)
    }

    /// Stops autosave, waits for it, then performs the final save.
    pub fn shutdown(mut self) -> LibraryResult<usize> {
        self.close()
    }

    fn close(&mut self) -> LibraryResult<usize> {
        if let Some(autosave) = self.autosave.take() {
            autosave.stop();
        }
        let saved = self.save();
        match &saved {
            Ok(records) => info!(
                "event=library_close module=service status=ok records={records}"
            ),
            Err(err) => error!("event=library_close module=service status=error error={err}"),
        }
        saved
    }

    fn require(&self, id: BookId) -> LibraryResult<EntityHandle<Book>> {
        self.store.find_by_id(id).ok_or(LibraryError::NotFound(id))
    }
}

/// First id above `max`, saturating at `BookId::MAX` (the exhausted marker).
fn watermark_after(max: Option<BookId>) -> BookId {
    max.map_or(1, |max| max.saturating_add(1))
}

impl Drop for Library {
    fn drop(&mut self) {
        // `shutdown` already ran the final save when autosave is gone.
        if self.autosave.is_some() {
            let _ = self.close();
        }
    }
}
