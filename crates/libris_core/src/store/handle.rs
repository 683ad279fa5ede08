//! Shared handle to a store-owned entity.

use crate::model::entity::Entity;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Reference-counted view of one entity.
///
/// A handle stays valid after the entity is removed from its store; it is then
/// detached and further updates no longer reach persistence.
pub struct EntityHandle<T: Entity> {
    id: T::Id,
    inner: Arc<Mutex<T>>,
}

impl<T: Entity> EntityHandle<T> {
    pub(crate) fn new(entity: T) -> Self {
        Self {
            id: entity.id(),
            inner: Arc::new(Mutex::new(entity)),
        }
    }

    /// Id captured at insertion; ids are immutable so no lock is needed.
    pub fn id(&self) -> T::Id {
        self.id
    }

    /// Runs `f` with shared access to the entity.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.lock();
        f(&*guard)
    }

    /// Runs `f` with exclusive access to the entity.
    ///
    /// Use this for state transitions; the closure's result is returned as is.
    /// The entity lock is held while `f` runs, so `f` must not call into the
    /// owning store: that inverts the store-then-entity lock order and can
    /// deadlock against a concurrent `save` or `remove_where`. The same holds
    /// for `read`.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Returns an owned copy of the current entity state.
    pub fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.lock().clone()
    }

    /// Returns whether both handles point at the same stored entity.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        // Entity transitions are all-or-nothing, so a poisoned guard still
        // holds a consistent value.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Entity> Clone for EntityHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Entity + Debug> Debug for EntityHandle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityHandle")
            .field("id", &self.id)
            .field("entity", &*self.lock())
            .finish()
    }
}
