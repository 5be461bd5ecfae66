//! Storage abstraction for users, projects and tasks.
//!
//! Handlers and services only ever talk to `Arc<dyn Repository<T>>`, so the in-memory
//! implementation in [`memory`] can be replaced by a real database without touching them.

pub mod memory;

use std::fmt;

pub use memory::MemoryRepository;

/// Identifier type shared by every stored entity.
pub type EntityId = u64;

/// A record that can be kept in a [`Repository`].
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> EntityId;

    /// Called by the repository on insert to stamp the freshly allocated id.
    fn set_id(&mut self, id: EntityId);
}

/// Errors raised by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A lock guarding the named collection was poisoned by a panicking writer.
    Poisoned(&'static str),
    /// `insert_unique` found a clashing record.
    Duplicate(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Poisoned(collection) => write!(f, "{} store lock poisoned", collection),
            StoreError::Duplicate(msg) => write!(f, "Duplicate record: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Capability set every storage backend provides.
///
/// All listing operations return records in insertion order. Every call is atomic
/// on its own; callers must not assume atomicity across calls.
pub trait Repository<T: Entity>: Send + Sync {
    fn get(&self, id: EntityId) -> StoreResult<Option<T>>;

    fn list(&self) -> StoreResult<Vec<T>>;

    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> StoreResult<Vec<T>>;

    /// Assigns the next id to `item`, stores it and returns the stored copy.
    fn insert(&self, item: T) -> StoreResult<T>;

    /// Like [`Repository::insert`], but fails with [`StoreError::Duplicate`] carrying
    /// `conflict_message` if any stored record satisfies `clashes`.
    /// The check and the insert happen under one lock.
    fn insert_unique(
        &self,
        item: T,
        clashes: &dyn Fn(&T) -> bool,
        conflict_message: &str,
    ) -> StoreResult<T>;

    /// Replaces the record with `item.id()`. Returns `None` if it no longer exists.
    fn update(&self, item: T) -> StoreResult<Option<T>>;

    /// Removes and returns the record, or `None` if there was nothing to remove.
    fn delete(&self, id: EntityId) -> StoreResult<Option<T>>;

    fn count(&self) -> StoreResult<usize>;
}
