use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Entity, EntityId, Repository, StoreError, StoreResult};

/// Process-lifetime repository backed by an ordered map.
///
/// Ids come from a per-repository counter starting at 1 and are never reused, so
/// iterating the map in key order is insertion order.
pub struct MemoryRepository<T> {
    name: &'static str,
    next_id: AtomicU64,
    records: RwLock<BTreeMap<EntityId, T>>,
}

impl<T: Entity> MemoryRepository<T> {
    /// `name` only shows up in error messages.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: AtomicU64::new(1),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<EntityId, T>>> {
        self.records.read().map_err(|_| StoreError::Poisoned(self.name))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<EntityId, T>>> {
        self.records.write().map_err(|_| StoreError::Poisoned(self.name))
    }

    fn allocate_id(&self) -> EntityId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn get(&self, id: EntityId) -> StoreResult<Option<T>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> StoreResult<Vec<T>> {
        Ok(self
            .read()?
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect())
    }

    fn insert(&self, mut item: T) -> StoreResult<T> {
        let mut records = self.write()?;
        item.set_id(self.allocate_id());
        records.insert(item.id(), item.clone());
        Ok(item)
    }

    fn insert_unique(
        &self,
        mut item: T,
        clashes: &dyn Fn(&T) -> bool,
        conflict_message: &str,
    ) -> StoreResult<T> {
        let mut records = self.write()?;
        if records.values().any(|record| clashes(record)) {
            return Err(StoreError::Duplicate(conflict_message.to_string()));
        }
        item.set_id(self.allocate_id());
        records.insert(item.id(), item.clone());
        Ok(item)
    }

    fn update(&self, item: T) -> StoreResult<Option<T>> {
        let mut records = self.write()?;
        match records.get_mut(&item.id()) {
            Some(slot) => {
                *slot = item.clone();
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: EntityId) -> StoreResult<Option<T>> {
        Ok(self.write()?.remove(&id))
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }
}
