//! Caller-owned in-memory repository. Services receive one of these instead
//! of reaching for shared globals.

use dashmap::DashMap;
use uuid::Uuid;

use crate::types::Campaign;

/// Anything stored by id.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

impl Entity for Campaign {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Concurrent map-backed store. Reads hand out clones, so callers always see
/// a consistent snapshot of an entity.
pub struct InMemoryRepository<T: Entity> {
    items: DashMap<Uuid, T>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.items.get(id).map(|item| item.clone())
    }

    pub fn list(&self) -> Vec<T> {
        self.items.iter().map(|item| item.value().clone()).collect()
    }

    /// Insert or replace; returns the previous value when one existed.
    pub fn upsert(&self, item: T) -> Option<T> {
        self.items.insert(item.id(), item)
    }

    pub fn delete(&self, id: &Uuid) -> Option<T> {
        self.items.remove(id).map(|(_, item)| item)
    }

    /// Apply `f` to the stored entity while holding its shard lock.
    pub fn update<R>(&self, id: &Uuid, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.items.get_mut(id).map(|mut item| f(item.value_mut()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}
