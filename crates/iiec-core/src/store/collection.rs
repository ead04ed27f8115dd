// ── Ordered reactive entity collection ──
//
// Insertion-ordered storage keyed by `EntityId`, with push-based change
// notification via `watch` channels. Order matters here: updates replace
// in place and creates append, so a list renders the way the user left it.

use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use tokio::sync::watch;

use crate::model::EntityId;

/// A reactive, ordered collection for a single entity type.
///
/// Every mutation rebuilds the snapshot that subscribers receive. Locks
/// are held only for the map update itself, never across an await.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    items: RwLock<IndexMap<EntityId, Arc<T>>>,

    /// Full snapshot, rebuilt on mutation for cheap subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            items: RwLock::new(IndexMap::new()),
            snapshot,
        }
    }

    /// Replace the whole collection, keeping the given order.
    pub(crate) fn replace_all(&self, entities: impl IntoIterator<Item = (EntityId, T)>) {
        let fresh: IndexMap<EntityId, Arc<T>> = entities
            .into_iter()
            .map(|(id, e)| (id, Arc::new(e)))
            .collect();
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        *items = fresh;
        self.publish(&items);
    }

    /// Replace the entry with this id in place, or append it. Returns
    /// `true` if the id was new.
    pub(crate) fn upsert(&self, id: EntityId, entity: T) -> bool {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let is_new = items.insert(id, Arc::new(entity)).is_none();
        self.publish(&items);
        is_new
    }

    /// Edit an entity in place. Returns `false` if the id is unknown.
    pub(crate) fn modify(&self, id: EntityId, edit: impl FnOnce(&mut T)) -> bool {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let Some(slot) = items.get_mut(&id) else {
            return false;
        };
        edit(Arc::make_mut(slot));
        self.publish(&items);
        true
    }

    /// Remove an entity, keeping the order of the rest.
    pub(crate) fn remove(&self, id: EntityId) -> Option<Arc<T>> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let removed = items.shift_remove(&id);
        if removed.is_some() {
            self.publish(&items);
        }
        removed
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<Arc<T>> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn clear(&self) {
        self.replace_all(std::iter::empty());
    }

    pub(crate) fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Broadcast the current contents to subscribers.
    fn publish(&self, items: &IndexMap<EntityId, Arc<T>>) {
        let values: Vec<Arc<T>> = items.values().cloned().collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}
