// ── Local dashboard state ──
//
// In-memory cache of every collection the dashboard shows. Mutations are
// broadcast to subscribers via `watch` channels; nothing here talks to
// the backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{Entity, EntityId, EntityKind, Event, Product, Project, Section};
use crate::stream::EntityStream;

/// Central reactive store for projects, events, and products.
pub struct DataStore {
    pub(crate) projects: EntityCollection<Project>,
    pub(crate) events: EntityCollection<Event>,
    pub(crate) products: EntityCollection<Product>,
    pub(crate) last_fetch: watch::Sender<Option<(EntityKind, DateTime<Utc>)>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_fetch, _) = watch::channel(None);
        Self {
            projects: EntityCollection::new(),
            events: EntityCollection::new(),
            products: EntityCollection::new(),
            last_fetch,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn projects_snapshot(&self) -> Arc<Vec<Arc<Project>>> {
        self.projects.snapshot()
    }

    pub fn events_snapshot(&self) -> Arc<Vec<Arc<Event>>> {
        self.events.snapshot()
    }

    pub fn products_snapshot(&self) -> Arc<Vec<Arc<Product>>> {
        self.products.snapshot()
    }

    /// Every cached entity of `kind`, in display order.
    pub fn entities(&self, kind: EntityKind) -> Vec<Entity> {
        match kind {
            EntityKind::Projects => collect(&self.projects),
            EntityKind::Events => collect(&self.events),
            EntityKind::Products => collect(&self.products),
        }
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn get(&self, kind: EntityKind, id: EntityId) -> Option<Entity> {
        match kind {
            EntityKind::Projects => self.projects.get(id).map(|p| Entity::Project((*p).clone())),
            EntityKind::Events => self.events.get(id).map(|e| Entity::Event((*e).clone())),
            EntityKind::Products => self.products.get(id).map(|p| Entity::Product((*p).clone())),
        }
    }

    pub fn project(&self, id: EntityId) -> Option<Arc<Project>> {
        self.projects.get(id)
    }

    pub fn section(&self, project_id: EntityId, section_id: EntityId) -> Option<Section> {
        self.projects
            .get(project_id)
            .and_then(|p| p.section(section_id).cloned())
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Projects => self.projects.len(),
            EntityKind::Events => self.events.len(),
            EntityKind::Products => self.products.len(),
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Replace the collection for `kind`. Entities of another kind are
    /// ignored.
    pub(crate) fn replace(&self, kind: EntityKind, entities: Vec<Entity>) {
        match kind {
            EntityKind::Projects => self.projects.replace_all(
                entities
                    .into_iter()
                    .filter_map(|e| match e {
                        Entity::Project(p) => Some((p.id, p)),
                        _ => None,
                    }),
            ),
            EntityKind::Events => self.events.replace_all(
                entities.into_iter().filter_map(|e| match e {
                    Entity::Event(ev) => Some((ev.id, ev)),
                    _ => None,
                }),
            ),
            EntityKind::Products => self.products.replace_all(
                entities.into_iter().filter_map(|e| match e {
                    Entity::Product(p) => Some((p.id, p)),
                    _ => None,
                }),
            ),
        }
        self.last_fetch.send_replace(Some((kind, Utc::now())));
    }

    /// Merge one entity: replace by id, or append.
    pub(crate) fn upsert(&self, entity: Entity) -> bool {
        match entity {
            Entity::Project(p) => self.projects.upsert(p.id, p),
            Entity::Event(e) => self.events.upsert(e.id, e),
            Entity::Product(p) => self.products.upsert(p.id, p),
        }
    }

    pub(crate) fn remove(&self, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Projects => self.projects.remove(id).is_some(),
            EntityKind::Events => self.events.remove(id).is_some(),
            EntityKind::Products => self.products.remove(id).is_some(),
        }
    }

    /// Replace a project's nested sections.
    pub(crate) fn set_sections(&self, project_id: EntityId, sections: Vec<Section>) -> bool {
        self.projects
            .modify(project_id, |p| p.sections = sections)
    }

    /// Merge a section into its parent: replace by id, or append.
    pub(crate) fn upsert_section(&self, section: Section) -> bool {
        self.projects.modify(section.project_id, |p| {
            match p.sections.iter_mut().find(|s| s.id == section.id) {
                Some(slot) => *slot = section,
                None => p.sections.push(section),
            }
        })
    }

    pub(crate) fn remove_section(&self, project_id: EntityId, section_id: EntityId) -> bool {
        self.projects
            .modify(project_id, |p| p.sections.retain(|s| s.id != section_id))
    }

    /// Drop every cached entity (after logout).
    pub(crate) fn clear(&self) {
        self.projects.clear();
        self.events.clear();
        self.products.clear();
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_projects(&self) -> EntityStream<Project> {
        EntityStream::new(self.projects.subscribe())
    }

    pub fn subscribe_events(&self) -> EntityStream<Event> {
        EntityStream::new(self.events.subscribe())
    }

    pub fn subscribe_products(&self) -> EntityStream<Product> {
        EntityStream::new(self.products.subscribe())
    }

    // ── Metadata ─────────────────────────────────────────────────────

    /// The most recent collection fetch and when it landed.
    pub fn last_fetch(&self) -> Option<(EntityKind, DateTime<Utc>)> {
        *self.last_fetch.borrow()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

fn collect<T>(col: &EntityCollection<T>) -> Vec<Entity>
where
    T: Clone + Send + Sync + Into<Entity> + 'static,
{
    col.snapshot().iter().map(|e| (**e).clone().into()).collect()
}
