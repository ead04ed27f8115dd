// ── Common types shared across the domain model ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::event::Event;
use super::product::Product;
use super::project::Project;

/// Whether a cached record is known to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    /// Built from a backend response.
    #[default]
    Confirmed,
    /// Built locally after the backend rejected or never answered a write.
    LocalOnly,
}

impl SyncState {
    pub fn is_local_only(self) -> bool {
        matches!(self, Self::LocalOnly)
    }
}

/// Top-level entity types, one per dashboard tab.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Projects,
    Events,
    Products,
}

/// Any top-level entity, as cached in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Project(Project),
    Event(Event),
    Product(Product),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Self::Project(p) => p.id,
            Self::Event(e) => e.id,
            Self::Product(p) => p.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Project(_) => EntityKind::Projects,
            Self::Event(_) => EntityKind::Events,
            Self::Product(_) => EntityKind::Products,
        }
    }

    pub fn sync(&self) -> SyncState {
        match self {
            Self::Project(p) => p.sync,
            Self::Event(e) => e.sync,
            Self::Product(p) => p.sync,
        }
    }

    /// Display name (`name` for projects/products, `title` for events).
    pub fn title(&self) -> &str {
        match self {
            Self::Project(p) => &p.name,
            Self::Event(e) => &e.title,
            Self::Product(p) => &p.name,
        }
    }

    pub fn as_project(&self) -> Option<&Project> {
        match self {
            Self::Project(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_product(&self) -> Option<&Product> {
        match self {
            Self::Product(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Project> for Entity {
    fn from(p: Project) -> Self {
        Self::Project(p)
    }
}

impl From<Event> for Entity {
    fn from(e: Event) -> Self {
        Self::Event(e)
    }
}

impl From<Product> for Entity {
    fn from(p: Product) -> Self {
        Self::Product(p)
    }
}
