// ── Form state ──
//
// One working draft per entity type. Drafts carry only the editable
// fields; ids and timestamps come from the backend (or from the local
// fallback in `mutation`). Nothing here touches the network.

use serde::{Deserialize, Serialize};

use crate::model::{
    Entity, EntityKind, Event, EventStatus, Product, Project, ProjectStatus, Section,
};

/// Which form a draft belongs to. Sections have their own form inside
/// the projects tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FormKind {
    Projects,
    Events,
    Products,
    Sections,
}

impl From<EntityKind> for FormKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Projects => Self::Projects,
            EntityKind::Events => Self::Events,
            EntityKind::Products => Self::Products,
        }
    }
}

// ── Drafts ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub overview: String,
    pub main_image_url: String,
    pub status: ProjectStatus,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            overview: String::new(),
            main_image_url: String::new(),
            status: ProjectStatus::Active,
        }
    }
}

impl From<&Project> for ProjectDraft {
    fn from(p: &Project) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            overview: p.overview.clone(),
            main_image_url: p.main_image_url.clone(),
            status: p.status,
        }
    }
}

/// `status` is kept so an edit form can show it, but it is never sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub image_url: String,
    pub url: String,
    pub status: EventStatus,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            date: String::new(),
            time: String::new(),
            location: String::new(),
            image_url: String::new(),
            url: String::new(),
            status: EventStatus::Upcoming,
        }
    }
}

impl From<&Event> for EventDraft {
    fn from(e: &Event) -> Self {
        Self {
            title: e.title.clone(),
            description: e.description.clone(),
            date: e.date.clone(),
            time: e.time.clone(),
            location: e.location.clone(),
            image_url: e.image_url.clone(),
            url: e.url.clone(),
            status: e.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub in_stock: bool,
    pub image_url: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: 0.0,
            in_stock: true,
            image_url: String::new(),
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price,
            in_stock: p.in_stock,
            image_url: p.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionDraft {
    pub title: String,
    pub description: String,
    pub details: String,
    pub image_url: String,
}

impl From<&Section> for SectionDraft {
    fn from(s: &Section) -> Self {
        Self {
            title: s.title.clone(),
            description: s.description.clone(),
            details: s.details.clone(),
            image_url: s.image_url.clone(),
        }
    }
}

/// A draft for any top-level entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Project(ProjectDraft),
    Event(EventDraft),
    Product(ProductDraft),
}

impl Draft {
    /// The default draft for `kind`.
    pub fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Projects => Self::Project(ProjectDraft::default()),
            EntityKind::Events => Self::Event(EventDraft::default()),
            EntityKind::Products => Self::Product(ProductDraft::default()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Project(_) => EntityKind::Projects,
            Self::Event(_) => EntityKind::Events,
            Self::Product(_) => EntityKind::Products,
        }
    }

    /// Parse a camelCase JSON object as a draft of `kind`. Missing fields
    /// take their defaults.
    pub fn from_json(kind: EntityKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            EntityKind::Projects => Self::Project(serde_json::from_value(value)?),
            EntityKind::Events => Self::Event(serde_json::from_value(value)?),
            EntityKind::Products => Self::Product(serde_json::from_value(value)?),
        })
    }
}

impl From<&Entity> for Draft {
    fn from(entity: &Entity) -> Self {
        match entity {
            Entity::Project(p) => Self::Project(p.into()),
            Entity::Event(e) => Self::Event(e.into()),
            Entity::Product(p) => Self::Product(p.into()),
        }
    }
}

// ── FormState ────────────────────────────────────────────────────────

/// Working drafts for every form on the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    project: ProjectDraft,
    event: EventDraft,
    product: ProductDraft,
    section: SectionDraft,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the draft for `kind`.
    pub fn draft(&self, kind: EntityKind) -> Draft {
        match kind {
            EntityKind::Projects => Draft::Project(self.project.clone()),
            EntityKind::Events => Draft::Event(self.event.clone()),
            EntityKind::Products => Draft::Product(self.product.clone()),
        }
    }

    /// Replace the draft of the draft's own kind.
    pub fn set(&mut self, draft: Draft) {
        match draft {
            Draft::Project(d) => self.project = d,
            Draft::Event(d) => self.event = d,
            Draft::Product(d) => self.product = d,
        }
    }

    /// Seed the matching draft from an existing entity for editing.
    pub fn load(&mut self, item: &Entity) {
        self.set(Draft::from(item));
    }

    pub fn load_section(&mut self, section: &Section) {
        self.section = section.into();
    }

    /// Restore `kind`'s draft to its default shape.
    pub fn reset(&mut self, kind: FormKind) {
        match kind {
            FormKind::Projects => self.project = ProjectDraft::default(),
            FormKind::Events => self.event = EventDraft::default(),
            FormKind::Products => self.product = ProductDraft::default(),
            FormKind::Sections => self.section = SectionDraft::default(),
        }
    }

    pub fn project(&self) -> &ProjectDraft {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut ProjectDraft {
        &mut self.project
    }

    pub fn event(&self) -> &EventDraft {
        &self.event
    }

    pub fn event_mut(&mut self) -> &mut EventDraft {
        &mut self.event
    }

    pub fn product(&self) -> &ProductDraft {
        &self.product
    }

    pub fn product_mut(&mut self) -> &mut ProductDraft {
        &mut self.product
    }

    pub fn section(&self) -> &SectionDraft {
        &self.section
    }

    pub fn section_mut(&mut self) -> &mut SectionDraft {
        &mut self.section
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{EntityId, SyncState};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn product() -> Product {
        Product {
            id: EntityId::new(4),
            name: "Owl Set".into(),
            description: "Three owls".into(),
            price: 79.99,
            in_stock: false,
            image_url: "https://img/owl.png".into(),
            sync: SyncState::Confirmed,
        }
    }

    #[test]
    fn defaults_match_blank_forms() {
        let form = FormState::new();
        assert_eq!(form.project().status, ProjectStatus::Active);
        assert_eq!(form.event().status, EventStatus::Upcoming);
        assert!(form.product().in_stock);
        assert!(form.product().price.abs() < f64::EPSILON);
        assert_eq!(form.section(), &SectionDraft::default());
    }

    #[test]
    fn load_then_reset() {
        let mut form = FormState::new();
        form.load(&Entity::Product(product()));
        assert_eq!(form.product().name, "Owl Set");
        assert!(!form.product().in_stock);

        form.reset(FormKind::Products);
        assert_eq!(form.product(), &ProductDraft::default());
    }

    #[test]
    fn reset_only_touches_one_form() {
        let mut form = FormState::new();
        form.project_mut().name = "Solar Kiosk".into();
        form.section_mut().title = "Pilot".into();

        form.reset(FormKind::Sections);
        assert_eq!(form.project().name, "Solar Kiosk");
        assert!(form.section().title.is_empty());
    }

    #[test]
    fn draft_from_partial_json() {
        let draft = Draft::from_json(
            EntityKind::Products,
            json!({ "name": "Filament", "imageUrl": "https://img/f.png" }),
        )
        .unwrap();
        let Draft::Product(p) = draft else {
            panic!("expected a product draft");
        };
        assert_eq!(p.image_url, "https://img/f.png");
        assert!(p.in_stock);
    }
}
