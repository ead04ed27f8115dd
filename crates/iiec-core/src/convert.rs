// ── Backend/view-model conversions ──
//
// Bridges the snake_case wire types in `iiec_api::models` and the
// camelCase view models in `crate::model`. Reads fill defaults for
// missing optional columns and recompute event status; writes rename
// fields to backend convention and drop anything the backend doesn't
// store (event status).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use iiec_api::models::{
    ApiUser, EventPayload, EventRecord, OrderPayload, OrderRecord, ProductPayload, ProductRecord,
    ProjectPayload, ProjectRecord, SectionPayload, SectionRecord,
};

use crate::form::{Draft, EventDraft, ProductDraft, ProjectDraft, SectionDraft};
use crate::model::{
    Entity, EntityId, Event, EventStatus, Order, OrderRequest, Product, Project, ProjectStatus,
    Section, SyncState, User,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a backend timestamp. Accepts RFC 3339 and the naive
/// `YYYY-MM-DDTHH:MM:SS[.ffffff]` form SQL columns serialize to (taken
/// as UTC).
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn text(raw: Option<String>) -> String {
    raw.unwrap_or_default()
}

// ── Reads ──────────────────────────────────────────────────────────

impl From<SectionRecord> for Section {
    fn from(r: SectionRecord) -> Self {
        Self {
            id: EntityId::new(r.id),
            project_id: EntityId::new(r.project_id),
            title: r.title,
            description: text(r.description),
            details: text(r.details),
            image_url: text(r.main_image_url),
            created_at: parse_timestamp(r.created_at.as_deref()),
            updated_at: parse_timestamp(r.updated_at.as_deref()),
            sync: SyncState::Confirmed,
        }
    }
}

impl From<ProjectRecord> for Project {
    fn from(r: ProjectRecord) -> Self {
        Self {
            id: EntityId::new(r.id),
            name: r.name,
            description: text(r.description),
            overview: text(r.overview),
            main_image_url: text(r.main_image_url),
            status: ProjectStatus::from_backend(r.status.as_deref()),
            created_at: parse_timestamp(r.created_at.as_deref()),
            updated_at: parse_timestamp(r.updated_at.as_deref()),
            sections: r.sections.into_iter().map(Section::from).collect(),
            sync: SyncState::Confirmed,
        }
    }
}

/// Build an event, deriving its status from `date` relative to `today`.
pub fn event_from_record(r: EventRecord, today: NaiveDate) -> Event {
    let status = EventStatus::for_date(&r.date, today);
    Event {
        id: EntityId::new(r.id),
        title: r.title,
        description: text(r.description),
        date: r.date,
        time: text(r.time),
        location: text(r.location),
        image_url: text(r.image_url),
        url: text(r.url),
        status,
        created_at: parse_timestamp(r.created_at.as_deref()),
        updated_at: parse_timestamp(r.updated_at.as_deref()),
        sync: SyncState::Confirmed,
    }
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        Self {
            id: EntityId::new(r.id),
            name: r.name,
            description: text(r.description),
            price: r.price,
            in_stock: r.in_stock,
            image_url: text(r.image),
            sync: SyncState::Confirmed,
        }
    }
}

impl From<OrderRecord> for Order {
    fn from(r: OrderRecord) -> Self {
        Self {
            id: EntityId::new(r.id),
            full_name: r.full_name,
            email: r.email,
            contact: r.contact,
            product_title: r.product_title,
            quantity: r.quantity,
            total_amount: r.total_amount,
            order_date: parse_timestamp(r.order_date.as_deref()),
        }
    }
}

impl From<ApiUser> for User {
    fn from(u: ApiUser) -> Self {
        Self {
            id: EntityId::new(u.id),
            email: u.email,
            name: u.name,
        }
    }
}

// ── Writes ─────────────────────────────────────────────────────────

impl From<&ProjectDraft> for ProjectPayload {
    fn from(d: &ProjectDraft) -> Self {
        Self {
            name: d.name.clone(),
            description: d.description.clone(),
            overview: d.overview.clone(),
            main_image_url: d.main_image_url.clone(),
            status: d.status.to_string(),
        }
    }
}

impl From<&EventDraft> for EventPayload {
    fn from(d: &EventDraft) -> Self {
        Self {
            title: d.title.clone(),
            description: d.description.clone(),
            date: d.date.clone(),
            time: d.time.clone(),
            location: d.location.clone(),
            url: d.url.clone(),
            image_url: d.image_url.clone(),
        }
    }
}

impl From<&ProductDraft> for ProductPayload {
    fn from(d: &ProductDraft) -> Self {
        Self {
            name: d.name.clone(),
            description: d.description.clone(),
            price: d.price,
            image: d.image_url.clone(),
            in_stock: d.in_stock,
        }
    }
}

pub(crate) fn section_payload(project_id: EntityId, d: &SectionDraft) -> SectionPayload {
    SectionPayload {
        project_id: project_id.get(),
        title: d.title.clone(),
        description: d.description.clone(),
        details: d.details.clone(),
        main_image_url: d.image_url.clone(),
    }
}

impl From<&OrderRequest> for OrderPayload {
    fn from(o: &OrderRequest) -> Self {
        Self {
            full_name: o.full_name.clone(),
            email: o.email.clone(),
            contact: o.contact.clone(),
            product_title: o.product_title.clone(),
            quantity: o.quantity,
            total_amount: o.total_amount(),
        }
    }
}

// ── Local fallback records ─────────────────────────────────────────

fn created_at_of(entity: &Entity) -> Option<DateTime<Utc>> {
    match entity {
        Entity::Project(p) => p.created_at,
        Entity::Event(e) => e.created_at,
        Entity::Product(_) => None,
    }
}

/// Build the record a failed write leaves behind: the draft's fields
/// under `id`, flagged `LocalOnly`. An update keeps `base`'s creation
/// time (and a project's sections); a create is stamped `now`.
pub(crate) fn local_entity(
    draft: &Draft,
    id: EntityId,
    base: Option<&Entity>,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Entity {
    let created_at = Some(base.and_then(created_at_of).unwrap_or(now));
    match draft {
        Draft::Project(d) => Entity::Project(Project {
            id,
            name: d.name.clone(),
            description: d.description.clone(),
            overview: d.overview.clone(),
            main_image_url: d.main_image_url.clone(),
            status: d.status,
            created_at,
            updated_at: Some(now),
            sections: base
                .and_then(Entity::as_project)
                .map(|p| p.sections.clone())
                .unwrap_or_default(),
            sync: SyncState::LocalOnly,
        }),
        Draft::Event(d) => Entity::Event(Event {
            id,
            title: d.title.clone(),
            description: d.description.clone(),
            date: d.date.clone(),
            time: d.time.clone(),
            location: d.location.clone(),
            image_url: d.image_url.clone(),
            url: d.url.clone(),
            status: EventStatus::for_date(&d.date, today),
            created_at,
            updated_at: Some(now),
            sync: SyncState::LocalOnly,
        }),
        Draft::Product(d) => Entity::Product(Product {
            id,
            name: d.name.clone(),
            description: d.description.clone(),
            price: d.price,
            in_stock: d.in_stock,
            image_url: d.image_url.clone(),
            sync: SyncState::LocalOnly,
        }),
    }
}

pub(crate) fn local_section(
    draft: &SectionDraft,
    id: EntityId,
    project_id: EntityId,
    base: Option<&Section>,
    now: DateTime<Utc>,
) -> Section {
    Section {
        id,
        project_id,
        title: draft.title.clone(),
        description: draft.description.clone(),
        details: draft.details.clone(),
        image_url: draft.image_url.clone(),
        created_at: Some(base.and_then(|s| s.created_at).unwrap_or(now)),
        updated_at: Some(now),
        sync: SyncState::LocalOnly,
    }
}
