// ── Entity registry ──
//
// One descriptor per top-level entity type: where it lives on the
// backend, what to call it, and how to move it across the wire. The
// synchronizer and mutation coordinator dispatch through this table
// instead of branching on the type themselves.

use chrono::NaiveDate;
use serde_json::Value;

use iiec_api::models::{
    EventPayload, EventRecord, ProductPayload, ProductRecord, ProjectPayload, ProjectRecord,
};

use crate::convert::event_from_record;
use crate::error::CoreError;
use crate::form::Draft;
use crate::model::{Entity, EntityKind, Product, Project};

/// How one entity type maps onto the backend.
#[derive(Debug)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    /// Path segment: `GET /{endpoint}`, `POST /{endpoint}/`, ...
    pub endpoint: &'static str,
    /// Singular noun for prompts and messages.
    pub label: &'static str,
    /// Draft to backend JSON body.
    pub to_backend: fn(&Draft) -> Result<Value, CoreError>,
    /// Backend JSON record to view model. The date drives event status.
    pub from_backend: fn(Value, NaiveDate) -> Result<Entity, CoreError>,
}

static PROJECTS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Projects,
    endpoint: "projects",
    label: "project",
    to_backend: project_to_backend,
    from_backend: project_from_backend,
};

static EVENTS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Events,
    endpoint: "events",
    label: "event",
    to_backend: event_to_backend,
    from_backend: event_from_backend,
};

static PRODUCTS: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Products,
    endpoint: "products",
    label: "product",
    to_backend: product_to_backend,
    from_backend: product_from_backend,
};

/// Look up the descriptor for `kind`.
pub fn descriptor(kind: EntityKind) -> &'static EntityDescriptor {
    match kind {
        EntityKind::Projects => &PROJECTS,
        EntityKind::Events => &EVENTS,
        EntityKind::Products => &PRODUCTS,
    }
}

// ── Transforms ───────────────────────────────────────────────────────

fn mismatch(expected: EntityKind, draft: &Draft) -> CoreError {
    CoreError::ValidationFailed {
        message: format!("expected a {expected} draft, got {}", draft.kind()),
    }
}

fn encode<T: serde::Serialize>(payload: &T) -> Result<Value, CoreError> {
    serde_json::to_value(payload).map_err(|e| CoreError::Internal(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, label: &str) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::Api {
        message: format!("malformed {label} record: {e}"),
        status: None,
    })
}

fn project_to_backend(draft: &Draft) -> Result<Value, CoreError> {
    match draft {
        Draft::Project(d) => encode(&ProjectPayload::from(d)),
        other => Err(mismatch(EntityKind::Projects, other)),
    }
}

fn project_from_backend(value: Value, _today: NaiveDate) -> Result<Entity, CoreError> {
    let record: ProjectRecord = decode(value, "project")?;
    Ok(Entity::Project(Project::from(record)))
}

fn event_to_backend(draft: &Draft) -> Result<Value, CoreError> {
    match draft {
        Draft::Event(d) => encode(&EventPayload::from(d)),
        other => Err(mismatch(EntityKind::Events, other)),
    }
}

fn event_from_backend(value: Value, today: NaiveDate) -> Result<Entity, CoreError> {
    let record: EventRecord = decode(value, "event")?;
    Ok(Entity::Event(event_from_record(record, today)))
}

fn product_to_backend(draft: &Draft) -> Result<Value, CoreError> {
    match draft {
        Draft::Product(d) => encode(&ProductPayload::from(d)),
        other => Err(mismatch(EntityKind::Products, other)),
    }
}

fn product_from_backend(value: Value, _today: NaiveDate) -> Result<Entity, CoreError> {
    let record: ProductRecord = decode(value, "product")?;
    Ok(Entity::Product(Product::from(record)))
}
