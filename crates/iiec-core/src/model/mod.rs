// ── Domain model ──
//
// View-model shapes the dashboard works with. Field names are camelCase
// when serialized; the snake_case backend shapes live in `iiec_api::models`
// and are translated in `crate::convert`.

pub mod common;
pub mod entity_id;

pub mod event;
pub mod order;
pub mod product;
pub mod project;
pub mod user;

// ── Re-exports ──────────────────────────────────────────────────────

pub use common::{Entity, EntityKind, SyncState};
pub use entity_id::EntityId;
pub use event::{Event, EventStatus, parse_event_date, today};
pub use order::{Order, OrderRequest};
pub use product::Product;
pub use project::{Project, ProjectStatus, Section};
pub use user::User;
