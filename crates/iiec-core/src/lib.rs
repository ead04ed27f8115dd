// iiec-core: Session, sync, and mutation layer between iiec-api and consumers.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod model;
pub mod mutation;
pub mod registry;
pub mod session;
pub mod store;
pub mod stream;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{past_events, upcoming_events};
pub use config::{ClientConfig, DEFAULT_API_URL, WriteFailurePolicy};
pub use controller::AdminClient;
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use form::{
    Draft, EventDraft, FormKind, FormState, ProductDraft, ProjectDraft, SectionDraft,
};
pub use mutation::{Confirm, RemoveOutcome, SaveOutcome};
pub use registry::{EntityDescriptor, descriptor};
pub use session::{MemoryTokenStore, SessionGuard, SessionState, TOKEN_KEY, TokenStore};
pub use store::DataStore;
pub use stream::EntityStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Entity, EntityId, EntityKind, Event, EventStatus, Order, OrderRequest, Product, Project,
    ProjectStatus, Section, SyncState, User,
};
