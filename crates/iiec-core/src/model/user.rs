// ── Admin user ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// The account behind the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub name: Option<String>,
}

impl User {
    /// Name if set, else email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
