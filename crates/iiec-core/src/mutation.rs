// ── Mutations ──
//
// Create, update, and delete for top-level entities and project sections.
// Successful writes merge the backend's copy into the store; failed ones
// follow the configured `WriteFailurePolicy`. A 401 always aborts without
// touching local state. Nothing here re-fetches.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use iiec_api::models::SectionRecord;

use crate::config::WriteFailurePolicy;
use crate::controller::AdminClient;
use crate::convert::{local_entity, local_section, section_payload};
use crate::error::CoreError;
use crate::form::{Draft, SectionDraft};
use crate::model::{Entity, EntityId, EntityKind, Section, today};
use crate::registry::descriptor;

// ── Confirmation ─────────────────────────────────────────────────

/// Asks the user before a delete goes out.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

// ── Outcomes ─────────────────────────────────────────────────────

/// Result of a save that reached local state.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<T> {
    /// The backend accepted the write; `T` is its copy.
    Confirmed(T),
    /// The backend rejected the write; `item` was built locally and is
    /// flagged `LocalOnly`.
    LocalOnly { item: T, error: String },
}

impl<T> SaveOutcome<T> {
    pub fn item(&self) -> &T {
        match self {
            Self::Confirmed(item) | Self::LocalOnly { item, .. } => item,
        }
    }

    pub fn into_item(self) -> T {
        match self {
            Self::Confirmed(item) | Self::LocalOnly { item, .. } => item,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    /// The backend error behind a local-only save.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Confirmed(_) => None,
            Self::LocalOnly { error, .. } => Some(error),
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The backend call failed; the entity was dropped locally anyway.
    RemovedLocally { error: String },
    /// The user declined the prompt. No request was sent.
    Cancelled,
}

impl RemoveOutcome {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::RemovedLocally { error } => Some(error),
            _ => None,
        }
    }
}

fn delete_prompt(label: &str) -> String {
    format!("Are you sure you want to delete this {label}?")
}

// ── Top-level entities ───────────────────────────────────────────

impl AdminClient {
    /// Create (`editing == None`) or update the entity described by
    /// `draft`, then merge the result into the store.
    pub async fn save(
        &self,
        draft: &Draft,
        editing: Option<EntityId>,
    ) -> Result<SaveOutcome<Entity>, CoreError> {
        let kind = draft.kind();
        let desc = descriptor(kind);
        let payload = (desc.to_backend)(draft)?;
        let api = &self.inner.api;

        debug!(kind = %kind, ?editing, "saving");
        let result = self
            .inner
            .session
            .authorized(|token| async move {
                match editing {
                    Some(id) => {
                        api.update::<Value, Value>(desc.endpoint, id.get(), &payload, Some(&token))
                            .await
                    }
                    None => {
                        api.create::<Value, Value>(desc.endpoint, &payload, Some(&token))
                            .await
                    }
                }
            })
            .await
            .and_then(|value| (desc.from_backend)(value, today()));

        match result {
            Ok(entity) => {
                self.inner.store.upsert(entity.clone());
                Ok(SaveOutcome::Confirmed(entity))
            }
            Err(e) if e.is_auth() => Err(e),
            Err(e) => match self.inner.config.write_policy {
                WriteFailurePolicy::Surface => Err(e),
                WriteFailurePolicy::LocalFallback => {
                    warn!(kind = %kind, error = %e, "save failed, keeping local copy");
                    let id = editing.unwrap_or_else(EntityId::synthesize);
                    let base = editing.and_then(|id| self.inner.store.get(kind, id));
                    let entity = local_entity(draft, id, base.as_ref(), Utc::now(), today());
                    self.inner.store.upsert(entity.clone());
                    Ok(SaveOutcome::LocalOnly {
                        item: entity,
                        error: e.to_string(),
                    })
                }
            },
        }
    }

    /// Delete an entity after the user confirms.
    pub async fn remove(
        &self,
        kind: EntityKind,
        id: EntityId,
        confirm: &impl Confirm,
    ) -> Result<RemoveOutcome, CoreError> {
        let desc = descriptor(kind);
        if !confirm.confirm(&delete_prompt(desc.label)) {
            return Ok(RemoveOutcome::Cancelled);
        }

        let api = &self.inner.api;
        let result = self
            .inner
            .session
            .authorized(|token| async move {
                api.remove(desc.endpoint, id.get(), Some(&token)).await
            })
            .await;

        match result {
            Ok(()) => {
                self.inner.store.remove(kind, id);
                Ok(RemoveOutcome::Removed)
            }
            Err(e) if e.is_auth() => Err(e),
            Err(e) => match self.inner.config.write_policy {
                WriteFailurePolicy::Surface => Err(e),
                WriteFailurePolicy::LocalFallback => {
                    warn!(kind = %kind, %id, error = %e, "delete failed, removing locally");
                    self.inner.store.remove(kind, id);
                    Ok(RemoveOutcome::RemovedLocally {
                        error: e.to_string(),
                    })
                }
            },
        }
    }

    // ── Sections ─────────────────────────────────────────────────

    /// Create or update a section of `project_id` and merge it into the
    /// project's nested list.
    pub async fn save_section(
        &self,
        project_id: EntityId,
        draft: &SectionDraft,
        editing: Option<EntityId>,
    ) -> Result<SaveOutcome<Section>, CoreError> {
        let payload = section_payload(project_id, draft);
        let api = &self.inner.api;

        debug!(%project_id, ?editing, "saving section");
        let result = self
            .inner
            .session
            .authorized(|token| async move {
                match editing {
                    Some(id) => {
                        api.update_section::<_, SectionRecord>(id.get(), &payload, Some(&token))
                            .await
                    }
                    None => {
                        api.create_section::<_, SectionRecord>(
                            project_id.get(),
                            &payload,
                            Some(&token),
                        )
                        .await
                    }
                }
            })
            .await;

        match result {
            Ok(record) => {
                let section = Section::from(record);
                self.inner.store.upsert_section(section.clone());
                Ok(SaveOutcome::Confirmed(section))
            }
            Err(e) if e.is_auth() => Err(e),
            Err(e) => match self.inner.config.write_policy {
                WriteFailurePolicy::Surface => Err(e),
                WriteFailurePolicy::LocalFallback => {
                    warn!(%project_id, error = %e, "section save failed, keeping local copy");
                    let id = editing.unwrap_or_else(EntityId::synthesize);
                    let base = editing.and_then(|id| self.inner.store.section(project_id, id));
                    let section = local_section(draft, id, project_id, base.as_ref(), Utc::now());
                    self.inner.store.upsert_section(section.clone());
                    Ok(SaveOutcome::LocalOnly {
                        item: section,
                        error: e.to_string(),
                    })
                }
            },
        }
    }

    /// Delete a section after the user confirms.
    pub async fn remove_section(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        confirm: &impl Confirm,
    ) -> Result<RemoveOutcome, CoreError> {
        if !confirm.confirm(&delete_prompt("section")) {
            return Ok(RemoveOutcome::Cancelled);
        }

        let api = &self.inner.api;
        let result = self
            .inner
            .session
            .authorized(|token| async move {
                api.remove_section(section_id.get(), Some(&token)).await
            })
            .await;

        match result {
            Ok(()) => {
                self.inner.store.remove_section(project_id, section_id);
                Ok(RemoveOutcome::Removed)
            }
            Err(e) if e.is_auth() => Err(e),
            Err(e) => match self.inner.config.write_policy {
                WriteFailurePolicy::Surface => Err(e),
                WriteFailurePolicy::LocalFallback => {
                    warn!(
                        %project_id,
                        %section_id,
                        error = %e,
                        "section delete failed, removing locally"
                    );
                    self.inner.store.remove_section(project_id, section_id);
                    Ok(RemoveOutcome::RemovedLocally {
                        error: e.to_string(),
                    })
                }
            },
        }
    }
}
