// ── Collection reads ──
//
// Fetches a whole collection, converts it to view models, and replaces
// the cached copy. Read failures never propagate: the collection is
// emptied and a warning logged. A 401 still ends the session on the way.
// The `try_` variants return the failure instead and leave the cache
// alone, for callers that must tell "missing" from "unreachable".

use serde_json::Value;
use tracing::{debug, warn};

use iiec_api::models::SectionRecord;

use crate::controller::AdminClient;
use crate::error::CoreError;
use crate::model::{Entity, EntityId, EntityKind, Section, today};
use crate::registry::descriptor;

impl AdminClient {
    /// Load every record of `kind` from the backend into the store.
    ///
    /// Returns what was stored: the converted records on success, an
    /// empty list on any failure. Records that don't decode are skipped.
    pub async fn fetch_collection(&self, kind: EntityKind) -> Vec<Entity> {
        match self.try_fetch_collection(kind).await {
            Ok(entities) => entities,
            Err(e) => {
                warn!(kind = %kind, error = %e, "failed to fetch collection");
                self.inner.store.replace(kind, Vec::new());
                Vec::new()
            }
        }
    }

    /// Like [`fetch_collection`](Self::fetch_collection), but a failed
    /// request is returned and the cached collection is left as it was.
    pub async fn try_fetch_collection(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<Entity>, CoreError> {
        let desc = descriptor(kind);
        let api = &self.inner.api;

        let records = self
            .inner
            .session
            .authorized(|token| async move {
                api.list::<Value>(desc.endpoint, Some(&token)).await
            })
            .await?;

        let today = today();
        let total = records.len();
        let entities: Vec<Entity> = records
            .into_iter()
            .filter_map(|value| match (desc.from_backend)(value, today) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    warn!(kind = %kind, error = %e, "skipping undecodable record");
                    None
                }
            })
            .collect();
        debug!(kind = %kind, total, kept = entities.len(), "fetched collection");

        self.inner.store.replace(kind, entities.clone());
        Ok(entities)
    }

    /// Re-fetch one collection.
    pub async fn refresh(&self, kind: EntityKind) -> Vec<Entity> {
        self.fetch_collection(kind).await
    }

    /// Load a project's sections into its nested list.
    ///
    /// Like collection reads, a failure leaves the list empty rather than
    /// returning an error.
    pub async fn fetch_sections(&self, project_id: EntityId) -> Vec<Section> {
        match self.try_fetch_sections(project_id).await {
            Ok(sections) => sections,
            Err(e) => {
                warn!(%project_id, error = %e, "failed to fetch project sections");
                self.store_sections(project_id, Vec::new());
                Vec::new()
            }
        }
    }

    /// Like [`fetch_sections`](Self::fetch_sections), but a failed request
    /// is returned and the project's cached sections are kept.
    pub async fn try_fetch_sections(
        &self,
        project_id: EntityId,
    ) -> Result<Vec<Section>, CoreError> {
        let api = &self.inner.api;
        let records = self
            .inner
            .session
            .authorized(|token| async move {
                api.list_sections::<SectionRecord>(project_id.get(), Some(&token))
                    .await
            })
            .await?;

        let sections: Vec<Section> = records.into_iter().map(Section::from).collect();
        self.store_sections(project_id, sections.clone());
        Ok(sections)
    }

    fn store_sections(&self, project_id: EntityId, sections: Vec<Section>) {
        if !self.inner.store.set_sections(project_id, sections) {
            debug!(%project_id, "sections fetched for a project not in the store");
        }
    }
}
