// ── Public catalog and store orders ──
//
// The calls behind the public pages: single-record reads, event
// listings, and order placement. Order placement is anonymous; the
// order history is an admin view.

use chrono::NaiveDate;
use tracing::info;

use iiec_api::models::{OrderPayload, OrderRecord, ProjectRecord, SectionRecord};

use crate::controller::AdminClient;
use crate::error::CoreError;
use crate::model::{EntityId, Event, Order, OrderRequest, Project, Section};

impl AdminClient {
    /// Place a store order. No session is needed.
    ///
    /// The total is computed here (unit price × quantity, to the cent);
    /// the backend's `detail` message is surfaced on rejection.
    pub async fn place_order(&self, request: &OrderRequest) -> Result<Order, CoreError> {
        if request.quantity == 0 {
            return Err(CoreError::ValidationFailed {
                message: "quantity must be at least 1".into(),
            });
        }
        let payload = OrderPayload::from(request);
        let record = self.inner.api.place_order(&payload).await?;
        info!(product = %record.product_title, quantity = record.quantity, "order placed");
        Ok(Order::from(record))
    }

    /// Every recorded order.
    pub async fn list_orders(&self) -> Result<Vec<Order>, CoreError> {
        let api = &self.inner.api;
        let records: Vec<OrderRecord> = self
            .inner
            .session
            .authorized(|token| async move { api.list_orders(Some(&token)).await })
            .await?;
        Ok(records.into_iter().map(Order::from).collect())
    }

    /// One project with its sections, straight from the backend.
    pub async fn get_project(&self, id: EntityId) -> Result<Project, CoreError> {
        let record: ProjectRecord = self
            .inner
            .api
            .fetch("projects", id.get(), None)
            .await
            .map_err(|e| not_found_as("Project", id, e))?;
        Ok(Project::from(record))
    }

    /// One section, straight from the backend.
    pub async fn get_section(&self, id: EntityId) -> Result<Section, CoreError> {
        let record: SectionRecord = self
            .inner
            .api
            .fetch_section(id.get(), None)
            .await
            .map_err(|e| not_found_as("Section", id, e))?;
        Ok(Section::from(record))
    }
}

fn not_found_as(entity_type: &str, id: EntityId, err: iiec_api::Error) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity_type: entity_type.into(),
            identifier: id.to_string(),
        }
    } else {
        err.into()
    }
}

/// Events on or after `today`, soonest first, at most `max`.
pub fn upcoming_events(events: &[Event], today: NaiveDate, max: usize) -> Vec<Event> {
    let mut upcoming: Vec<(NaiveDate, &Event)> = events
        .iter()
        .filter_map(|e| e.day().map(|d| (d, e)))
        .filter(|(d, _)| *d >= today)
        .collect();
    upcoming.sort_by_key(|(d, _)| *d);
    upcoming
        .into_iter()
        .take(max)
        .map(|(_, e)| e.clone())
        .collect()
}

/// Events before `today` (or with no readable date), most recent first.
pub fn past_events(events: &[Event], today: NaiveDate) -> Vec<Event> {
    let mut past: Vec<&Event> = events
        .iter()
        .filter(|e| e.day().is_none_or(|d| d < today))
        .collect();
    past.sort_by(|a, b| b.day().cmp(&a.day()));
    past.into_iter().cloned().collect()
}
