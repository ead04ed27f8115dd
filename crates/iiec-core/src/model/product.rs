// ── Store product domain type ──

use serde::{Deserialize, Serialize};

use super::common::SyncState;
use super::entity_id::EntityId;

/// An item sold on the public store page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub in_stock: bool,
    pub image_url: String,
    #[serde(skip)]
    pub sync: SyncState,
}
