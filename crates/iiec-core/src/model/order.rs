// ── Store orders ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A recorded store order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: EntityId,
    pub full_name: String,
    pub email: String,
    pub contact: String,
    pub product_title: String,
    pub quantity: u32,
    pub total_amount: f64,
    pub order_date: Option<DateTime<Utc>>,
}

/// A customer's order for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub full_name: String,
    pub email: String,
    pub contact: String,
    pub product_title: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl OrderRequest {
    /// Unit price times quantity, rounded to cents.
    pub fn total_amount(&self) -> f64 {
        (self.unit_price * f64::from(self.quantity) * 100.0).round() / 100.0
    }
}
