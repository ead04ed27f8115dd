// Store order endpoints
//
// Orders are placed anonymously from the public store page; listing the
// order history is an admin view.

use secrecy::SecretString;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{OrderPayload, OrderRecord};

impl ApiClient {
    /// Submit a store order.
    ///
    /// `POST /orders` (no authentication)
    pub async fn place_order(&self, order: &OrderPayload) -> Result<OrderRecord, Error> {
        let url = self.url("orders")?;
        debug!(product = %order.product_title, quantity = order.quantity, "placing order");
        self.post(url, order, None).await
    }

    /// List recorded orders.
    ///
    /// `GET /orders/`
    pub async fn list_orders(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<OrderRecord>, Error> {
        let url = self.url("orders/")?;
        self.get(url, token).await
    }
}
