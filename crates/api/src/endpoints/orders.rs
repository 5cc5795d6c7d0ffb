//! `/orders` endpoints.

use reqwest::Method;
use tracing::instrument;

use coloring_bliss_core::{OrderId, OrderStatus};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Order, OrderEnvelope, OrderList, OrderPage, OrderStats, StatusUpdate};

/// Filters and paging for the admin order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderListQuery {
    pub page: u32,
    pub limit: u32,
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
}

impl Default for OrderListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 15,
            status: None,
            search: None,
        }
    }
}

impl OrderListQuery {
    fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search".to_string(), search.trim().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.as_str().to_string()));
        }
        pairs
    }
}

impl ApiClient {
    /// `GET /orders?status=`: the signed-in shopper's orders.
    #[instrument(skip(self))]
    pub async fn my_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, ApiError> {
        let pairs: Vec<(String, String)> = status
            .map(|s| ("status".to_string(), s.as_str().to_string()))
            .into_iter()
            .collect();
        let list: OrderList = self
            .get(self.endpoint_with_query(&["orders"], &pairs))
            .await?;
        Ok(list.orders)
    }

    /// `GET /orders/{id}`
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let envelope: OrderEnvelope = self.get(self.endpoint(&["orders", id.as_str()])).await?;
        Ok(envelope.order)
    }

    /// `GET /orders/admin` (admin)
    #[instrument(skip(self))]
    pub async fn admin_orders(&self, query: &OrderListQuery) -> Result<OrderPage, ApiError> {
        self.get(self.endpoint_with_query(&["orders", "admin"], &query.pairs()))
            .await
    }

    /// `GET /orders/admin/stats` (admin)
    #[instrument(skip(self))]
    pub async fn order_stats(&self) -> Result<OrderStats, ApiError> {
        self.get(self.endpoint(&["orders", "admin", "stats"])).await
    }

    /// `PUT /orders/{id}/status` (admin)
    #[instrument(skip(self, update), fields(order_id = %id, status = %update.status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<(), ApiError> {
        self.send_unit_json(
            Method::PUT,
            self.endpoint(&["orders", id.as_str(), "status"]),
            update,
        )
        .await
    }
}
