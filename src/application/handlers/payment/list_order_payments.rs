//! ListOrderPaymentsHandler - Query handler for all payments of one order.

use std::sync::Arc;

use crate::domain::foundation::OrderId;
use crate::domain::payment::{PaymentError, PaymentRecord};
use crate::ports::{PaymentRepository, RequestContext};

/// Query to list payments for an order.
#[derive(Debug, Clone)]
pub struct ListOrderPaymentsQuery {
    pub order_id: String,
}

/// Handler for the operational per-order lookup.
///
/// Records come back oldest first.
pub struct ListOrderPaymentsHandler {
    repository: Arc<dyn PaymentRepository>,
}

impl ListOrderPaymentsHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        ctx: &RequestContext,
        query: ListOrderPaymentsQuery,
    ) -> Result<Vec<PaymentRecord>, PaymentError> {
        let order_id = OrderId::new(query.order_id)?;
        self.repository
            .find_by_order_id(ctx, &order_id)
            .await
            .map_err(|e| PaymentError::storage("find_by_order_id", e))
    }
}
