//! GetPaymentHandler - Query handler for a single payment record.

use std::sync::Arc;

use crate::domain::foundation::PaymentId;
use crate::domain::payment::{PaymentError, PaymentRecord};
use crate::ports::{PaymentRepository, RequestContext};

/// Query to get a payment by its identifier.
#[derive(Debug, Clone)]
pub struct GetPaymentQuery {
    pub payment_id: PaymentId,
}

/// `None` when no payment has that identifier.
pub type GetPaymentResult = Option<PaymentRecord>;

pub struct GetPaymentHandler {
    repository: Arc<dyn PaymentRepository>,
}

impl GetPaymentHandler {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        ctx: &RequestContext,
        query: GetPaymentQuery,
    ) -> Result<GetPaymentResult, PaymentError> {
        self.repository
            .find_by_id(ctx, query.payment_id)
            .await
            .map_err(|e| PaymentError::storage("find_by_id", e))
    }
}
