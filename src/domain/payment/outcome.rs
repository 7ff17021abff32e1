//! Result of an authorization call as reported to the transport layer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PaymentId;

use super::{PaymentRecord, PaymentStatus};

/// Best-known state of a payment after an `authorize` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
    pub message: String,
}

impl PaymentOutcome {
    /// Describes the record as it currently stands.
    pub fn from_record(record: &PaymentRecord) -> Self {
        let message = match record.status {
            PaymentStatus::Declined if !record.last_error.is_empty() => {
                format!("{}: {}", record.status.code(), record.last_error)
            }
            status => status.code().to_string(),
        };
        Self {
            payment_id: record.id,
            status: record.status,
            message,
        }
    }

    /// Declined outcome reported when the stored record could not be read back.
    pub fn declined(payment_id: PaymentId, reason: &str) -> Self {
        Self {
            payment_id,
            status: PaymentStatus::Declined,
            message: format!("{}: {}", PaymentStatus::Declined.code(), reason),
        }
    }
}
