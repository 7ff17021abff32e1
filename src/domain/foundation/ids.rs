//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Maximum length accepted for caller-supplied references.
pub const MAX_REFERENCE_LEN: usize = 255;

/// Unique identifier for a payment record, assigned by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Creates a new random PaymentId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a PaymentId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PaymentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

fn validate_reference(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = value.chars().count();
    if len > MAX_REFERENCE_LEN {
        return Err(ValidationError::too_long(field, MAX_REFERENCE_LEN, len));
    }
    Ok(())
}

/// Caller-supplied order reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates an OrderId, rejecting empty or oversized values.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_reference("order_id", &value)?;
        Ok(Self(value))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied key that makes an authorization request safe to retry.
///
/// Exactly one payment record ever exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Creates an IdempotencyKey, rejecting empty or oversized values.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_reference("idempotency_key", &value)?;
        Ok(Self(value))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_id_round_trips_through_string() {
        let id = PaymentId::new();
        let parsed: PaymentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn payment_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<PaymentId>().is_err());
    }

    #[test]
    fn order_id_rejects_empty_and_whitespace() {
        assert_eq!(
            OrderId::new(""),
            Err(ValidationError::empty_field("order_id"))
        );
        assert!(OrderId::new("   ").is_err());
    }

    #[test]
    fn idempotency_key_rejects_oversized_value() {
        let long = "k".repeat(MAX_REFERENCE_LEN + 1);
        assert_eq!(
            IdempotencyKey::new(long),
            Err(ValidationError::too_long(
                "idempotency_key",
                MAX_REFERENCE_LEN,
                MAX_REFERENCE_LEN + 1
            ))
        );
    }

    #[test]
    fn idempotency_key_accepts_max_length() {
        let key = IdempotencyKey::new("k".repeat(MAX_REFERENCE_LEN)).unwrap();
        assert_eq!(key.as_str().len(), MAX_REFERENCE_LEN);
    }

    #[test]
    fn references_serialize_transparently() {
        let key = IdempotencyKey::new("evt-abc").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"evt-abc\"");
    }
}
