//! Payment status state machine.
//!
//! A payment starts `Pending` and moves exactly once to one of the two
//! terminal states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, ValidationError};

/// Authorization status of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Record exists, no gateway decision persisted yet.
    Pending,

    /// Gateway approved the payment. Terminal.
    Authorized,

    /// Gateway declined, or the request was canceled before a decision. Terminal.
    Declined,
}

impl PaymentStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Authorized => "authorized",
            PaymentStatus::Declined => "declined",
        }
    }

    /// Upper-case code used in human-facing messages.
    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Authorized => "AUTHORIZED",
            PaymentStatus::Declined => "DECLINED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "authorized" => Ok(PaymentStatus::Authorized),
            "declined" => Ok(PaymentStatus::Declined),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown payment status '{}'", other),
            )),
        }
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!((self, target), (Pending, Authorized) | (Pending, Declined))
    }

    fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_transition_to_both_terminal_states() {
        assert_eq!(
            PaymentStatus::Pending.transition_to(PaymentStatus::Authorized),
            Ok(PaymentStatus::Authorized)
        );
        assert_eq!(
            PaymentStatus::Pending.transition_to(PaymentStatus::Declined),
            Ok(PaymentStatus::Declined)
        );
    }

    #[test]
    fn terminal_states_never_change() {
        for terminal in [PaymentStatus::Authorized, PaymentStatus::Declined] {
            assert!(terminal.is_terminal());
            for target in [
                PaymentStatus::Pending,
                PaymentStatus::Authorized,
                PaymentStatus::Declined,
            ] {
                assert!(terminal.transition_to(target).is_err());
            }
        }
    }

    #[test]
    fn finalized_payment_cannot_flip() {
        let err = PaymentStatus::Authorized
            .transition_to(PaymentStatus::Declined)
            .unwrap_err();
        assert_eq!(err.field(), "status");
        assert!(err.to_string().contains("Authorized is final"));
    }

    #[test]
    fn pending_is_not_terminal() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Pending
            .transition_to(PaymentStatus::Pending)
            .is_err());
    }

    #[test]
    fn storage_strings_round_trip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Authorized,
            PaymentStatus::Declined,
        ] {
            assert_eq!(status.as_str().parse::<PaymentStatus>(), Ok(status));
        }
        assert_eq!(
            "AUTHORIZED".parse::<PaymentStatus>(),
            Ok(PaymentStatus::Authorized)
        );
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn serializes_with_variant_names() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Authorized).unwrap(),
            "\"Authorized\""
        );
    }
}
