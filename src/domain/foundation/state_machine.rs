//! Guarded status transitions.
//!
//! Status enums describe which moves are legal and which states are final;
//! the trait turns an illegal move into a `ValidationError` on the `status`
//! field so callers can propagate it with `?`.

use super::ValidationError;

/// A status enum with a fixed set of legal moves.
///
/// ```ignore
/// let next = record.status.transition_to(PaymentStatus::Authorized)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// True if moving from `self` to `target` is legal.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// True for states that accept no further moves.
    fn is_terminal(&self) -> bool;

    /// Returns `target` when the move is legal.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            let reason = if self.is_terminal() {
                format!("{:?} is final and cannot become {:?}", self, target)
            } else {
                format!("{:?} cannot become {:?}", self, target)
            };
            return Err(ValidationError::invalid_format("status", reason));
        }
        Ok(target)
    }
}
