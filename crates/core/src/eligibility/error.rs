//! Eligibility error types.

use thiserror::Error;

/// Eligibility state machine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EligibilityError {
    /// An event arrived in a state that does not accept it.
    #[error("Invalid eligibility transition: {event} in state {from}")]
    InvalidTransition {
        /// The current state.
        from: &'static str,
        /// The rejected event.
        event: &'static str,
    },
}
