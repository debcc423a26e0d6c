//! # Error Types
//!
//! The closed error surface of the ledger. Every failure is fail-fast and
//! non-retryable by the ledger itself; a mutating operation that returns an
//! error leaves all records, aggregates, and counters exactly as they were.

use crate::domain::value_objects::{Address, UnitId};
use thiserror::Error;

/// Result alias used across the crate.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Recipient or queried account is the zero address.
    #[error("invalid recipient: zero address")]
    InvalidRecipient,

    /// Issuance of zero units requested.
    #[error("invalid quantity: zero")]
    InvalidQuantity,

    /// The unit was never issued, or has been retired.
    #[error("unit {0} does not exist")]
    NotFound(UnitId),

    /// The claimed sender does not own the unit.
    #[error("incorrect owner: claimed {claimed}, actual {actual}")]
    IncorrectOwner {
        /// Owner the caller claimed the unit has.
        claimed: Address,
        /// Owner the ledger resolved.
        actual: Address,
    },

    /// Caller is neither owner, approved delegate, nor authorized operator.
    #[error("caller {caller} is not authorized for this unit")]
    NotAuthorized {
        /// The rejected principal.
        caller: Address,
    },

    /// Delegate equals the owner, or an operator grant targets the caller.
    #[error("approval target already holds the authority")]
    SelfApproval,

    /// The recipient's acceptance hook rejected the unit, or the recipient
    /// is programmable without exposing the acceptance capability.
    #[error("recipient rejected the unit")]
    ReceiverRejected,

    /// A mutating call was attempted while an acceptance callback was in
    /// flight.
    #[error("reentrant mutation during acceptance callback")]
    ReentrancyDetected,

    /// A counter would exceed its packed field width.
    #[error("counter exceeds its field width")]
    Overflow,
}

// =============================================================================
// TESTS
// =============================================================================
