//! # Ledger Events
//!
//! State changes announced to subscribed observers. Events describe only
//! mutations that have committed: an operation rolled back by the
//! acceptance gate announces nothing.

use crate::domain::value_objects::{Address, UnitId};
use serde::{Deserialize, Serialize};

/// A committed state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Unit `id` moved from `from` to `to`. A zero `from` marks issuance;
    /// a zero `to` marks retirement. Batch issuance announces one event
    /// per issued id.
    Transfer {
        /// Previous holder (zero for issuance).
        from: Address,
        /// New holder (zero for retirement).
        to: Address,
        /// The unit that moved.
        id: UnitId,
    },

    /// `delegate` was approved for `id`; a zero delegate clears the slot.
    Approval {
        /// Owner of the unit at approval time.
        owner: Address,
        /// The approved delegate.
        delegate: Address,
        /// The unit the approval covers.
        id: UnitId,
    },

    /// `owner` granted or revoked a standing operator authorization.
    OperatorApproval {
        /// The granting account.
        owner: Address,
        /// The operator the grant covers.
        operator: Address,
        /// True for grant, false for revocation.
        approved: bool,
    },
}

impl LedgerEvent {
    /// Transfer-in event for a freshly issued unit.
    #[must_use]
    pub fn issued(to: Address, id: UnitId) -> Self {
        Self::Transfer {
            from: Address::ZERO,
            to,
            id,
        }
    }

    /// Transfer-out-of-circulation event for a retired unit.
    #[must_use]
    pub fn retired(from: Address, id: UnitId) -> Self {
        Self::Transfer {
            from,
            to: Address::ZERO,
            id,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
