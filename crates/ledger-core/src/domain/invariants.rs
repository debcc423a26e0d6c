//! # Domain Invariants
//!
//! Invariants that must hold between any two ledger operations:
//!
//! - every issued, unretired id resolves to exactly one live record, and
//!   a backward scan never terminates on another id's retired slot;
//! - per account, `balance <= number_issued`, and the balance lane agrees
//!   with the number of ids that resolve to the account;
//! - the retired slots agree with the ledger-wide retirement counter, and
//!   the balance lanes sum to the circulating supply.
//!
//! The audit walks every issued id, so it is test and diagnostic tooling,
//! not a per-operation check.

use std::collections::HashMap;

use crate::domain::records::AccountAggregate;
use crate::domain::value_objects::{Address, UnitId};
use crate::ledger::Ledger;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Per-account counter sanity: an account can never hold more units than
/// were ever issued to it.
#[must_use]
pub fn check_aggregate_invariant(aggregate: &AccountAggregate) -> bool {
    aggregate.balance <= aggregate.number_issued
}

/// Ledger-wide supply sanity: the balance lanes sum to the circulating
/// supply.
#[must_use]
pub fn check_supply_invariant(ledger: &Ledger) -> bool {
    let held: u64 = ledger
        .accounts()
        .map(|(_, aggregate)| aggregate.balance)
        .sum();
    held == ledger.total_supply()
}

/// Audits every invariant over the full ledger state.
#[must_use]
pub fn check_all_invariants(ledger: &Ledger) -> InvariantCheckResult {
    let mut violations = Vec::new();
    let mut resolved_counts: HashMap<Address, u64> = HashMap::new();
    let mut retired_slots = 0u64;

    for id in 1..ledger.current_index() {
        let mut cursor = id;
        let found = loop {
            if let Some(record) = ledger.slot(cursor) {
                break Some((cursor, record));
            }
            if cursor == 1 {
                break None;
            }
            cursor -= 1;
        };

        match found {
            None => violations.push(InvariantViolation::Unresolvable { id }),
            Some((at, record)) if record.retired && at != id => {
                violations.push(InvariantViolation::ScanHitRetired { id, at });
            }
            Some((_, record)) if record.retired => retired_slots += 1,
            Some((_, record)) => *resolved_counts.entry(record.owner).or_default() += 1,
        }
    }

    for (owner, aggregate) in ledger.accounts() {
        if !check_aggregate_invariant(&aggregate) {
            violations.push(InvariantViolation::AggregateImbalance {
                owner,
                balance: aggregate.balance,
                issued: aggregate.number_issued,
            });
        }
        let resolved = resolved_counts.remove(&owner).unwrap_or(0);
        if aggregate.balance != resolved {
            violations.push(InvariantViolation::BalanceMismatch {
                owner,
                balance: aggregate.balance,
                resolved,
            });
        }
    }

    // Units resolving to an account that never got an aggregate written.
    for (owner, resolved) in resolved_counts {
        violations.push(InvariantViolation::BalanceMismatch {
            owner,
            balance: 0,
            resolved,
        });
    }

    if retired_slots != ledger.retired_count() {
        violations.push(InvariantViolation::RetiredCountMismatch {
            slots: retired_slots,
            counter: ledger.retired_count(),
        });
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of auditing all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An issued id has no record at or below it.
    Unresolvable {
        /// The orphaned id.
        id: UnitId,
    },
    /// The backward scan for an empty slot terminated on a retired record
    /// belonging to another id.
    ScanHitRetired {
        /// The id whose scan went wrong.
        id: UnitId,
        /// The retired slot the scan terminated on.
        at: UnitId,
    },
    /// An account holds more units than were ever issued to it.
    AggregateImbalance {
        /// The inconsistent account.
        owner: Address,
        /// Its balance lane.
        balance: u64,
        /// Its issuance lane.
        issued: u64,
    },
    /// An account's balance lane disagrees with the ids resolving to it.
    BalanceMismatch {
        /// The inconsistent account.
        owner: Address,
        /// Its balance lane.
        balance: u64,
        /// Ids that actually resolve to it.
        resolved: u64,
    },
    /// Retired slots disagree with the ledger-wide retirement counter.
    RetiredCountMismatch {
        /// Retired slots found in the record table.
        slots: u64,
        /// The `retired_count` counter.
        counter: u64,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unresolvable { id } => {
                write!(f, "unit {id} has no record at or below it")
            }
            Self::ScanHitRetired { id, at } => {
                write!(f, "scan for unit {id} terminated on retired slot {at}")
            }
            Self::AggregateImbalance {
                owner,
                balance,
                issued,
            } => {
                write!(f, "account {owner} holds {balance} but was issued {issued}")
            }
            Self::BalanceMismatch {
                owner,
                balance,
                resolved,
            } => {
                write!(
                    f,
                    "account {owner} balance lane says {balance}, records resolve {resolved}"
                )
            }
            Self::RetiredCountMismatch { slots, counter } => {
                write!(f, "{slots} retired slots but counter says {counter}")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
