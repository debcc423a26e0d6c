//! # Issuance
//!
//! Allocates a contiguous id range to a recipient. The whole batch is
//! backed by a **single** ownership record at its first id; every other
//! id in the range stays an empty slot and resolves through it.

use tracing::debug;

use crate::domain::records::OwnershipRecord;
use crate::domain::value_objects::{Address, Bytes, UnitId};
use crate::errors::{LedgerError, LedgerResult};
use crate::events::LedgerEvent;
use crate::ledger::Ledger;

impl Ledger {
    /// Issues `quantity` units to `to` and returns the first allocated id.
    ///
    /// Writes one ownership record at the batch start, credits `to`'s
    /// aggregate, and advances `current_index`. Observers see one
    /// transfer-in event per issued id.
    ///
    /// # Errors
    ///
    /// - `InvalidRecipient` if `to` is the zero address
    /// - `InvalidQuantity` if `quantity` is zero
    /// - `Overflow` if a counter would leave its field width
    /// - `ReentrancyDetected` inside an acceptance callback
    pub fn issue(&mut self, to: Address, quantity: u64) -> LedgerResult<UnitId> {
        self.guard_mutation()?;
        let (start, events) = self.apply_issue(to, quantity)?;
        self.emit_all(events);
        Ok(start)
    }

    /// Issues like [`Ledger::issue`], then confirms with the recipient's
    /// acceptance hook if `to` is programmable. The hook is targeted at
    /// the **last** issued id.
    ///
    /// # Errors
    ///
    /// All of [`Ledger::issue`], plus `ReceiverRejected` and
    /// `ReentrancyDetected` from the gate; on either, every write of the
    /// issuance is rolled back.
    pub fn safe_issue(&mut self, to: Address, quantity: u64, data: &Bytes) -> LedgerResult<UnitId> {
        self.guard_mutation()?;
        let snapshot = self.snapshot();
        let (start, events) = self.apply_issue(to, quantity)?;
        let last = start + quantity - 1;
        self.acceptance_gate(snapshot, Address::ZERO, Address::ZERO, to, last, data)?;
        self.emit_all(events);
        Ok(start)
    }

    /// Core issuance: validates, then commits all writes. Events are
    /// returned, not announced, so safe issuance can hold them back until
    /// the acceptance gate has passed.
    fn apply_issue(&mut self, to: Address, quantity: u64) -> LedgerResult<(UnitId, Vec<LedgerEvent>)> {
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity);
        }

        let start = self.current_index;
        let next_index = start.checked_add(quantity).ok_or(LedgerError::Overflow)?;
        let mut aggregate = self.aggregate(to);
        aggregate.credit_issue(quantity)?;

        // All checks passed; commit.
        self.put_slot(
            start,
            OwnershipRecord {
                owner: to,
                start_time: self.now(),
                retired: false,
                next_initialized: quantity == 1,
            },
        );
        self.put_aggregate(to, aggregate);
        self.current_index = next_index;

        debug!(%to, quantity, start, "issued unit batch");
        let events = (start..next_index)
            .map(|id| LedgerEvent::issued(to, id))
            .collect();
        Ok((start, events))
    }
}

// =============================================================================
// TESTS
// =============================================================================
