//! # Transfers
//!
//! Moves a unit between owners. A transfer always writes a full record at
//! the moved id; when that id used to carry its batch neighbours' answer,
//! the pre-mutation record is re-written at the successor slot so the
//! backward scan for `id + 1` still terminates in one step.

use tracing::debug;

use crate::domain::records::OwnershipRecord;
use crate::domain::value_objects::{Address, Bytes, UnitId};
use crate::errors::{LedgerError, LedgerResult};
use crate::events::LedgerEvent;
use crate::ledger::Ledger;

impl Ledger {
    /// Transfers `id` from `from` to `to` on behalf of `caller`.
    ///
    /// `caller` must be the owner, the unit's approved delegate, or an
    /// operator authorized by the owner. Any standing delegate approval
    /// for `id` is cleared.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `id` was never issued or has been retired
    /// - `IncorrectOwner` if `from` does not own the unit
    /// - `NotAuthorized` if `caller` has no authority over the unit
    /// - `InvalidRecipient` if `to` is the zero address
    /// - `Overflow` if a balance lane would leave its field width
    /// - `ReentrancyDetected` inside an acceptance callback
    pub fn transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        id: UnitId,
    ) -> LedgerResult<()> {
        self.guard_mutation()?;
        let event = self.apply_transfer(caller, from, to, id)?;
        self.emit(&event);
        Ok(())
    }

    /// Transfers like [`Ledger::transfer`], then confirms with the
    /// recipient's acceptance hook if `to` is programmable.
    ///
    /// # Errors
    ///
    /// All of [`Ledger::transfer`], plus `ReceiverRejected` and
    /// `ReentrancyDetected` from the gate; on either, every write of the
    /// transfer is rolled back.
    pub fn safe_transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        id: UnitId,
        data: &Bytes,
    ) -> LedgerResult<()> {
        self.guard_mutation()?;
        let snapshot = self.snapshot();
        let event = self.apply_transfer(caller, from, to, id)?;
        self.acceptance_gate(snapshot, caller, from, to, id, data)?;
        self.emit(&event);
        Ok(())
    }

    /// Core transfer: validates, then commits all writes. The event is
    /// returned, not announced, so safe transfer can hold it back until
    /// the acceptance gate has passed.
    fn apply_transfer(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        id: UnitId,
    ) -> LedgerResult<LedgerEvent> {
        let previous = self.resolve(id)?;
        if previous.owner != from {
            return Err(LedgerError::IncorrectOwner {
                claimed: from,
                actual: previous.owner,
            });
        }
        self.ensure_authorized(caller, from, id)?;
        if to.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }

        // Both aggregates are validated before either is written back.
        if from == to {
            let mut aggregate = self.aggregate(from);
            aggregate.debit_one()?;
            aggregate.credit_one()?;
            self.put_aggregate(from, aggregate);
        } else {
            let mut from_aggregate = self.aggregate(from);
            let mut to_aggregate = self.aggregate(to);
            from_aggregate.debit_one()?;
            to_aggregate.credit_one()?;
            self.put_aggregate(from, from_aggregate);
            self.put_aggregate(to, to_aggregate);
        }

        self.clear_unit_approval(id);
        self.put_slot(
            id,
            OwnershipRecord {
                owner: to,
                start_time: self.now(),
                retired: false,
                next_initialized: true,
            },
        );
        self.backfill_successor(id, previous);

        debug!(%from, %to, id, "transferred unit");
        Ok(LedgerEvent::Transfer { from, to, id })
    }

    /// Re-initializes slot `id + 1` with the pre-mutation record when the
    /// mutation at `id` would otherwise strand it: the batch record did
    /// not mark its successor initialized, and nothing has written that
    /// slot yet. Ids past the allocation frontier never need it.
    pub(crate) fn backfill_successor(&mut self, id: UnitId, previous: OwnershipRecord) {
        let next = id + 1;
        if !previous.next_initialized && next < self.current_index() && self.slot(next).is_none() {
            self.put_slot(next, previous);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
