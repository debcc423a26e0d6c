//! # Retirement
//!
//! Takes a unit out of circulation permanently. The retired record keeps
//! its last owner for audit and marks the slot terminal: resolution of
//! the id fails from then on, and no transition leads out of the state.

use tracing::debug;

use crate::domain::records::OwnershipRecord;
use crate::domain::value_objects::{Address, UnitId};
use crate::errors::{LedgerError, LedgerResult};
use crate::events::LedgerEvent;
use crate::ledger::Ledger;

impl Ledger {
    /// Retires `id` on behalf of `caller`.
    ///
    /// `caller` must hold the same authority a transfer requires: owner,
    /// approved delegate, or authorized operator.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `id` was never issued or is already retired
    /// - `NotAuthorized` if `caller` has no authority over the unit
    /// - `Overflow` if a counter would leave its field width
    /// - `ReentrancyDetected` inside an acceptance callback
    pub fn retire(&mut self, caller: Address, id: UnitId) -> LedgerResult<()> {
        self.guard_mutation()?;
        let event = self.apply_retire(Some(caller), id)?;
        self.emit(&event);
        Ok(())
    }

    /// Retires `id` without an authorization check, for privileged hosts
    /// that gate the call themselves.
    ///
    /// # Errors
    ///
    /// As [`Ledger::retire`], minus `NotAuthorized`.
    pub fn retire_unchecked(&mut self, id: UnitId) -> LedgerResult<()> {
        self.guard_mutation()?;
        let event = self.apply_retire(None, id)?;
        self.emit(&event);
        Ok(())
    }

    fn apply_retire(&mut self, caller: Option<Address>, id: UnitId) -> LedgerResult<LedgerEvent> {
        let previous = self.resolve(id)?;
        let from = previous.owner;
        if let Some(caller) = caller {
            self.ensure_authorized(caller, from, id)?;
        }

        let mut aggregate = self.aggregate(from);
        aggregate.retire_one()?;
        let retired_count = self
            .retired_count
            .checked_add(1)
            .ok_or(LedgerError::Overflow)?;

        self.clear_unit_approval(id);
        self.put_aggregate(from, aggregate);
        self.put_slot(
            id,
            OwnershipRecord {
                owner: from,
                start_time: self.now(),
                retired: true,
                next_initialized: true,
            },
        );
        self.backfill_successor(id, previous);
        self.retired_count = retired_count;

        debug!(%from, id, "retired unit");
        Ok(LedgerEvent::retired(from, id))
    }
}

// =============================================================================
// TESTS
// =============================================================================
