//! # Ownership Resolution
//!
//! Finds the authoritative record for a unit id. Slots are written
//! sparsely, so an empty slot means "scan backward": the nearest lower
//! non-empty slot carries the answer. The mutation paths guarantee the
//! scan terminates and, in the common case, takes at most one step.

use crate::domain::records::OwnershipRecord;
use crate::domain::value_objects::{Address, UnitId};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

impl Ledger {
    /// Resolves the authoritative ownership record for `id`.
    ///
    /// A non-empty slot at `id` answers directly; a retired one means the
    /// unit has left circulation. An empty slot is resolved by walking
    /// backward to the nearest written record, which the backfill
    /// invariant guarantees is live.
    pub(crate) fn resolve(&self, id: UnitId) -> LedgerResult<OwnershipRecord> {
        if id == 0 || id >= self.current_index() {
            return Err(LedgerError::NotFound(id));
        }
        let mut cursor = id;
        while cursor >= 1 {
            if let Some(record) = self.slot(cursor) {
                if record.retired {
                    return Err(LedgerError::NotFound(id));
                }
                return Ok(record);
            }
            cursor -= 1;
        }
        Err(LedgerError::NotFound(id))
    }

    /// Current owner of `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` was never issued or has been retired.
    pub fn owner_of(&self, id: UnitId) -> LedgerResult<Address> {
        Ok(self.resolve(id)?.owner)
    }

    /// True if `id` has been issued and not retired.
    #[must_use]
    pub fn exists(&self, id: UnitId) -> bool {
        self.resolve(id).is_ok()
    }

    /// Full resolved ownership record for `id`: owner, write timestamp,
    /// and flags.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` under the same conditions as
    /// [`Ledger::owner_of`].
    pub fn ownership_of(&self, id: UnitId) -> LedgerResult<OwnershipRecord> {
        self.resolve(id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
