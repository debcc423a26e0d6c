//! # Delegated Authority
//!
//! The narrow key/value surface the transfer and retirement paths consume:
//! one approved delegate per unit, and standing operator grants per owner.

use tracing::debug;

use crate::domain::value_objects::{Address, UnitId};
use crate::errors::{LedgerError, LedgerResult};
use crate::events::LedgerEvent;
use crate::ledger::Ledger;

impl Ledger {
    /// Approves `delegate` to act on `id`. A zero delegate clears the
    /// slot. `caller` must be the unit's owner or one of the owner's
    /// operators.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `id` was never issued or has been retired
    /// - `SelfApproval` if `delegate` already owns the unit
    /// - `NotAuthorized` if `caller` may not grant for this unit
    /// - `ReentrancyDetected` inside an acceptance callback
    pub fn approve(&mut self, caller: Address, delegate: Address, id: UnitId) -> LedgerResult<()> {
        self.guard_mutation()?;
        let owner = self.resolve(id)?.owner;
        if delegate == owner {
            return Err(LedgerError::SelfApproval);
        }
        if caller != owner && !self.is_approved_for_all(owner, caller) {
            return Err(LedgerError::NotAuthorized { caller });
        }

        if delegate.is_zero() {
            self.unit_approvals.remove(&id);
        } else {
            self.unit_approvals.insert(id, delegate);
        }
        debug!(%owner, %delegate, id, "delegate approval updated");
        self.emit(&LedgerEvent::Approval {
            owner,
            delegate,
            id,
        });
        Ok(())
    }

    /// Grants or revokes a standing operator authorization from `caller`
    /// to `operator`, covering every unit `caller` owns now or later.
    ///
    /// # Errors
    ///
    /// - `SelfApproval` if `operator` is `caller`
    /// - `ReentrancyDetected` inside an acceptance callback
    pub fn set_approval_for_all(
        &mut self,
        caller: Address,
        operator: Address,
        approved: bool,
    ) -> LedgerResult<()> {
        self.guard_mutation()?;
        if operator == caller {
            return Err(LedgerError::SelfApproval);
        }

        if approved {
            self.operator_approvals.insert((caller, operator));
        } else {
            self.operator_approvals.remove(&(caller, operator));
        }
        debug!(owner = %caller, %operator, approved, "operator grant updated");
        self.emit(&LedgerEvent::OperatorApproval {
            owner: caller,
            operator,
            approved,
        });
        Ok(())
    }

    /// Approved delegate for `id`, or the zero address if none stands.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` does not exist.
    pub fn get_approved(&self, id: UnitId) -> LedgerResult<Address> {
        self.resolve(id)?;
        Ok(self
            .unit_approvals
            .get(&id)
            .copied()
            .unwrap_or(Address::ZERO))
    }

    /// True if `owner` has a standing grant for `operator`.
    #[must_use]
    pub fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.operator_approvals.contains(&(owner, operator))
    }

    /// Checks that `caller` may move or retire `id`: it is the owner, the
    /// approved delegate, or an operator for the owner.
    pub(crate) fn ensure_authorized(
        &self,
        caller: Address,
        owner: Address,
        id: UnitId,
    ) -> LedgerResult<()> {
        if caller == owner
            || self.unit_approvals.get(&id) == Some(&caller)
            || self.is_approved_for_all(owner, caller)
        {
            Ok(())
        } else {
            Err(LedgerError::NotAuthorized { caller })
        }
    }

    /// Drops any standing delegate approval for `id`. Every mutation of a
    /// unit invalidates its delegate.
    pub(crate) fn clear_unit_approval(&mut self, id: UnitId) {
        self.unit_approvals.remove(&id);
    }
}

// =============================================================================
// TESTS
// =============================================================================
