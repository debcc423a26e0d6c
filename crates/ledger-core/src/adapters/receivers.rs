//! # Receiver Adapters
//!
//! Acceptance-hook implementations used to exercise the callback gate.

use crate::domain::value_objects::{Address, Bytes, Selector, UnitId};
use crate::errors::LedgerError;
use crate::ledger::Ledger;
use crate::ports::outbound::{AcceptanceError, UnitReceiver, UNIT_RECEIVED};
use parking_lot::Mutex;

/// Hook that accepts every unit and records what it saw.
#[derive(Debug, Default)]
pub struct AcceptingReceiver {
    received: Mutex<Vec<(Address, Address, UnitId)>>,
}

impl AcceptingReceiver {
    /// Creates an accepting hook with an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(operator, from, id)` triples in invocation order.
    #[must_use]
    pub fn received(&self) -> Vec<(Address, Address, UnitId)> {
        self.received.lock().clone()
    }
}

impl UnitReceiver for AcceptingReceiver {
    fn on_unit_received(
        &self,
        _ledger: &mut Ledger,
        operator: Address,
        from: Address,
        id: UnitId,
        _data: &Bytes,
    ) -> Result<Selector, AcceptanceError> {
        self.received.lock().push((operator, from, id));
        Ok(UNIT_RECEIVED)
    }
}

/// Hook that rejects every unit, either by answering with the wrong
/// selector or by failing outright.
#[derive(Clone, Copy, Debug)]
pub struct RejectingReceiver {
    fail: bool,
}

impl RejectingReceiver {
    /// Rejects by returning a selector other than the expected one.
    #[must_use]
    pub fn wrong_selector() -> Self {
        Self { fail: false }
    }

    /// Rejects by raising a failure from the hook.
    #[must_use]
    pub fn erroring() -> Self {
        Self { fail: true }
    }
}

impl UnitReceiver for RejectingReceiver {
    fn on_unit_received(
        &self,
        _ledger: &mut Ledger,
        _operator: Address,
        _from: Address,
        _id: UnitId,
        _data: &Bytes,
    ) -> Result<Selector, AcceptanceError> {
        if self.fail {
            Err(AcceptanceError("unit refused".to_string()))
        } else {
            Ok([0xde, 0xad, 0xbe, 0xef])
        }
    }
}

/// Hook that attempts a nested issuance before answering, then accepts.
///
/// The nested call's outcome is recorded so tests can assert that the
/// guard rejected it.
#[derive(Debug)]
pub struct ReentrantReceiver {
    target: Address,
    nested_outcome: Mutex<Option<Result<UnitId, LedgerError>>>,
}

impl ReentrantReceiver {
    /// Creates a hook that will try to issue one unit to `target`.
    #[must_use]
    pub fn new(target: Address) -> Self {
        Self {
            target,
            nested_outcome: Mutex::new(None),
        }
    }

    /// Outcome of the nested issuance attempt, if the hook has run.
    #[must_use]
    pub fn nested_outcome(&self) -> Option<Result<UnitId, LedgerError>> {
        self.nested_outcome.lock().clone()
    }
}

impl UnitReceiver for ReentrantReceiver {
    fn on_unit_received(
        &self,
        ledger: &mut Ledger,
        _operator: Address,
        _from: Address,
        _id: UnitId,
        _data: &Bytes,
    ) -> Result<Selector, AcceptanceError> {
        let outcome = ledger.issue(self.target, 1);
        *self.nested_outcome.lock() = Some(outcome);
        Ok(UNIT_RECEIVED)
    }
}
