//! # Outbound Ports
//!
//! Interfaces for the external collaborators this ledger depends on:
//! acceptance hooks on programmable recipients, observers of committed
//! state changes, the textual metadata resolver, and the clock.

use crate::domain::value_objects::{Address, Bytes, Selector, UnitId};
use crate::events::LedgerEvent;
use crate::ledger::Ledger;
use thiserror::Error;

/// Selector an acceptance hook must return for the operation to stand.
pub const UNIT_RECEIVED: Selector = [0x15, 0x0b, 0x7a, 0x02];

/// Failure raised by an acceptance hook. Treated identically to a wrong
/// selector: the surrounding operation rolls back with `ReceiverRejected`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("acceptance hook failed: {0}")]
pub struct AcceptanceError(pub String);

/// Acceptance capability of a programmable recipient.
///
/// The ledger invokes the hook exactly once per safe issuance or safe
/// transfer, after the core mutation has been applied; a batch issuance
/// targets the **last** issued id. Returning anything other
/// than [`UNIT_RECEIVED`], or failing, causes the whole operation to roll
/// back. The hook receives the ledger handle for read-only inspection;
/// any mutating call made through it fails `ReentrancyDetected` and
/// additionally aborts the surrounding operation.
pub trait UnitReceiver: Send + Sync {
    /// Confirms or rejects receipt of `id`.
    ///
    /// `operator` is the principal that triggered the operation (zero for
    /// privileged issuance); `from` is the previous holder (zero for
    /// issuance).
    ///
    /// # Errors
    ///
    /// Any error is taken as rejection of the unit.
    fn on_unit_received(
        &self,
        ledger: &mut Ledger,
        operator: Address,
        from: Address,
        id: UnitId,
        data: &Bytes,
    ) -> Result<Selector, AcceptanceError>;
}

/// Observer of committed state changes.
///
/// Observers are notified after a mutation has fully committed; an
/// operation rolled back by the acceptance gate is never announced.
pub trait LedgerObserver: Send + Sync {
    /// Called once per committed event, in commit order.
    fn on_event(&self, event: &LedgerEvent);
}

/// External resolver of per-unit textual metadata.
///
/// The ledger guarantees the queried id exists before delegating.
pub trait MetadataProvider: Send + Sync {
    /// Returns the metadata URI for `id`.
    fn unit_uri(&self, id: UnitId) -> String;
}

/// Time source for ownership-record timestamps.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> u64;
}
