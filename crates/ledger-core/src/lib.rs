//! # Ledger Core - Batch-Issued Ownership Ledger
//!
//! An ownership ledger for uniquely numbered, non-fungible units issued
//! sequentially starting at 1. Issuing a contiguous batch writes a
//! **single** packed ownership record; the owner of any individual unit
//! is reconstructed on read by scanning backward to the nearest written
//! slot. Mutations keep that scan bounded by re-initializing the
//! successor slot of every id they touch.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Every issued, unretired id resolves to one live record | `ledger/resolve.rs`, audited by `domain/invariants.rs` |
//! | A mutated id's successor stays resolvable | `ledger/transfer.rs` - `backfill_successor()` |
//! | `balance <= number_issued` per account | `domain/records.rs` checked arithmetic |
//! | Counters never leave their packed field width | `domain/records.rs` - `Overflow` on excess |
//! | Retirement is terminal | `ledger/resolve.rs`, `ledger/retire.rs` |
//! | Failed mutations leave no partial writes | validation-before-write plus snapshot rollback in `ledger/mod.rs` |
//!
//! ## Execution Model
//!
//! - Mutations run to completion behind `&mut self`; [`service::SharedLedger`]
//!   serializes them behind one write lock per instance.
//! - The acceptance callback is the only point where control leaves the
//!   ledger mid-mutation; an in-progress guard rejects nested mutating
//!   calls, and any such attempt aborts and rolls back the outer
//!   operation.
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Packed codec | `domain/records.rs` | Typed pack/unpack of the two record scalars |
//! | Resolver | `ledger/resolve.rs` | Backward-scan ownership lookup |
//! | Issuance | `ledger/issue.rs` | One record per contiguous batch |
//! | Transfers | `ledger/transfer.rs` | Authority checks, successor backfill |
//! | Retirement | `ledger/retire.rs` | Terminal removal from circulation |
//! | Approvals | `ledger/approvals.rs` | Delegates and standing operators |
//! | Acceptance gate | `ledger/mod.rs` | Recipient hook with full rollback |
//!
//! ## Usage Example
//!
//! ```
//! use ledger_core::prelude::*;
//!
//! let mut ledger = Ledger::new(LedgerConfig::default());
//! let owner = Address::new([1u8; 20]);
//!
//! let start = ledger.issue(owner, 10)?;
//! assert_eq!(start, 1);
//! assert_eq!(ledger.owner_of(7)?, owner);
//! assert_eq!(ledger.total_supply(), 10);
//! # Ok::<(), LedgerError>(())
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Value objects
    pub use crate::domain::value_objects::{capabilities, Address, Bytes, Selector, UnitId, U256};

    // Packed records
    pub use crate::domain::records::{AccountAggregate, OwnershipRecord};

    // Invariants
    pub use crate::domain::invariants::{
        check_aggregate_invariant, check_all_invariants, check_supply_invariant,
        InvariantCheckResult, InvariantViolation,
    };

    // Errors
    pub use crate::errors::{LedgerError, LedgerResult};

    // Events
    pub use crate::events::LedgerEvent;

    // Ports
    pub use crate::ports::outbound::{
        AcceptanceError, Clock, LedgerObserver, MetadataProvider, UnitReceiver, UNIT_RECEIVED,
    };

    // Adapters
    pub use crate::adapters::{
        AcceptingReceiver, BaseUriProvider, ManualClock, NullObserver, RecordingObserver,
        ReentrantReceiver, RejectingReceiver, SystemClock,
    };

    // The ledger and its shared wrapper
    pub use crate::ledger::{Ledger, LedgerConfig};
    pub use crate::service::{LedgerStats, SharedLedger};
}
