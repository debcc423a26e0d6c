//! # The Ledger
//!
//! One instance owns all ownership records, account aggregates, and the
//! two global counters. Mutations run to completion behind `&mut self`;
//! there is no interleaving of partial writes. The acceptance callback is
//! the single point where control leaves the ledger mid-mutation, and the
//! in-progress guard keeps nested mutating calls from committing.
//!
//! Storage is deliberately sparse: issuing a batch of `n` units writes
//! **one** ownership record, and reads reconstruct individual owners by
//! scanning backward to the nearest written slot. The mutation paths keep
//! that scan bounded by re-initializing the successor slot of every
//! mutated id (see `transfer` and `retire`).

mod approvals;
mod issue;
mod resolve;
mod retire;
mod transfer;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use crate::adapters::clock::SystemClock;
use crate::domain::records::{AccountAggregate, OwnershipRecord};
use crate::domain::value_objects::{capabilities, Address, Bytes, Selector, UnitId, U256};
use crate::errors::{LedgerError, LedgerResult};
use crate::events::LedgerEvent;
use crate::ports::outbound::{
    Clock, LedgerObserver, MetadataProvider, UnitReceiver, UNIT_RECEIVED,
};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Static metadata of a ledger instance.
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Human-readable collection name.
    pub name: String,
    /// Short ticker-style symbol.
    pub symbol: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            name: "Serial Units".to_string(),
            symbol: "UNIT".to_string(),
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Full copy of the observable state, taken before control is handed to an
/// acceptance hook and restored if the operation must not stand.
#[derive(Clone)]
pub(crate) struct Snapshot {
    records: HashMap<UnitId, U256>,
    aggregates: HashMap<Address, U256>,
    unit_approvals: HashMap<UnitId, Address>,
    operator_approvals: HashSet<(Address, Address)>,
    current_index: UnitId,
    retired_count: u64,
}

// =============================================================================
// LEDGER
// =============================================================================

/// A batch-issued, non-fungible ownership ledger.
///
/// Units are numbered sequentially from 1. `current_index` is the next id
/// to allocate and never decreases; `retired_count` counts units taken out
/// of circulation and never decreases. Both record tables hold packed
/// scalars and are only read or written through the codec in
/// `domain::records`.
pub struct Ledger {
    config: LedgerConfig,
    /// Sparse ownership slots, keyed by unit id. Absent = empty slot.
    records: HashMap<UnitId, U256>,
    /// Per-account packed aggregates. Absent = all-zero aggregate.
    aggregates: HashMap<Address, U256>,
    /// Per-unit approved delegate.
    unit_approvals: HashMap<UnitId, Address>,
    /// Standing `(owner, operator)` grants.
    operator_approvals: HashSet<(Address, Address)>,
    /// Next id to allocate. Starts at 1.
    current_index: UnitId,
    /// Units retired, ledger-wide.
    retired_count: u64,
    /// Programmable recipients; `None` marks one without the acceptance
    /// capability.
    programmable: HashMap<Address, Option<Arc<dyn UnitReceiver>>>,
    observers: Vec<Arc<dyn LedgerObserver>>,
    metadata: Option<Arc<dyn MetadataProvider>>,
    clock: Arc<dyn Clock>,
    /// An acceptance hook is currently on the stack.
    in_callback: bool,
    /// A mutating call was rejected while `in_callback` was set.
    reentrancy_hit: bool,
}

impl Ledger {
    /// Creates an empty ledger on the system clock.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an empty ledger on the given clock.
    #[must_use]
    pub fn with_clock(config: LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            records: HashMap::new(),
            aggregates: HashMap::new(),
            unit_approvals: HashMap::new(),
            operator_approvals: HashSet::new(),
            current_index: 1,
            retired_count: 0,
            programmable: HashMap::new(),
            observers: Vec::new(),
            metadata: None,
            clock,
            in_callback: false,
            reentrancy_hit: false,
        }
    }

    /// Marks `address` as a programmable recipient. `Some(hook)` installs
    /// its acceptance capability; `None` records that it has none, which
    /// makes every safe issuance or transfer to it fail.
    pub fn register_programmable(
        &mut self,
        address: Address,
        hook: Option<Arc<dyn UnitReceiver>>,
    ) {
        self.programmable.insert(address, hook);
    }

    /// Subscribes an observer to committed state changes.
    pub fn add_observer(&mut self, observer: Arc<dyn LedgerObserver>) {
        self.observers.push(observer);
    }

    /// Installs the external metadata resolver consulted by
    /// [`Ledger::unit_uri`].
    pub fn set_metadata_provider(&mut self, provider: Arc<dyn MetadataProvider>) {
        self.metadata = Some(provider);
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Collection symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    /// Units in circulation: issued minus retired.
    #[must_use]
    pub fn total_supply(&self) -> u64 {
        self.current_index - 1 - self.retired_count
    }

    /// Units ever issued.
    #[must_use]
    pub fn total_issued(&self) -> u64 {
        self.current_index - 1
    }

    /// Units currently held by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRecipient` for the zero address.
    pub fn balance_of(&self, owner: Address) -> LedgerResult<u64> {
        if owner.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }
        Ok(self.aggregate(owner).balance)
    }

    /// Units ever issued to `owner`.
    #[must_use]
    pub fn number_issued(&self, owner: Address) -> u64 {
        self.aggregate(owner).number_issued
    }

    /// Units retired while held by `owner`.
    #[must_use]
    pub fn number_retired(&self, owner: Address) -> u64 {
        self.aggregate(owner).number_retired
    }

    /// Free-use counter attached to `owner`'s aggregate.
    #[must_use]
    pub fn aux(&self, owner: Address) -> u64 {
        self.aggregate(owner).aux
    }

    /// Overwrites the free-use counter attached to `owner`'s aggregate.
    ///
    /// # Errors
    ///
    /// Returns `ReentrancyDetected` inside an acceptance callback.
    pub fn set_aux(&mut self, owner: Address, aux: u64) -> LedgerResult<()> {
        self.guard_mutation()?;
        let mut aggregate = self.aggregate(owner);
        aggregate.aux = aux;
        self.put_aggregate(owner, aggregate);
        Ok(())
    }

    /// Metadata URI for `id`, delegated to the installed provider. An
    /// instance without a provider answers the empty string.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` does not exist.
    pub fn unit_uri(&self, id: UnitId) -> LedgerResult<String> {
        self.resolve(id)?;
        Ok(self
            .metadata
            .as_ref()
            .map(|provider| provider.unit_uri(id))
            .unwrap_or_default())
    }

    /// Answers membership in the fixed capability set.
    #[must_use]
    pub fn supports_capability(&self, capability: Selector) -> bool {
        capability == capabilities::INTROSPECTION
            || capability == capabilities::OWNERSHIP
            || capability == capabilities::METADATA
    }

    // =========================================================================
    // PACKED-STATE ACCESS (codec boundary)
    // =========================================================================

    /// Unpacked aggregate for `owner`; all-zero if never written.
    pub(crate) fn aggregate(&self, owner: Address) -> AccountAggregate {
        self.aggregates
            .get(&owner)
            .copied()
            .map(AccountAggregate::unpack)
            .unwrap_or_default()
    }

    pub(crate) fn put_aggregate(&mut self, owner: Address, aggregate: AccountAggregate) {
        self.aggregates.insert(owner, aggregate.pack());
    }

    /// Non-empty record at exactly `id`, if one has been written.
    pub(crate) fn slot(&self, id: UnitId) -> Option<OwnershipRecord> {
        let packed = self.records.get(&id)?;
        let record = OwnershipRecord::unpack(*packed);
        (!record.is_empty()).then_some(record)
    }

    pub(crate) fn put_slot(&mut self, id: UnitId, record: OwnershipRecord) {
        self.records.insert(id, record.pack());
    }

    /// All accounts with a written aggregate.
    pub(crate) fn accounts(&self) -> impl Iterator<Item = (Address, AccountAggregate)> + '_ {
        self.aggregates
            .iter()
            .map(|(owner, packed)| (*owner, AccountAggregate::unpack(*packed)))
    }

    pub(crate) fn current_index(&self) -> UnitId {
        self.current_index
    }

    pub(crate) fn retired_count(&self) -> u64 {
        self.retired_count
    }

    pub(crate) fn now(&self) -> u64 {
        self.clock.now()
    }

    // =========================================================================
    // MUTATION PLUMBING
    // =========================================================================

    /// Rejects the call if an acceptance hook is on the stack. Every
    /// mutating entry point passes through here, so a reentrant mutation
    /// can never commit.
    pub(crate) fn guard_mutation(&mut self) -> LedgerResult<()> {
        if self.in_callback {
            self.reentrancy_hit = true;
            return Err(LedgerError::ReentrancyDetected);
        }
        Ok(())
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            records: self.records.clone(),
            aggregates: self.aggregates.clone(),
            unit_approvals: self.unit_approvals.clone(),
            operator_approvals: self.operator_approvals.clone(),
            current_index: self.current_index,
            retired_count: self.retired_count,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.records = snapshot.records;
        self.aggregates = snapshot.aggregates;
        self.unit_approvals = snapshot.unit_approvals;
        self.operator_approvals = snapshot.operator_approvals;
        self.current_index = snapshot.current_index;
        self.retired_count = snapshot.retired_count;
    }

    /// Announces committed events to every observer, in order.
    pub(crate) fn emit_all(&self, events: Vec<LedgerEvent>) {
        for event in &events {
            self.emit(event);
        }
    }

    pub(crate) fn emit(&self, event: &LedgerEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }

    // =========================================================================
    // ACCEPTANCE CALLBACK GATE
    // =========================================================================

    /// Confirms a safe issuance or transfer with the recipient.
    ///
    /// Called after the core mutation has been applied. A recipient that
    /// is not programmable confirms implicitly. Otherwise the hook runs
    /// with the in-progress guard set; rejection, a missing capability,
    /// or any nested mutation attempt restores `snapshot` and fails the
    /// operation.
    pub(crate) fn acceptance_gate(
        &mut self,
        snapshot: Snapshot,
        operator: Address,
        from: Address,
        to: Address,
        id: UnitId,
        data: &Bytes,
    ) -> LedgerResult<()> {
        let hook = match self.programmable.get(&to) {
            None => return Ok(()),
            Some(Some(hook)) => Arc::clone(hook),
            Some(None) => {
                warn!(%to, id, "recipient has no acceptance capability; rolling back");
                self.restore(snapshot);
                return Err(LedgerError::ReceiverRejected);
            }
        };

        self.in_callback = true;
        self.reentrancy_hit = false;
        let outcome = hook.on_unit_received(self, operator, from, id, data);
        self.in_callback = false;

        if self.reentrancy_hit {
            self.reentrancy_hit = false;
            warn!(%to, id, "reentrant mutation during acceptance hook; rolling back");
            self.restore(snapshot);
            return Err(LedgerError::ReentrancyDetected);
        }

        match outcome {
            Ok(selector) if selector == UNIT_RECEIVED => Ok(()),
            _ => {
                warn!(%to, id, "acceptance hook rejected the unit; rolling back");
                self.restore(snapshot);
                Err(LedgerError::ReceiverRejected)
            }
        }
    }

    /// Drops the record at `id`, leaving a hole the mutation paths would
    /// never produce.
    #[cfg(test)]
    pub(crate) fn clear_slot_for_tests(&mut self, id: UnitId) {
        self.records.remove(&id);
    }
}

// =============================================================================
// TESTS
// =============================================================================
