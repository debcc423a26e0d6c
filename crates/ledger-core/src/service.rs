//! # Shared Ledger Service
//!
//! Hands one ledger instance to many holders. Mutations serialize behind
//! the write lock, reproducing the strictly ordered execution model the
//! core assumes; read-only queries share the read lock and always observe
//! a fully committed state, because every mutating method either commits
//! all of its writes or restores the pre-call snapshot before returning.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::domain::value_objects::{Address, Bytes, Selector, UnitId};
use crate::errors::LedgerResult;
use crate::ledger::{Ledger, LedgerConfig};
use crate::ports::outbound::{Clock, LedgerObserver, MetadataProvider, UnitReceiver};

/// Operation counters of a shared ledger.
#[derive(Clone, Copy, Debug, Default)]
pub struct LedgerStats {
    /// Mutations that committed.
    pub operations_applied: u64,
    /// Mutations rejected with an error.
    pub operations_rejected: u64,
}

/// A ledger behind one mutual-exclusion domain, cheap to clone and share.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
    stats: Arc<RwLock<LedgerStats>>,
}

impl SharedLedger {
    /// Wraps a fresh ledger on the system clock.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        info!(name = %config.name, symbol = %config.symbol, "ledger service starting");
        Self::wrap(Ledger::new(config))
    }

    /// Wraps a fresh ledger on the given clock.
    #[must_use]
    pub fn with_clock(config: LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        Self::wrap(Ledger::with_clock(config, clock))
    }

    /// Wraps an existing ledger instance.
    #[must_use]
    pub fn wrap(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
            stats: Arc::new(RwLock::new(LedgerStats::default())),
        }
    }

    /// Current operation counters.
    #[must_use]
    pub fn stats(&self) -> LedgerStats {
        *self.stats.read()
    }

    fn track<T>(&self, outcome: LedgerResult<T>) -> LedgerResult<T> {
        let mut stats = self.stats.write();
        match &outcome {
            Ok(_) => stats.operations_applied += 1,
            Err(_) => stats.operations_rejected += 1,
        }
        outcome
    }

    // =========================================================================
    // WIRING
    // =========================================================================

    /// See [`Ledger::register_programmable`].
    pub fn register_programmable(&self, address: Address, hook: Option<Arc<dyn UnitReceiver>>) {
        self.inner.write().register_programmable(address, hook);
    }

    /// See [`Ledger::add_observer`].
    pub fn add_observer(&self, observer: Arc<dyn LedgerObserver>) {
        self.inner.write().add_observer(observer);
    }

    /// See [`Ledger::set_metadata_provider`].
    pub fn set_metadata_provider(&self, provider: Arc<dyn MetadataProvider>) {
        self.inner.write().set_metadata_provider(provider);
    }

    // =========================================================================
    // MUTATIONS (write lock)
    // =========================================================================

    /// See [`Ledger::issue`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::issue`].
    pub fn issue(&self, to: Address, quantity: u64) -> LedgerResult<UnitId> {
        let outcome = self.inner.write().issue(to, quantity);
        self.track(outcome)
    }

    /// See [`Ledger::safe_issue`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::safe_issue`].
    pub fn safe_issue(&self, to: Address, quantity: u64, data: &Bytes) -> LedgerResult<UnitId> {
        let outcome = self.inner.write().safe_issue(to, quantity, data);
        self.track(outcome)
    }

    /// See [`Ledger::transfer`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::transfer`].
    pub fn transfer(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        id: UnitId,
    ) -> LedgerResult<()> {
        let outcome = self.inner.write().transfer(caller, from, to, id);
        self.track(outcome)
    }

    /// See [`Ledger::safe_transfer`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::safe_transfer`].
    pub fn safe_transfer(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        id: UnitId,
        data: &Bytes,
    ) -> LedgerResult<()> {
        let outcome = self.inner.write().safe_transfer(caller, from, to, id, data);
        self.track(outcome)
    }

    /// See [`Ledger::retire`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::retire`].
    pub fn retire(&self, caller: Address, id: UnitId) -> LedgerResult<()> {
        let outcome = self.inner.write().retire(caller, id);
        self.track(outcome)
    }

    /// See [`Ledger::retire_unchecked`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::retire_unchecked`].
    pub fn retire_unchecked(&self, id: UnitId) -> LedgerResult<()> {
        let outcome = self.inner.write().retire_unchecked(id);
        self.track(outcome)
    }

    /// See [`Ledger::approve`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::approve`].
    pub fn approve(&self, caller: Address, delegate: Address, id: UnitId) -> LedgerResult<()> {
        let outcome = self.inner.write().approve(caller, delegate, id);
        self.track(outcome)
    }

    /// See [`Ledger::set_approval_for_all`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::set_approval_for_all`].
    pub fn set_approval_for_all(
        &self,
        caller: Address,
        operator: Address,
        approved: bool,
    ) -> LedgerResult<()> {
        let outcome = self
            .inner
            .write()
            .set_approval_for_all(caller, operator, approved);
        self.track(outcome)
    }

    /// See [`Ledger::set_aux`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::set_aux`].
    pub fn set_aux(&self, owner: Address, aux: u64) -> LedgerResult<()> {
        let outcome = self.inner.write().set_aux(owner, aux);
        self.track(outcome)
    }

    // =========================================================================
    // QUERIES (read lock)
    // =========================================================================

    /// See [`Ledger::name`].
    #[must_use]
    pub fn name(&self) -> String {
        self.inner.read().name().to_string()
    }

    /// See [`Ledger::symbol`].
    #[must_use]
    pub fn symbol(&self) -> String {
        self.inner.read().symbol().to_string()
    }

    /// See [`Ledger::total_supply`].
    #[must_use]
    pub fn total_supply(&self) -> u64 {
        self.inner.read().total_supply()
    }

    /// See [`Ledger::total_issued`].
    #[must_use]
    pub fn total_issued(&self) -> u64 {
        self.inner.read().total_issued()
    }

    /// See [`Ledger::balance_of`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::balance_of`].
    pub fn balance_of(&self, owner: Address) -> LedgerResult<u64> {
        self.inner.read().balance_of(owner)
    }

    /// See [`Ledger::owner_of`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::owner_of`].
    pub fn owner_of(&self, id: UnitId) -> LedgerResult<Address> {
        self.inner.read().owner_of(id)
    }

    /// See [`Ledger::exists`].
    #[must_use]
    pub fn exists(&self, id: UnitId) -> bool {
        self.inner.read().exists(id)
    }

    /// See [`Ledger::get_approved`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::get_approved`].
    pub fn get_approved(&self, id: UnitId) -> LedgerResult<Address> {
        self.inner.read().get_approved(id)
    }

    /// See [`Ledger::is_approved_for_all`].
    #[must_use]
    pub fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.inner.read().is_approved_for_all(owner, operator)
    }

    /// See [`Ledger::number_issued`].
    #[must_use]
    pub fn number_issued(&self, owner: Address) -> u64 {
        self.inner.read().number_issued(owner)
    }

    /// See [`Ledger::number_retired`].
    #[must_use]
    pub fn number_retired(&self, owner: Address) -> u64 {
        self.inner.read().number_retired(owner)
    }

    /// See [`Ledger::aux`].
    #[must_use]
    pub fn aux(&self, owner: Address) -> u64 {
        self.inner.read().aux(owner)
    }

    /// See [`Ledger::unit_uri`].
    ///
    /// # Errors
    ///
    /// As [`Ledger::unit_uri`].
    pub fn unit_uri(&self, id: UnitId) -> LedgerResult<String> {
        self.inner.read().unit_uri(id)
    }

    /// See [`Ledger::supports_capability`].
    #[must_use]
    pub fn supports_capability(&self, capability: Selector) -> bool {
        self.inner.read().supports_capability(capability)
    }
}

// =============================================================================
// TESTS
// =============================================================================
