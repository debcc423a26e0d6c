//! # Packed Records
//!
//! The two persisted record shapes of the ledger, each packed into a single
//! `U256` scalar. This module is the only place that knows the bit layout;
//! every other module works with the typed structs.
//!
//! Layout of a packed account aggregate (four 64-bit lanes):
//!
//! | Bits    | Field            |
//! |---------|------------------|
//! | 0..64   | `balance`        |
//! | 64..128 | `number_issued`  |
//! | 128..192| `number_retired` |
//! | 192..256| `aux`            |
//!
//! Layout of a packed ownership record:
//!
//! | Bits     | Field              |
//! |----------|--------------------|
//! | 0..160   | `owner`            |
//! | 160..224 | `start_time`       |
//! | 224      | `retired`          |
//! | 225      | `next_initialized` |
//! | 226..256 | reserved (zero)    |

use crate::domain::value_objects::{Address, U256};
use crate::errors::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};

const AGGREGATE_ISSUED_OFFSET: usize = 64;
const AGGREGATE_RETIRED_OFFSET: usize = 128;
const AGGREGATE_AUX_OFFSET: usize = 192;

const OWNERSHIP_START_TIME_OFFSET: usize = 160;
const OWNERSHIP_RETIRED_BIT: usize = 224;
const OWNERSHIP_NEXT_INITIALIZED_BIT: usize = 225;

// =============================================================================
// ACCOUNT AGGREGATE
// =============================================================================

/// Per-owner counters, packed into one scalar per account.
///
/// Created implicitly on first issuance to an address and never deleted;
/// an account whose units have all moved away keeps a zero `balance`.
///
/// ## Invariants
/// - `balance <= number_issued` at all times
/// - counter arithmetic is checked; exceeding a 64-bit lane fails
///   `Overflow` instead of wrapping
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAggregate {
    /// Units currently held.
    pub balance: u64,
    /// Units ever issued to this account.
    pub number_issued: u64,
    /// Units retired while held by this account.
    pub number_retired: u64,
    /// Free-use counter reserved for extensions.
    pub aux: u64,
}

impl AccountAggregate {
    /// Packs the four lanes into one scalar.
    #[must_use]
    pub fn pack(&self) -> U256 {
        U256::from(self.balance)
            | (U256::from(self.number_issued) << AGGREGATE_ISSUED_OFFSET)
            | (U256::from(self.number_retired) << AGGREGATE_RETIRED_OFFSET)
            | (U256::from(self.aux) << AGGREGATE_AUX_OFFSET)
    }

    /// Unpacks a scalar produced by [`AccountAggregate::pack`].
    #[must_use]
    pub fn unpack(packed: U256) -> Self {
        Self {
            balance: packed.low_u64(),
            number_issued: (packed >> AGGREGATE_ISSUED_OFFSET).low_u64(),
            number_retired: (packed >> AGGREGATE_RETIRED_OFFSET).low_u64(),
            aux: (packed >> AGGREGATE_AUX_OFFSET).low_u64(),
        }
    }

    /// Applies an issuance of `quantity` units to this account.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if either counter would exceed its lane. The
    /// aggregate is untouched on failure.
    pub fn credit_issue(&mut self, quantity: u64) -> LedgerResult<()> {
        let balance = self
            .balance
            .checked_add(quantity)
            .ok_or(LedgerError::Overflow)?;
        let issued = self
            .number_issued
            .checked_add(quantity)
            .ok_or(LedgerError::Overflow)?;
        self.balance = balance;
        self.number_issued = issued;
        Ok(())
    }

    /// Receives one unit in a transfer.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the balance lane is saturated.
    pub fn credit_one(&mut self) -> LedgerResult<()> {
        self.balance = self.balance.checked_add(1).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Gives up one unit in a transfer.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the balance is already zero, which would mean
    /// the balance lane and the ownership records disagree.
    pub fn debit_one(&mut self) -> LedgerResult<()> {
        self.balance = self.balance.checked_sub(1).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Retires one held unit: `balance -= 1`, `number_retired += 1`.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if either counter would leave its lane. The
    /// aggregate is untouched on failure.
    pub fn retire_one(&mut self) -> LedgerResult<()> {
        let balance = self.balance.checked_sub(1).ok_or(LedgerError::Overflow)?;
        let retired = self
            .number_retired
            .checked_add(1)
            .ok_or(LedgerError::Overflow)?;
        self.balance = balance;
        self.number_retired = retired;
        Ok(())
    }
}

// =============================================================================
// OWNERSHIP RECORD
// =============================================================================

/// Packed state of one unit slot.
///
/// A record whose `owner` is the zero address is **empty**: it carries no
/// direct information, and ownership of its id must be resolved by
/// scanning backward to the nearest non-empty slot. Slots are written
/// sparsely: one per issuance batch, plus one at every mutated id and
/// conditionally at its successor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// Current owner; zero marks an empty slot.
    pub owner: Address,
    /// Seconds timestamp of the write that produced this record.
    pub start_time: u64,
    /// Terminal flag: the unit at exactly this slot has left circulation.
    pub retired: bool,
    /// The immediately following slot is known to be initialized, so a
    /// backward scan for it never needs to pass through this one.
    pub next_initialized: bool,
}

impl OwnershipRecord {
    /// Returns true if this record denotes an empty slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owner.is_zero()
    }

    /// Packs the record into one scalar. An empty record packs to zero
    /// when its other fields are zero, matching the sparse-slot encoding.
    #[must_use]
    pub fn pack(&self) -> U256 {
        let mut packed = U256::from_big_endian(self.owner.as_bytes());
        packed = packed | (U256::from(self.start_time) << OWNERSHIP_START_TIME_OFFSET);
        if self.retired {
            packed = packed | (U256::one() << OWNERSHIP_RETIRED_BIT);
        }
        if self.next_initialized {
            packed = packed | (U256::one() << OWNERSHIP_NEXT_INITIALIZED_BIT);
        }
        packed
    }

    /// Unpacks a scalar produced by [`OwnershipRecord::pack`].
    #[must_use]
    pub fn unpack(packed: U256) -> Self {
        let owner_lane = packed & ((U256::one() << OWNERSHIP_START_TIME_OFFSET) - U256::one());
        let mut bytes = [0u8; 32];
        owner_lane.to_big_endian(&mut bytes);
        let mut owner = [0u8; 20];
        owner.copy_from_slice(&bytes[12..]);

        Self {
            owner: Address::new(owner),
            start_time: (packed >> OWNERSHIP_START_TIME_OFFSET).low_u64(),
            retired: packed.bit(OWNERSHIP_RETIRED_BIT),
            next_initialized: packed.bit(OWNERSHIP_NEXT_INITIALIZED_BIT),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
