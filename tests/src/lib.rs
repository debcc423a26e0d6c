//! # Serial-Ledger Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── lifecycle.rs    # End-to-end issue/transfer/retire scenarios
//!     ├── acceptance.rs   # Acceptance-gate rollback and reentrancy
//!     └── sweeps.rs       # Randomized operation sweeps + invariant audit
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ledger-tests
//!
//! # By category
//! cargo test -p ledger-tests integration::lifecycle
//! cargo test -p ledger-tests integration::acceptance
//! cargo test -p ledger-tests integration::sweeps
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]
