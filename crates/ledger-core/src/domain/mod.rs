//! # Domain Layer
//!
//! The ledger's value objects, the two packed record shapes with their
//! codec, and the runtime invariant audit. Types here carry no I/O.

pub mod invariants;
pub mod records;
pub mod value_objects;

pub use invariants::*;
pub use records::*;
pub use value_objects::*;
