//! # Adapters
//!
//! In-memory implementations of the outbound ports, used in tests and as
//! reference implementations for host integrations.

pub mod clock;
pub mod metadata;
pub mod observers;
pub mod receivers;

pub use clock::{ManualClock, SystemClock};
pub use metadata::BaseUriProvider;
pub use observers::{NullObserver, RecordingObserver};
pub use receivers::{AcceptingReceiver, ReentrantReceiver, RejectingReceiver};
