//! # Observer Adapters

use crate::events::LedgerEvent;
use crate::ports::outbound::LedgerObserver;
use parking_lot::Mutex;

/// Observer that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl LedgerObserver for NullObserver {
    fn on_event(&self, _event: &LedgerEvent) {}
}

/// Observer that records every event it sees, in commit order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<LedgerEvent>>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.seen.lock().clone()
    }

    /// Drains and returns the recorded events.
    pub fn take(&self) -> Vec<LedgerEvent> {
        std::mem::take(&mut *self.seen.lock())
    }

    /// Number of events recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}

impl LedgerObserver for RecordingObserver {
    fn on_event(&self, event: &LedgerEvent) {
        self.seen.lock().push(event.clone());
    }
}

// =============================================================================
// TESTS
// =============================================================================
