//! # Acceptance Gate
//!
//! Safe issuance and transfer against programmable recipients: the hook
//! contract, all-or-nothing rollback on rejection, and the reentrancy
//! guard around the one point where control leaves the ledger.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ledger_core::prelude::*;
    use parking_lot::Mutex;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    /// Observable state a rolled-back operation must restore exactly.
    #[derive(Debug, PartialEq, Eq)]
    struct StateProbe {
        total_issued: u64,
        total_supply: u64,
        balances: Vec<u64>,
        owners: Vec<Result<Address, LedgerError>>,
    }

    fn probe(ledger: &Ledger) -> StateProbe {
        StateProbe {
            total_issued: ledger.total_issued(),
            total_supply: ledger.total_supply(),
            balances: (1..=9u8)
                .map(|n| ledger.balance_of(addr(n)).unwrap())
                .collect(),
            owners: (1..=ledger.total_issued().max(4))
                .map(|id| ledger.owner_of(id))
                .collect(),
        }
    }

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[test]
    fn test_safe_issue_to_plain_account_needs_no_hook() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.safe_issue(addr(1), 3, &Bytes::new()).unwrap();
        assert_eq!(ledger.balance_of(addr(1)), Ok(3));
    }

    #[test]
    fn test_safe_issue_confirms_last_id_of_batch() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let hook = Arc::new(AcceptingReceiver::new());
        ledger.register_programmable(addr(2), Some(hook.clone()));

        ledger.issue(addr(1), 4).unwrap();
        ledger.safe_issue(addr(2), 3, &Bytes::new()).unwrap();

        // Invoked exactly once, for the last issued id, with a zero
        // operator and a zero previous holder.
        assert_eq!(hook.received(), vec![(Address::ZERO, Address::ZERO, 7)]);
        assert_eq!(ledger.balance_of(addr(2)), Ok(3));
    }

    #[test]
    fn test_safe_transfer_passes_operator_and_from() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let hook = Arc::new(AcceptingReceiver::new());
        ledger.register_programmable(addr(2), Some(hook.clone()));

        ledger.issue(addr(1), 1).unwrap();
        ledger.approve(addr(1), addr(3), 1).unwrap();
        ledger
            .safe_transfer(addr(3), addr(1), addr(2), 1, &Bytes::from_slice(b"hi"))
            .unwrap();

        assert_eq!(hook.received(), vec![(addr(3), addr(1), 1)]);
        assert_eq!(ledger.owner_of(1).unwrap(), addr(2));
    }

    #[test]
    fn test_hook_sees_committed_state() {
        // The gate runs after the core mutation, so the hook observes the
        // unit already under the recipient.
        struct InspectingReceiver {
            observed_owner: Mutex<Option<Address>>,
        }
        impl UnitReceiver for InspectingReceiver {
            fn on_unit_received(
                &self,
                ledger: &mut Ledger,
                _operator: Address,
                _from: Address,
                id: UnitId,
                _data: &Bytes,
            ) -> Result<Selector, AcceptanceError> {
                *self.observed_owner.lock() = ledger.owner_of(id).ok();
                Ok(UNIT_RECEIVED)
            }
        }

        let mut ledger = Ledger::new(LedgerConfig::default());
        let hook = Arc::new(InspectingReceiver {
            observed_owner: Mutex::new(None),
        });
        ledger.register_programmable(addr(2), Some(hook.clone()));

        ledger.issue(addr(1), 1).unwrap();
        ledger
            .safe_transfer(addr(1), addr(1), addr(2), 1, &Bytes::new())
            .unwrap();

        assert_eq!(*hook.observed_owner.lock(), Some(addr(2)));
    }

    // =========================================================================
    // REJECTION ROLLBACK
    // =========================================================================

    #[test]
    fn test_rejected_safe_issue_rolls_back_everything() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.register_programmable(addr(2), Some(Arc::new(RejectingReceiver::wrong_selector())));
        ledger.issue(addr(1), 2).unwrap();

        let before = probe(&ledger);
        assert_eq!(
            ledger.safe_issue(addr(2), 5, &Bytes::new()),
            Err(LedgerError::ReceiverRejected)
        );
        assert_eq!(probe(&ledger), before);
    }

    #[test]
    fn test_erroring_hook_rolls_back_like_wrong_selector() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.register_programmable(addr(2), Some(Arc::new(RejectingReceiver::erroring())));
        ledger.issue(addr(1), 1).unwrap();

        let before = probe(&ledger);
        assert_eq!(
            ledger.safe_transfer(addr(1), addr(1), addr(2), 1, &Bytes::new()),
            Err(LedgerError::ReceiverRejected)
        );
        assert_eq!(probe(&ledger), before);
        assert_eq!(ledger.owner_of(1).unwrap(), addr(1));
    }

    #[test]
    fn test_programmable_recipient_without_capability_rejects() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.register_programmable(addr(2), None);
        ledger.issue(addr(1), 1).unwrap();

        let before = probe(&ledger);
        assert_eq!(
            ledger.safe_issue(addr(2), 1, &Bytes::new()),
            Err(LedgerError::ReceiverRejected)
        );
        assert_eq!(
            ledger.safe_transfer(addr(1), addr(1), addr(2), 1, &Bytes::new()),
            Err(LedgerError::ReceiverRejected)
        );
        assert_eq!(probe(&ledger), before);
    }

    #[test]
    fn test_plain_transfer_ignores_acceptance_hook() {
        // The unsafe variants never consult the gate, even for a
        // programmable recipient that would reject.
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.register_programmable(addr(2), Some(Arc::new(RejectingReceiver::erroring())));
        ledger.issue(addr(1), 1).unwrap();

        ledger.transfer(addr(1), addr(1), addr(2), 1).unwrap();
        assert_eq!(ledger.owner_of(1).unwrap(), addr(2));
    }

    #[test]
    fn test_rolled_back_operation_announces_nothing() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.register_programmable(addr(2), Some(Arc::new(RejectingReceiver::wrong_selector())));
        let observer = Arc::new(RecordingObserver::new());
        ledger.add_observer(observer.clone());

        let _ = ledger.safe_issue(addr(2), 3, &Bytes::new());
        assert!(observer.is_empty());

        ledger.safe_issue(addr(1), 1, &Bytes::new()).unwrap();
        assert_eq!(observer.events(), vec![LedgerEvent::issued(addr(1), 1)]);
    }

    // =========================================================================
    // REENTRANCY
    // =========================================================================

    #[test]
    fn test_reentrant_mutation_fails_both_calls() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let hook = Arc::new(ReentrantReceiver::new(addr(9)));
        ledger.register_programmable(addr(2), Some(hook.clone()));
        ledger.issue(addr(1), 1).unwrap();

        let before = probe(&ledger);
        assert_eq!(
            ledger.safe_transfer(addr(1), addr(1), addr(2), 1, &Bytes::new()),
            Err(LedgerError::ReentrancyDetected)
        );

        // The nested issuance was rejected without committing, and the
        // outer transfer was rolled back wholesale.
        assert_eq!(
            hook.nested_outcome(),
            Some(Err(LedgerError::ReentrancyDetected))
        );
        assert_eq!(probe(&ledger), before);
        assert_eq!(ledger.balance_of(addr(9)), Ok(0));
    }

    #[test]
    fn test_reentrant_safe_issue_rolls_back_batch() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.register_programmable(addr(2), Some(Arc::new(ReentrantReceiver::new(addr(2)))));

        assert_eq!(
            ledger.safe_issue(addr(2), 10, &Bytes::new()),
            Err(LedgerError::ReentrancyDetected)
        );
        assert_eq!(ledger.total_issued(), 0);
        assert_eq!(ledger.balance_of(addr(2)), Ok(0));
        assert_eq!(ledger.owner_of(1), Err(LedgerError::NotFound(1)));
    }

    #[test]
    fn test_guard_resets_after_detection() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.register_programmable(addr(2), Some(Arc::new(ReentrantReceiver::new(addr(9)))));

        let _ = ledger.safe_issue(addr(2), 1, &Bytes::new());

        // The guard must not stay latched: ordinary mutations work again.
        ledger.issue(addr(1), 1).unwrap();
        assert_eq!(ledger.owner_of(1).unwrap(), addr(1));
    }

    #[test]
    fn test_gate_through_shared_service() {
        let ledger = SharedLedger::new(LedgerConfig::default());
        ledger.register_programmable(addr(2), Some(Arc::new(AcceptingReceiver::new())));
        ledger.register_programmable(addr(3), Some(Arc::new(RejectingReceiver::erroring())));

        ledger.safe_issue(addr(2), 2, &Bytes::new()).unwrap();
        assert_eq!(
            ledger.safe_transfer(addr(2), addr(2), addr(3), 1, &Bytes::new()),
            Err(LedgerError::ReceiverRejected)
        );

        assert_eq!(ledger.owner_of(1).unwrap(), addr(2));
        let stats = ledger.stats();
        assert_eq!(stats.operations_applied, 1);
        assert_eq!(stats.operations_rejected, 1);
    }
}
