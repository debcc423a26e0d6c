//! # Lifecycle Scenarios
//!
//! End-to-end unit lifecycles driven through the public surface: batch
//! issuance, mid-batch transfers and retirements, approval consumption,
//! and the observer stream a host would build indexes from.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ledger_core::prelude::*;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    // =========================================================================
    // ISSUANCE
    // =========================================================================

    #[test]
    fn test_single_issue_establishes_ownership() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.issue(addr(1), 1).unwrap();

        assert_eq!(ledger.owner_of(1).unwrap(), addr(1));
        assert_eq!(ledger.balance_of(addr(1)), Ok(1));
        assert_eq!(ledger.total_supply(), 1);
    }

    #[test]
    fn test_batch_issue_covers_whole_range() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.issue(addr(1), 10).unwrap();

        for id in 1..=10 {
            assert_eq!(ledger.owner_of(id).unwrap(), addr(1));
        }
        assert_eq!(ledger.balance_of(addr(1)), Ok(10));
        assert_eq!(ledger.total_supply(), 10);
    }

    #[test]
    fn test_interleaved_batches_keep_boundaries() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.issue(addr(1), 4).unwrap();
        ledger.issue(addr(2), 1).unwrap();
        ledger.issue(addr(3), 3).unwrap();

        assert_eq!(ledger.owner_of(4).unwrap(), addr(1));
        assert_eq!(ledger.owner_of(5).unwrap(), addr(2));
        assert_eq!(ledger.owner_of(6).unwrap(), addr(3));
        assert_eq!(ledger.owner_of(8).unwrap(), addr(3));
        assert_eq!(ledger.total_issued(), 8);
    }

    // =========================================================================
    // RETIREMENT
    // =========================================================================

    #[test]
    fn test_issue_then_retire_single() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.issue(addr(1), 1).unwrap();
        ledger.retire(addr(1), 1).unwrap();

        assert_eq!(ledger.owner_of(1), Err(LedgerError::NotFound(1)));
        assert_eq!(ledger.balance_of(addr(1)), Ok(0));
        assert_eq!(ledger.total_supply(), 0);
    }

    #[test]
    fn test_mid_batch_retirement_leaves_neighbours_resolvable() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.issue(addr(1), 10).unwrap();
        ledger.retire(addr(1), 5).unwrap();

        assert_eq!(ledger.owner_of(4).unwrap(), addr(1));
        assert_eq!(ledger.owner_of(5), Err(LedgerError::NotFound(5)));
        assert_eq!(ledger.owner_of(6).unwrap(), addr(1));
        assert_eq!(ledger.balance_of(addr(1)), Ok(9));
        assert_eq!(ledger.total_supply(), 9);
    }

    #[test]
    fn test_supply_identity_holds_through_mixed_history() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.issue(addr(1), 6).unwrap();
        ledger.retire(addr(1), 2).unwrap();
        ledger.issue(addr(2), 3).unwrap();
        ledger.retire(addr(2), 8).unwrap();
        ledger.transfer(addr(1), addr(1), addr(2), 4).unwrap();

        // total_supply == total_issued - retired, at every step of which
        // this is the last.
        assert_eq!(ledger.total_issued(), 9);
        assert_eq!(ledger.total_supply(), 7);
        assert_eq!(
            ledger.balance_of(addr(1)).unwrap() + ledger.balance_of(addr(2)).unwrap(),
            ledger.total_supply()
        );
    }

    // =========================================================================
    // TRANSFERS AND APPROVALS
    // =========================================================================

    #[test]
    fn test_transfer_consumes_approval() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.issue(addr(1), 1).unwrap();
        ledger.approve(addr(1), addr(3), 1).unwrap();

        ledger.transfer(addr(3), addr(1), addr(2), 1).unwrap();

        assert_eq!(ledger.owner_of(1).unwrap(), addr(2));
        assert_eq!(ledger.balance_of(addr(1)), Ok(0));
        assert_eq!(ledger.balance_of(addr(2)), Ok(1));
        assert_eq!(ledger.get_approved(1), Ok(Address::ZERO));

        // The authority was per-unit and one-shot in effect: the old
        // delegate has no standing over the unit under its new owner.
        assert_eq!(
            ledger.transfer(addr(3), addr(2), addr(1), 1),
            Err(LedgerError::NotAuthorized { caller: addr(3) })
        );
    }

    #[test]
    fn test_operator_standing_survives_transfers() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.issue(addr(1), 2).unwrap();
        ledger.set_approval_for_all(addr(1), addr(4), true).unwrap();

        ledger.transfer(addr(4), addr(1), addr(2), 1).unwrap();
        // Still an operator for addr(1)'s remaining unit.
        ledger.retire(addr(4), 2).unwrap();

        assert_eq!(ledger.owner_of(1).unwrap(), addr(2));
        assert_eq!(ledger.balance_of(addr(1)), Ok(0));
    }

    #[test]
    fn test_unit_changes_hands_many_times() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        ledger.issue(addr(1), 5).unwrap();

        let mut holder = 1u8;
        for next in 2..=6u8 {
            ledger
                .transfer(addr(holder), addr(holder), addr(next), 3)
                .unwrap();
            holder = next;
        }

        assert_eq!(ledger.owner_of(3).unwrap(), addr(6));
        assert_eq!(ledger.balance_of(addr(6)), Ok(1));
        // The rest of the batch never moved.
        assert_eq!(ledger.owner_of(2).unwrap(), addr(1));
        assert_eq!(ledger.owner_of(4).unwrap(), addr(1));
        assert_eq!(ledger.balance_of(addr(1)), Ok(4));
    }

    // =========================================================================
    // OBSERVER STREAM
    // =========================================================================

    #[test]
    fn test_observer_stream_matches_history() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let observer = Arc::new(RecordingObserver::new());
        ledger.add_observer(observer.clone());

        ledger.issue(addr(1), 2).unwrap();
        ledger.transfer(addr(1), addr(1), addr(2), 2).unwrap();
        ledger.retire(addr(1), 1).unwrap();

        assert_eq!(
            observer.events(),
            vec![
                LedgerEvent::issued(addr(1), 1),
                LedgerEvent::issued(addr(1), 2),
                LedgerEvent::Transfer {
                    from: addr(1),
                    to: addr(2),
                    id: 2,
                },
                LedgerEvent::retired(addr(1), 1),
            ]
        );
    }

    #[test]
    fn test_rejected_operations_stay_out_of_the_stream() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let observer = Arc::new(RecordingObserver::new());
        ledger.add_observer(observer.clone());

        let _ = ledger.issue(Address::ZERO, 1);
        let _ = ledger.issue(addr(1), 0);
        let _ = ledger.transfer(addr(1), addr(1), addr(2), 1);
        let _ = ledger.retire(addr(1), 1);

        assert!(observer.is_empty());
    }

    // =========================================================================
    // SHARED SERVICE SURFACE
    // =========================================================================

    #[test]
    fn test_shared_ledger_full_lifecycle() {
        let ledger = SharedLedger::new(LedgerConfig {
            name: "Deed Registry".to_string(),
            symbol: "DEED".to_string(),
        });

        assert_eq!(ledger.name(), "Deed Registry");
        assert_eq!(ledger.symbol(), "DEED");

        ledger.issue(addr(1), 3).unwrap();
        ledger.approve(addr(1), addr(3), 2).unwrap();
        ledger.transfer(addr(3), addr(1), addr(2), 2).unwrap();
        ledger.retire(addr(2), 2).unwrap();

        assert_eq!(ledger.total_supply(), 2);
        assert_eq!(ledger.stats().operations_applied, 4);
        assert_eq!(ledger.stats().operations_rejected, 0);
    }

    #[test]
    fn test_metadata_delegation_through_service() {
        let ledger = SharedLedger::new(LedgerConfig::default());
        ledger.set_metadata_provider(Arc::new(BaseUriProvider::new("unit://meta/")));

        ledger.issue(addr(1), 2).unwrap();
        assert_eq!(ledger.unit_uri(2).unwrap(), "unit://meta/2");
        assert_eq!(ledger.unit_uri(3), Err(LedgerError::NotFound(3)));
    }

    #[test]
    fn test_capability_surface() {
        let ledger = SharedLedger::new(LedgerConfig::default());
        assert!(ledger.supports_capability(capabilities::INTROSPECTION));
        assert!(ledger.supports_capability(capabilities::OWNERSHIP));
        assert!(ledger.supports_capability(capabilities::METADATA));
        assert!(!ledger.supports_capability([0xff; 4]));
    }
}
