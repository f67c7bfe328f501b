// ============================================================================
// INVARIANTS & PROPERTY TESTS
// ============================================================================
//
// Run with: cargo test --lib formal_verification
//
// Each test pins one property the client must hold regardless of input:
// 1. Blended APY formula
// 2. Percent of TVL with zero assets
// 3. Feed ordering is idempotent and newest first
// 4. Exactly one kind-specific payload per record
// 5. Bounded log query concurrency
// 6. Feed filters
// 7. Reference allocation scenario
// 8. Wallet rejection lifecycle
// ============================================================================

#[cfg(test)]
mod formal_tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use alloy::primitives::U256;

    use crate::aggregator::aggregate;
    use crate::config::{ChainConfig, ReconciliationConfig};
    use crate::constants::*;
    use crate::errors::ErrorCategory;
    use crate::gateway::BlockRange;
    use crate::helpers::math::*;
    use crate::notifications::{ChannelNotifier, NotificationVariant};
    use crate::reconciliation::*;
    use crate::state::*;
    use crate::store::VaultStore;
    use crate::tests::*;
    use crate::TransactionActionController;

    fn sample_feed() -> Vec<VaultTransaction> {
        vec![
            transfer_log(EventKind::Deposit, 10, alice(), alice(), ctc(5)),
            harvest_log(30, [1, 2, 3]),
            transfer_log(EventKind::Withdraw, 20, bob(), bob(), ctc(2)),
            rebalance_log(30, [4, 3, 2]),
            transfer_log(EventKind::Deposit, 40, bob(), alice(), ctc(7)),
            transfer_log(EventKind::Withdraw, 10, alice(), alice(), ctc(1)),
        ]
        .into_iter()
        .filter_map(normalize)
        .collect()
    }

    // ========================================================================
    // 1. APY FORMULA
    // ========================================================================

    #[test]
    fn prop1_apy_matches_integer_reference() {
        let weight_sets: [[u16; 3]; 6] = [
            [4000, 3500, 2500],
            [10_000, 0, 0],
            [0, 10_000, 0],
            [0, 0, 10_000],
            [3333, 3333, 3334],
            [0, 0, 0],
        ];
        for weights in weight_sets {
            let weighted: u128 = weights[0] as u128 * STAKING_RATE_PER_BLOCK
                + weights[1] as u128 * LENDING_RATE_PER_BLOCK
                + weights[2] as u128 * LP_RATE_PER_BLOCK;
            let expected = (weighted * BLOCKS_PER_YEAR / BASIS_POINTS_100_PERCENT) as f64 / 1e18 * 100.0;
            assert_eq!(estimate_apy(weights), expected, "weights {:?}", weights);
        }
    }

    #[test]
    fn prop1_apy_bounded_by_strategy_apys() {
        let max = strategy_apy(STAKING_RATE_PER_BLOCK);
        let min = strategy_apy(LP_RATE_PER_BLOCK);
        for staking in (0..=10_000u16).step_by(500) {
            let rest = 10_000 - staking;
            let apy = estimate_apy([staking, rest / 2, rest - rest / 2]);
            assert!(apy <= max + 1e-9 && apy >= min - 1e-9, "apy {} out of range", apy);
        }
    }

    // ========================================================================
    // 2. ZERO TVL
    // ========================================================================

    #[test]
    fn prop2_zero_assets_gives_zero_percentages() {
        let mut snapshot = balanced_snapshot();
        snapshot.total_assets = Some(U256::ZERO);
        let metrics = aggregate(&snapshot);
        for view in &metrics.strategies {
            assert_eq!(view.pct_of_tvl, 0.0);
            assert!(view.pct_of_tvl.is_finite());
        }

        for alloc in [U256::ZERO, ctc(1), U256::MAX] {
            assert_eq!(pct_of_tvl(alloc, U256::ZERO), 0.0);
        }
    }

    // ========================================================================
    // 3. ORDERING
    // ========================================================================

    #[test]
    fn prop3_sort_is_descending_and_idempotent() {
        let once = merge_and_sort(sample_feed());
        assert!(once.windows(2).all(|w| w[0].block_number >= w[1].block_number));

        let twice = merge_and_sort(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn prop3_sort_is_stable_within_a_block() {
        let sorted = merge_and_sort(sample_feed());
        let block_30: Vec<EventKind> = sorted
            .iter()
            .filter(|t| t.block_number == 30)
            .map(|t| t.kind)
            .collect();
        assert_eq!(block_30, vec![EventKind::Harvest, EventKind::Rebalance]);
    }

    // ========================================================================
    // 4. PAYLOAD EXCLUSIVITY
    // ========================================================================

    #[test]
    fn prop4_exactly_one_payload_per_record() {
        for tx in sample_feed() {
            let present = [
                tx.shares().is_some(),
                tx.rewards().is_some(),
                tx.allocs().is_some(),
            ];
            assert_eq!(present.iter().filter(|p| **p).count(), 1, "{:?}", tx);

            match tx.kind {
                EventKind::Deposit | EventKind::Withdraw => assert!(present[0]),
                EventKind::Harvest => assert!(present[1]),
                EventKind::Rebalance => assert!(present[2]),
            }
        }
    }

    // ========================================================================
    // 5. BOUNDED CONCURRENCY
    // ========================================================================

    #[tokio::test]
    async fn prop5_sixteen_queries_in_four_rounds() {
        let gateway = Arc::new(MockGateway::read_only(100_000));
        let config = ReconciliationConfig::new(20_000, 5_000).unwrap();

        reconcile(gateway.as_ref(), &config).await.unwrap();

        let queries = gateway.queries();
        assert_eq!(queries.len(), 16);
        assert_eq!(gateway.max_in_flight.load(Ordering::SeqCst), 4);

        let rounds: Vec<&[(EventKind, BlockRange)]> = queries.chunks(4).collect();
        for (i, round) in rounds.iter().enumerate() {
            let range = round[0].1;
            assert!(round.iter().all(|(_, r)| *r == range), "round {} mixes ranges", i);

            let mut kinds: Vec<EventKind> = round.iter().map(|(k, _)| *k).collect();
            kinds.dedup();
            assert_eq!(kinds.len(), 4);

            assert_eq!(range.len(), 5_000);
            assert_eq!(range.from, 80_001 + i as u64 * 5_000);
        }
        assert_eq!(rounds[3][0].1.to, 100_000);
    }

    // ========================================================================
    // 6. FILTERS
    // ========================================================================

    #[test]
    fn prop6_owned_by_and_all_filters() {
        let feed = merge_and_sort(sample_feed());

        let all: Vec<_> = feed.iter().filter(|t| FeedFilter::All.matches(t)).collect();
        assert_eq!(all.len(), feed.len());

        let mine = FeedFilter::owned_by_hex(&alice().to_string().to_uppercase().replace("0X", "0x")).unwrap();
        let owned: Vec<_> = feed.iter().filter(|t| mine.matches(t)).collect();
        assert!(!owned.is_empty());
        assert!(owned.iter().all(|t| t.user() == Some(alice())));

        // harvests and rebalances have no user
        assert!(owned
            .iter()
            .all(|t| matches!(t.kind, EventKind::Deposit | EventKind::Withdraw)));
        let expected = feed.iter().filter(|t| t.user() == Some(alice())).count();
        assert_eq!(owned.len(), expected);
    }

    // ========================================================================
    // 7. REFERENCE SCENARIO
    // ========================================================================

    #[test]
    fn prop7_forty_thirty_five_twenty_five() {
        let metrics = aggregate(&balanced_snapshot());

        let pcts: Vec<f64> = metrics.strategies.iter().map(|s| s.pct_of_tvl).collect();
        assert!((pcts[0] - 40.0).abs() < 1e-9);
        assert!((pcts[1] - 35.0).abs() < 1e-9);
        assert!((pcts[2] - 25.0).abs() < 1e-9);
        assert!((pcts.iter().sum::<f64>() - 100.0).abs() < 1e-9);

        assert!((metrics.estimated_apy - 7.88226552).abs() < 1e-9);
        assert!(balanced_snapshot().weights.sums_to_full());
    }

    // ========================================================================
    // 8. WALLET REJECTION
    // ========================================================================

    #[tokio::test]
    async fn prop8_rejected_deposit_skips_confirming() {
        let gateway = Arc::new(MockGateway::connected(alice()));
        gateway.fail_submit("User rejected the request.");
        let store = Arc::new(VaultStore::new(Arc::clone(&gateway)));
        let (notifier, mut rx) = ChannelNotifier::new();
        let ctl = TransactionActionController::new(store, notifier, ChainConfig::default());

        let mut states = ctl.subscribe();
        let collector = async {
            let mut seen = Vec::new();
            while states.changed().await.is_ok() {
                let state = states.borrow_and_update().clone();
                let done = state.is_terminal();
                seen.push(state);
                if done {
                    break;
                }
            }
            seen
        };

        let (result, seen) = tokio::join!(ctl.deposit("1"), collector);
        let final_state = result.unwrap();

        assert_eq!(
            seen,
            vec![
                ActionState::Submitting { kind: ActionKind::Deposit },
                final_state.clone(),
            ]
        );
        match final_state {
            ActionState::Failed { failure, .. } => {
                assert_eq!(failure.category, ErrorCategory::UserRejected);
                assert_eq!(failure.message, "Transaction rejected by user");
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(gateway.receipt_waits.load(Ordering::SeqCst), 0);

        let note = rx.try_recv().unwrap();
        assert_eq!(note.variant, NotificationVariant::Info);
        assert_eq!(note.message, "Transaction rejected by user");
        assert!(rx.try_recv().is_err());
    }
}
