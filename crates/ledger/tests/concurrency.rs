//! Concurrent access through SharedLedger

use elastic_core::{AccountId, Amount, Index, BASE};
use elastic_ledger::{ScaledLedger, SharedLedger, TokenMetadata};
use std::thread;

fn id(s: &str) -> AccountId {
    s.parse().unwrap()
}

#[test]
fn test_concurrent_writers_and_readers() {
    let supply = Amount::new(1_000_000 * u128::from(BASE));
    let ledger = ScaledLedger::new(TokenMetadata::default(), supply, id("admin")).unwrap();
    let shared = SharedLedger::new(ledger);
    let total_shares = shared.with_read(|l| l.total_shares());

    let holders = ["w0", "w1", "w2", "w3"];
    for holder in holders {
        shared
            .transfer(&id("admin"), &id(holder), Amount::new(1_000 * u128::from(BASE)))
            .unwrap();
    }

    let mut handles = Vec::new();

    for (i, holder) in holders.iter().enumerate() {
        let shared = shared.clone();
        let from = id(holder);
        let to = id(holders[(i + 1) % holders.len()]);
        handles.push(thread::spawn(move || {
            for n in 0..200u128 {
                // Failures are fine; partial application is not
                let _ = shared.transfer(&from, &to, Amount::new(n * 1_000_000_007));
            }
        }));
    }

    {
        let shared = shared.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                shared.rebase(&id("admin")).unwrap();
            }
        }));
    }

    for _ in 0..2 {
        let shared = shared.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..200 {
                // Every read sees a whole state
                let sum: u128 = shared.with_read(|l| l.accounts().map(|(_, s)| s.value()).sum());
                assert_eq!(sum, total_shares.value());
                assert!(shared.check_invariants().is_empty());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = shared.snapshot();
    assert_eq!(snapshot.logical_time, shared.with_read(|l| l.logical_time()));
    assert_eq!(
        shared.get_index(),
        (0..50).fold(Index::INITIAL, |index, _| index.contracted().unwrap())
    );
    assert!(shared.check_invariants().is_empty());
}
