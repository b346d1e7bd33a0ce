use proptest::prelude::*;

use attest_stake::{BondEscrow, BondLedger, InMemoryLedger};
use attest_types::{Identity, StakeAmount};

proptest! {
    /// Any sequence of locks and releases conserves total supply, and the pool
    /// always equals bond × (locks − releases).
    #[test]
    fn bond_movements_conserve_supply(
        ops in prop::collection::vec((0usize..4, any::<bool>()), 1..64),
    ) {
        let escrow = BondEscrow::new(StakeAmount::new(7));
        let mut ledger = InMemoryLedger::new();
        let people: Vec<Identity> = (0..4).map(|i| Identity::new(format!("p{i}"))).collect();
        for p in &people {
            ledger.credit(p, StakeAmount::new(1_000)).unwrap();
        }
        let supply = ledger.total_supply().unwrap();
        let mut live = 0u64;

        for (who, is_lock) in ops {
            let p = &people[who];
            if is_lock {
                if escrow.lock(&mut ledger, p, StakeAmount::new(7)).is_ok() {
                    live += 1;
                }
            } else if escrow.release(&mut ledger, p).is_ok() {
                live -= 1;
            }
            prop_assert_eq!(ledger.total_supply().unwrap(), supply);
            prop_assert_eq!(Some(ledger.pooled()), escrow.expected_pool(live));
        }
    }

    /// A lock with any amount other than the bond leaves the ledger untouched.
    #[test]
    fn inexact_lock_is_pure(given in 0u128..1_000) {
        prop_assume!(given != 7);
        let escrow = BondEscrow::new(StakeAmount::new(7));
        let mut ledger = InMemoryLedger::new();
        let p = Identity::from("p");
        ledger.credit(&p, StakeAmount::new(1_000)).unwrap();
        prop_assert!(escrow.lock(&mut ledger, &p, StakeAmount::new(given)).is_err());
        prop_assert_eq!(ledger.balance_of(&p), StakeAmount::new(1_000));
        prop_assert_eq!(ledger.pooled(), StakeAmount::ZERO);
    }
}
