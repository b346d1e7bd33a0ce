use proptest::prelude::*;

use attest_types::{Score, StakeAmount, Timestamp};

proptest! {
    /// Every value in [0, 100] is a valid score; everything above is rejected.
    #[test]
    fn score_accepts_exactly_the_closed_range(raw in 0u64..10_000) {
        prop_assert_eq!(Score::new(raw).is_ok(), raw <= 100);
    }

    /// Remaining time is zero exactly when the deadline has passed.
    #[test]
    fn remaining_is_zero_iff_passed(deadline in 0u64..1_000_000, now in 0u64..1_000_000) {
        let deadline = Timestamp::new(deadline);
        let now = Timestamp::new(now);
        prop_assert_eq!(deadline.remaining_from(now) == 0, deadline.has_passed(now));
    }

    /// checked_add then checked_sub restores the original amount.
    #[test]
    fn stake_add_sub_inverse(a in 0u128..u128::MAX / 2, b in 0u128..u128::MAX / 2) {
        let a = StakeAmount::new(a);
        let b = StakeAmount::new(b);
        let sum = a.checked_add(b).unwrap();
        prop_assert_eq!(sum.checked_sub(b), Some(a));
    }
}
