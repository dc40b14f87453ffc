//! Property tests for the synthetic position source.

use adapter_positions::{PositionSource, SyntheticBook};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_count_and_reproducibility(seed in any::<u64>(), count in 0usize..400) {
        let source: Box<dyn PositionSource> = Box::new(SyntheticBook::new().with_seed(seed));
        let a = source.positions(count);
        let b = source.positions(count);
        prop_assert_eq!(a.len(), count);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_option_fields_positive(seed in any::<u64>()) {
        for p in SyntheticBook::new().with_seed(seed).positions(200) {
            prop_assert!(p.price > 0.0);
            prop_assert!(p.volatility > 0.0);
            if p.is_option() {
                prop_assert!(p.strike > 0.0);
                prop_assert!(p.time_to_expiry > 0.0);
            }
        }
    }
}
