//! Property tests for shallow-history depth flags.

use proptest::prelude::*;

use stagehand::plan::DepthOption;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A positive depth produces a `--depth=N` flag in both the
    /// fetch and clone argument lists, and the clone list also widens the
    /// refspec so non-default branches stay reachable.
    #[test]
    fn property_positive_depth_emits_matching_flags(n in 1u64..100_000) {
        let depth = DepthOption::new(Some(n));
        prop_assert!(depth.is_enabled());

        let flag = format!("--depth={n}");
        prop_assert_eq!(depth.fetch_args(), vec![flag.clone()]);
        prop_assert_eq!(
            depth.clone_args(),
            vec![flag, "--no-single-branch".to_string()]
        );
    }
}

#[test]
fn zero_depth_disables_shallow_history() {
    let zero = DepthOption::new(Some(0));
    let absent = DepthOption::new(None);

    assert!(!zero.is_enabled());
    assert_eq!(zero.depth(), absent.depth());
    assert!(zero.fetch_args().is_empty());
    assert!(zero.clone_args().is_empty());
}
