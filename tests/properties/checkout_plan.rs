//! Property tests for checkout target planning.

use proptest::prelude::*;

use stagehand::plan::{CheckoutMode, CheckoutTarget};

fn reference() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._/-]{1,32}")
        .unwrap()
        .prop_filter("git refs cannot start or end with a slash", |s| {
            !s.starts_with('/') && !s.ends_with('/')
        })
}

fn remote() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,16}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Planning never panics, for any mode and any input strings.
    #[test]
    fn property_plan_never_panics(
        mode in prop_oneof![
            Just(CheckoutMode::Branch),
            Just(CheckoutMode::Tag),
            Just(CheckoutMode::Revision),
        ],
        remote in "(?s).{0,64}",
        reference in "(?s).{0,64}",
    ) {
        let _ = CheckoutTarget::plan(mode, &remote, &reference);
    }

    /// PROPERTY: A branch plan always prefixes the remote, and its fetch
    /// label is the bare branch name.
    #[test]
    fn property_branch_targets_are_remote_qualified(
        remote in remote(),
        branch in reference(),
    ) {
        let target = CheckoutTarget::plan(CheckoutMode::Branch, &remote, &branch).unwrap();
        prop_assert_eq!(target.target, format!("{remote}/{branch}"));
        prop_assert_eq!(target.branch_label, branch);
    }

    /// PROPERTY: A tag plan is namespaced under `tags/` in both fields,
    /// regardless of the remote.
    #[test]
    fn property_tag_targets_ignore_the_remote(
        remote in remote(),
        tag in reference(),
    ) {
        let target = CheckoutTarget::plan(CheckoutMode::Tag, &remote, &tag).unwrap();
        prop_assert_eq!(&target.target, &format!("tags/{tag}"));
        prop_assert_eq!(target.branch_label, target.target);
    }

    /// PROPERTY: A revision plan passes the reference through untouched.
    #[test]
    fn property_revision_targets_are_verbatim(
        remote in remote(),
        revision in reference(),
    ) {
        let target = CheckoutTarget::plan(CheckoutMode::Revision, &remote, &revision).unwrap();
        prop_assert_eq!(&target.target, &revision);
        prop_assert_eq!(&target.branch_label, &revision);
    }

    /// PROPERTY: Planning is deterministic.
    #[test]
    fn property_plans_are_deterministic(
        mode in prop_oneof![
            Just(CheckoutMode::Branch),
            Just(CheckoutMode::Tag),
            Just(CheckoutMode::Revision),
        ],
        remote in remote(),
        reference in reference(),
    ) {
        let first = CheckoutTarget::plan(mode, &remote, &reference).unwrap();
        let second = CheckoutTarget::plan(mode, &remote, &reference).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn empty_reference_is_rejected_in_every_mode() {
    for mode in [
        CheckoutMode::Branch,
        CheckoutMode::Tag,
        CheckoutMode::Revision,
    ] {
        assert!(CheckoutTarget::plan(mode, "origin", "").is_err());
    }
}
