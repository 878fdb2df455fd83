//! Property tests for path resolution under the deploy root.

use proptest::prelude::*;

use std::path::{Path, PathBuf};

use stagehand::paths::resolve_under;

fn relative_path() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z0-9._-]{1,16}").unwrap();
    proptest::collection::vec(segment, 1..=4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Resolution never panics on arbitrary input.
    #[test]
    fn property_resolve_never_panics(
        root in "(?s).{0,64}",
        path in "(?s).{0,64}",
    ) {
        let _ = resolve_under(Path::new(&root), &path);
    }

    /// PROPERTY: A relative path always lands under the root.
    #[test]
    fn property_relative_paths_land_under_the_root(
        suffix in relative_path(),
    ) {
        let root = Path::new("/srv/app");
        let resolved = resolve_under(root, &suffix);
        prop_assert!(resolved.starts_with(root));
        prop_assert_eq!(resolved, root.join(&suffix));
    }

    /// PROPERTY: An absolute path passes through unchanged.
    #[test]
    fn property_absolute_paths_pass_through(
        suffix in relative_path(),
    ) {
        let absolute = format!("/{suffix}");
        let resolved = resolve_under(Path::new("/srv/app"), &absolute);
        prop_assert_eq!(resolved, PathBuf::from(&absolute));
    }

    /// PROPERTY: Resolution is idempotent. Resolving an already-resolved
    /// path changes nothing.
    #[test]
    fn property_resolution_is_idempotent(
        suffix in relative_path(),
    ) {
        let root = Path::new("/srv/app");
        let once = resolve_under(root, &suffix);
        let twice = resolve_under(root, once.to_str().unwrap());
        prop_assert_eq!(once, twice);
    }
}
