//! Property tests for specification version ordering

use node_spec_library::spec::{compare_versions, is_version_higher, SpecVersion};
use proptest::prelude::*;
use std::cmp::Ordering;

const U64_MAX: u128 = u64::MAX as u128;

/// Small values, values around `u64::MAX` and values far beyond it
fn component() -> impl Strategy<Value = u128> {
    prop_oneof![
        0u128..20,
        (U64_MAX - 2)..(U64_MAX + 3),
        0u128..(u128::MAX / 2),
    ]
}

fn join(parts: &[u128]) -> String {
    parts
        .iter()
        .map(u128::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

fn version() -> impl Strategy<Value = String> {
    prop::collection::vec(component(), 1..5).prop_map(|parts| join(&parts))
}

proptest! {
    #[test]
    fn antisymmetric(a in version(), b in version()) {
        prop_assert_eq!(compare_versions(&a, &b), compare_versions(&b, &a).reverse());
    }

    #[test]
    fn transitive(a in version(), b in version(), c in version()) {
        if compare_versions(&a, &b) != Ordering::Greater
            && compare_versions(&b, &c) != Ordering::Greater
        {
            prop_assert_ne!(compare_versions(&a, &c), Ordering::Greater);
        }
    }

    #[test]
    fn trailing_zeros_are_ignored(a in version(), zeros in 1usize..4) {
        let padded = format!("{a}{}", ".0".repeat(zeros));
        prop_assert_eq!(compare_versions(&a, &padded), Ordering::Equal);
        prop_assert_eq!(SpecVersion::from(a.as_str()), SpecVersion::from(padded.as_str()));
    }

    #[test]
    fn higher_means_greater(a in version(), b in version()) {
        prop_assert_eq!(
            is_version_higher(&a, &b),
            compare_versions(&a, &b) == Ordering::Greater
        );
    }

    #[test]
    fn bumping_a_component_increases(
        a in prop::collection::vec(component(), 1..5),
        idx in 0usize..5,
    ) {
        let idx = idx % a.len();
        let mut bumped = a.clone();
        bumped[idx] += 1;
        prop_assert_eq!(compare_versions(&join(&bumped), &join(&a)), Ordering::Greater);
    }

    #[test]
    fn single_components_compare_numerically(a in component(), b in component()) {
        prop_assert_eq!(compare_versions(&a.to_string(), &b.to_string()), a.cmp(&b));
    }

    #[test]
    fn leading_zeros_are_ignored(a in component(), zeros in 1usize..4) {
        let padded = format!("{}{a}", "0".repeat(zeros));
        prop_assert_eq!(compare_versions(&a.to_string(), &padded), Ordering::Equal);
    }
}

#[test]
fn test_documented_examples() {
    assert_eq!(compare_versions("2", "2.0"), Ordering::Equal);
    assert_eq!(compare_versions("2.1", "2.0.9"), Ordering::Greater);
    assert_eq!(compare_versions("13", "13.0.0"), Ordering::Equal);
    assert_eq!(compare_versions("1.0.0", "1.1.0"), Ordering::Less);
}

#[test]
fn test_component_above_u64_max() {
    let big = "1.18446744073709551616";
    assert_eq!(compare_versions(big, "1.1"), Ordering::Greater);
    assert!(is_version_higher(big, "1.18446744073709551615"));
    assert!(SpecVersion::from(big) > SpecVersion::from("1.0"));
}
