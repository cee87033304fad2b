// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Logical Id Derivation

use ohw_infrastructure::construct::logical_id_for;
use proptest::prelude::*;

fn component() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9.+-]{0,15}"
}

proptest! {
    /// Derivation is a pure function of the path
    #[test]
    fn prop_logical_id_is_stable(path in prop::collection::vec(component(), 1..5)) {
        let components: Vec<&str> = path.iter().map(String::as_str).collect();
        prop_assert_eq!(logical_id_for(&components), logical_id_for(&components));
    }

    /// Template keys only ever contain alphanumerics
    #[test]
    fn prop_logical_id_is_alphanumeric(path in prop::collection::vec(component(), 1..5)) {
        let components: Vec<&str> = path.iter().map(String::as_str).collect();
        let id = logical_id_for(&components);
        prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric()), "{} is not alphanumeric", id);
    }

    /// Distinct nested paths yield distinct ids
    #[test]
    fn prop_distinct_paths_distinct_ids(
        a in prop::collection::vec(component(), 2..4),
        b in prop::collection::vec(component(), 2..4),
    ) {
        prop_assume!(a != b);
        let a: Vec<&str> = a.iter().map(String::as_str).collect();
        let b: Vec<&str> = b.iter().map(String::as_str).collect();
        prop_assert_ne!(logical_id_for(&a), logical_id_for(&b));
    }
}
