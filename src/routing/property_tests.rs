//! Property-Based Tests for Routing
//!
//! Uses proptest to check matcher and target invariants over generated
//! route tables and paths.

use proptest::prelude::*;

use crate::routing::{match_route, resolve_request, ApiRoutes, RouteTable, Target};

// == Strategies ==
/// Generates a single path segment
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,12}".prop_map(|s| s)
}

fn target_strategy() -> impl Strategy<Value = Target> {
    prop_oneof![Just(Target::Raw), Just(Target::Json), Just(Target::Html)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every literal key matches itself exactly, with or without a leading slash.
    #[test]
    fn prop_literal_keys_match_exactly(
        keys in prop::collection::vec(segment_strategy(), 1..10),
        slash in any::<bool>(),
    ) {
        let table = keys
            .iter()
            .fold(RouteTable::new(), |table, key| table.with_static(key, key.clone()));

        for key in &keys {
            let endpoint = if slash { format!("/{}", key) } else { key.clone() };
            let result = match_route(&table, &endpoint);
            prop_assert_eq!(result.route_key.as_deref(), Some(key.as_str()));
            prop_assert!(result.params.is_empty());
        }
    }

    // A single-parameter route binds the second segment whatever its value.
    #[test]
    fn prop_parametric_binds_by_position(
        first in segment_strategy(),
        name in "[a-z]{1,8}",
        value in segment_strategy(),
    ) {
        let declared = format!("{}/:{}", first, name);
        let table = RouteTable::new().with_static(&declared, "x");

        let result = match_route(&table, &format!("/{}/{}", first, value));
        prop_assert_eq!(result.route_key.as_deref(), Some(declared.as_str()));
        prop_assert_eq!(result.params.get(&name), Some(&value));
    }

    // A literal key always wins over a parametric key it also satisfies.
    #[test]
    fn prop_exact_match_has_priority(
        first in segment_strategy(),
        second in segment_strategy(),
    ) {
        let literal = format!("{}/{}", first, second);
        let table = RouteTable::new()
            .with_static(&format!("{}/:id", first), "param")
            .with_static(&literal, "literal");

        let result = match_route(&table, &literal);
        prop_assert_eq!(result.route_key.as_deref(), Some(literal.as_str()));
        prop_assert!(result.params.is_empty());
    }

    // Endpoints under an unknown first segment never match.
    #[test]
    fn prop_unknown_first_segment_never_matches(
        keys in prop::collection::vec(segment_strategy(), 1..10),
        unknown in "[A-Z]{1,8}",
    ) {
        let table = keys.iter().fold(RouteTable::new(), |table, key| {
            table.with_static(&format!("{}/:id", key), "x")
        });
        let endpoint = format!("{}/1", unknown);
        prop_assert!(!match_route(&table, &endpoint).is_match());
    }

    // Namespace prefixes split back into the target and endpoint they were built from.
    #[test]
    fn prop_namespace_split(
        target in target_strategy(),
        endpoint in prop::collection::vec(segment_strategy(), 1..4),
    ) {
        let api = ApiRoutes::new("/mm/api/v1");
        let endpoint = format!("/{}", endpoint.join("/"));
        let path = format!("{}{}", api.prefix(target), endpoint);

        let resolved = resolve_request(&path, &api, None).unwrap();
        prop_assert_eq!(resolved.target, Some(target));
        prop_assert_eq!(resolved.endpoint, endpoint);
    }
}
