//! Property-based tests using proptest
//!
//! These tests verify list URL building: parameter ordering, encoding and
//! sort validation, using randomized inputs.

use proptest::prelude::*;
use sgsclient::resource::query::{SORT_DIR_VALUES, SORT_KEY_VALUES};
use sgsclient::resource::{build_list_url, ListQuery};
use sgsclient::Error;

/// Generate filters as (key, optional value) pairs
fn arb_filters() -> impl Strategy<Value = Vec<(String, Option<String>)>> {
    prop::collection::vec(
        (
            prop_oneof!["name", "status", "volume_id", "replication_id", "project_id"],
            prop::option::of("[ -~]{0,16}"),
        ),
        0..8,
    )
}

fn query_keys(url: &str) -> Vec<String> {
    match url.split_once('?') {
        Some((_, query)) => query
            .split('&')
            .map(|pair| pair.split('=').next().unwrap_or_default().to_string())
            .collect(),
        None => Vec::new(),
    }
}

proptest! {
    /// Query parameters always come out in key order
    #[test]
    fn params_are_sorted(
        filters in arb_filters(),
        marker in prop::option::of("[a-z0-9-]{1,12}"),
        limit in prop::option::of(0u32..1000),
    ) {
        let mut query = ListQuery::new();
        for (key, value) in &filters {
            query = query.filter_opt(key, value.clone());
        }
        if let Some(marker) = marker {
            query = query.marker(marker);
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let url = build_list_url("volumes", &query, &[]).unwrap();
        let keys = query_keys(&url);
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    /// Only filters with a value are sent
    #[test]
    fn absent_values_are_omitted(filters in arb_filters()) {
        let mut query = ListQuery::new();
        for (key, value) in &filters {
            query = query.filter_opt(key, value.clone());
        }

        let url = build_list_url("snapshots", &query, &[]).unwrap();
        for key in query_keys(&url) {
            let present = filters.iter().any(|(k, v)| *k == key && v.is_some());
            prop_assert!(present, "unexpected parameter {}", key);
        }
        if filters.iter().all(|(_, v)| v.is_none()) {
            prop_assert_eq!(url, "/snapshots");
        }
    }

    /// Encoded values never leak separators into the query string
    #[test]
    fn values_are_percent_encoded(value in "[ -~]{1,24}") {
        let query = ListQuery::new().filter("name", value.clone());
        let url = build_list_url("backups", &query, &[]).unwrap();
        let (_, query_string) = url.split_once('?').unwrap();
        prop_assert_eq!(query_string.matches('&').count(), 0);
        prop_assert_eq!(query_string.matches('=').count(), 1);
        prop_assert!(!query_string.contains(' '));
    }

    /// Every allowed key and direction is accepted in a unified sort
    #[test]
    fn allowed_sorts_are_accepted(
        key in prop::sample::select(SORT_KEY_VALUES),
        dir in prop::sample::select(SORT_DIR_VALUES),
    ) {
        let query = ListQuery::new().sort(format!("{}:{}", key, dir));
        let url = build_list_url("volumes", &query, &[]).unwrap();
        let expected = format!("/volumes?sort={}%3A{}", key, dir);
        prop_assert_eq!(url, expected);
    }

    /// Unknown sort keys are rejected before any request
    #[test]
    fn unknown_sort_keys_are_rejected(key in "[a-z_]{1,12}") {
        prop_assume!(!SORT_KEY_VALUES.contains(&key.as_str()));
        let query = ListQuery::new().sort_key(key);
        let result = build_list_url("volumes", &query, &[]);
        prop_assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
