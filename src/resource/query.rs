//! List queries
//!
//! Builds `/{resources}[/detail][?k=v&...]` URLs from filters, pagination and
//! sort options. Parameters are emitted sorted by key so the same query
//! always produces the same URL.

use crate::sgs::error::{Error, Result};
use std::collections::BTreeMap;

/// Sort directions accepted by the service
pub const SORT_DIR_VALUES: &[&str] = &["asc", "desc"];

/// Sort keys accepted for every resource type
pub const SORT_KEY_VALUES: &[&str] = &[
    "id",
    "status",
    "size",
    "availability_zone",
    "name",
    "bootable",
    "created_at",
    "reference",
];

/// Filters, pagination and sort options for a list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Hit `/{resources}/detail` instead of `/{resources}`
    pub detailed: bool,
    /// Equality filters, sent verbatim
    pub search_opts: BTreeMap<String, String>,
    /// Id of the last resource of the previous page
    pub marker: Option<String>,
    pub limit: Option<u32>,
    /// Legacy sort key
    pub sort_key: Option<String>,
    /// Legacy sort direction
    pub sort_dir: Option<String>,
    /// Unified sort: comma-separated `key[:direction]` list
    pub sort: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.search_opts.insert(key.into(), value.into());
        self
    }

    /// Add a filter only when a value is present
    #[must_use]
    pub fn filter_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.filter(key, value),
            None => self,
        }
    }

    /// Include every tenant's resources (admin only on the server side)
    #[must_use]
    pub fn all_tenants(self, all: bool) -> Self {
        if all {
            self.filter("all_tenants", "1")
        } else {
            self
        }
    }

    #[must_use]
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn sort_key(mut self, key: impl Into<String>) -> Self {
        self.sort_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn sort_dir(mut self, dir: impl Into<String>) -> Self {
        self.sort_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Validate the query and collect its parameters in key order
    ///
    /// `extra_sort_keys` extends [`SORT_KEY_VALUES`] for the resource type.
    pub fn params(&self, extra_sort_keys: &[&str]) -> Result<BTreeMap<String, String>> {
        if self.sort.is_some() && (self.sort_key.is_some() || self.sort_dir.is_some()) {
            return Err(Error::InvalidInput(
                "sort_key/sort_dir and sort cannot be combined; use sort".to_string(),
            ));
        }

        let mut params = self.search_opts.clone();

        if let Some(marker) = &self.marker {
            params.insert("marker".to_string(), marker.clone());
        }
        if let Some(limit) = self.limit {
            params.insert("limit".to_string(), limit.to_string());
        }
        if let Some(sort) = &self.sort {
            let formatted = format_sort(sort, extra_sort_keys)?;
            if !formatted.is_empty() {
                params.insert("sort".to_string(), formatted);
            }
        }
        if let Some(key) = &self.sort_key {
            params.insert("sort_key".to_string(), check_sort_key(key, extra_sort_keys)?);
        }
        if let Some(dir) = &self.sort_dir {
            params.insert("sort_dir".to_string(), check_sort_dir(dir)?);
        }

        Ok(params)
    }
}

/// Build the list URL for `resource_type`
pub fn build_list_url(
    resource_type: &str,
    query: &ListQuery,
    extra_sort_keys: &[&str],
) -> Result<String> {
    let params = query.params(extra_sort_keys)?;

    let mut url = format!("/{}", resource_type);
    if query.detailed {
        url.push_str("/detail");
    }

    if !params.is_empty() {
        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query_string);
    }

    Ok(url)
}

/// Normalize a unified sort string, validating every key and direction
fn format_sort(sort: &str, extra_sort_keys: &[&str]) -> Result<String> {
    let mut items = Vec::new();

    for item in sort.split(',').filter(|s| !s.trim().is_empty()) {
        let (key, dir) = match item.split_once(':') {
            Some((key, dir)) => (key, dir.trim()),
            None => (item, ""),
        };
        let key = check_sort_key(key.trim(), extra_sort_keys)?;

        if dir.is_empty() {
            items.push(key);
        } else {
            items.push(format!("{}:{}", key, check_sort_dir(dir)?));
        }
    }

    Ok(items.join(","))
}

fn check_sort_key(key: &str, extra_sort_keys: &[&str]) -> Result<String> {
    if SORT_KEY_VALUES.contains(&key) || extra_sort_keys.contains(&key) {
        return Ok(key.to_string());
    }

    let valid: Vec<&str> = SORT_KEY_VALUES
        .iter()
        .chain(extra_sort_keys.iter())
        .copied()
        .collect();
    Err(Error::InvalidInput(format!(
        "sort_key must be one of the following: {}.",
        valid.join(", ")
    )))
}

fn check_sort_dir(dir: &str) -> Result<String> {
    if SORT_DIR_VALUES.contains(&dir) {
        Ok(dir.to_string())
    } else {
        Err(Error::InvalidInput(format!(
            "sort_dir must be one of the following: {}.",
            SORT_DIR_VALUES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_and_limit_are_sorted() {
        let query = ListQuery::new().marker("1234").limit(2);
        let url = build_list_url("replications", &query, &[]).unwrap();
        assert_eq!(url, "/replications?limit=2&marker=1234");
    }

    #[test]
    fn test_empty_query_has_no_question_mark() {
        let url = build_list_url("volumes", &ListQuery::new(), &[]).unwrap();
        assert_eq!(url, "/volumes");
    }

    #[test]
    fn test_detailed_list() {
        let query = ListQuery::new().detailed(true).filter("status", "available");
        let url = build_list_url("snapshots", &query, &[]).unwrap();
        assert_eq!(url, "/snapshots/detail?status=available");
    }

    #[test]
    fn test_legacy_sort() {
        let query = ListQuery::new().sort_key("id").sort_dir("asc");
        let url = build_list_url("replications", &query, &[]).unwrap();
        assert_eq!(url, "/replications?sort_dir=asc&sort_key=id");
    }

    #[test]
    fn test_invalid_sort_key() {
        let query = ListQuery::new().sort_key("invalid").sort_dir("asc");
        let err = build_list_url("replications", &query, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_sort_dir() {
        let query = ListQuery::new().sort("name:sideways");
        let err = build_list_url("volumes", &query, &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_legacy_and_unified_sort_are_exclusive() {
        let query = ListQuery::new().sort_key("id").sort("name");
        assert!(matches!(
            build_list_url("volumes", &query, &[]),
            Err(Error::InvalidInput(_))
        ));

        let query = ListQuery::new().sort_dir("desc").sort("name");
        assert!(matches!(
            build_list_url("volumes", &query, &[]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unified_sort_is_normalized_and_encoded() {
        let query = ListQuery::new().sort(" name:desc, id ,,created_at:asc");
        let params = query.params(&[]).unwrap();
        assert_eq!(params["sort"], "name:desc,id,created_at:asc");

        let url = build_list_url("volumes", &query, &[]).unwrap();
        assert_eq!(url, "/volumes?sort=name%3Adesc%2Cid%2Ccreated_at%3Aasc");
    }

    #[test]
    fn test_extra_sort_keys_per_resource() {
        let query = ListQuery::new().sort_key("data_timestamp");
        assert!(build_list_url("volumes", &query, &[]).is_err());
        assert_eq!(
            build_list_url("backups", &query, &["data_timestamp"]).unwrap(),
            "/backups?sort_key=data_timestamp"
        );
    }

    #[test]
    fn test_filters_are_verbatim_and_encoded() {
        let query = ListQuery::new()
            .filter("name", "my volume")
            .filter_opt("volume_id", None::<String>)
            .all_tenants(true)
            .filter("project_id", "p1");
        let url = build_list_url("backups", &query, &[]).unwrap();
        assert_eq!(url, "/backups?all_tenants=1&name=my%20volume&project_id=p1");
    }

    #[test]
    fn test_all_tenants_false_adds_nothing() {
        let query = ListQuery::new().all_tenants(false);
        assert!(query.params(&[]).unwrap().is_empty());
    }
}
