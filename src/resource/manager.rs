//! Resource managers
//!
//! [`Manager`] binds the generic contract of [`ResourceApi`] to one resource
//! kind. Domain modules only add create bodies and action wrappers.

use super::action::ActionRequest;
use super::api::ResourceApi;
use super::model::Resource;
use super::query::ListQuery;
use crate::sgs::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Static description of a resource kind
pub trait ResourceKind {
    /// Collection path segment and list response key, e.g. `volumes`
    const COLLECTION: &'static str;
    /// Request body and response key for a single resource, e.g. `volume`
    const KEY: &'static str;
    /// Display name, e.g. `Volume`
    const DISPLAY: &'static str;
    /// Sort keys accepted in addition to the common set
    const EXTRA_SORT_KEYS: &'static [&'static str] = &[];

    /// Actions accepted by `/{collection}/{id}/action`
    type Action: ActionRequest;
}

/// Fields accepted by update calls; absent fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl UpdateFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.metadata.is_none()
    }
}

/// Manager for one resource kind
pub struct Manager<K> {
    api: ResourceApi,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for Manager<K> {
    fn clone(&self) -> Self {
        Self::new(self.api.clone())
    }
}

impl<K> Manager<K> {
    pub fn new(api: ResourceApi) -> Self {
        Self {
            api,
            _kind: PhantomData,
        }
    }

    pub(crate) fn api(&self) -> &ResourceApi {
        &self.api
    }
}

impl<K: ResourceKind> Manager<K> {
    /// `/{collection}/{id}`
    pub fn resource_path(id: &str) -> String {
        format!("/{}/{}", K::COLLECTION, urlencoding::encode(id))
    }

    /// `/{collection}/{id}/action`
    pub fn action_path(id: &str) -> String {
        format!("{}/action", Self::resource_path(id))
    }

    /// Display name of the managed kind
    pub fn kind(&self) -> &'static str {
        K::DISPLAY
    }

    /// Plural name used in CLI messages
    pub fn collection(&self) -> &'static str {
        K::COLLECTION
    }

    /// `POST /{collection}` with `{key: fields}`
    pub async fn create_with<B: Serialize + ?Sized>(&self, fields: &B) -> Result<Resource> {
        let mut body = Map::new();
        body.insert(K::KEY.to_string(), serde_json::to_value(fields)?);
        let path = format!("/{}", K::COLLECTION);
        self.api
            .create(K::DISPLAY, &path, Some(&Value::Object(body)), K::KEY)
            .await
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Resource>> {
        self.api
            .list(K::DISPLAY, K::COLLECTION, query, K::EXTRA_SORT_KEYS)
            .await
    }

    /// Fetch one resource by id, optionally inside a configuration session
    pub async fn get(&self, id: &str, session_id: Option<&str>) -> Result<Resource> {
        self.api
            .get(K::DISPLAY, &Self::resource_path(id), K::KEY, session_id)
            .await
    }

    /// Update a resource; no request is sent when `fields` serializes empty
    pub async fn update<U: Serialize + ?Sized>(
        &self,
        id: &str,
        fields: &U,
    ) -> Result<Option<Resource>> {
        let fields = match serde_json::to_value(fields)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(Error::InvalidInput(
                    "update fields must be an object".to_string(),
                ))
            }
        };
        self.api
            .update(K::DISPLAY, &Self::resource_path(id), fields, K::KEY)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&Self::resource_path(id)).await
    }

    /// Send an action to `/{collection}/{id}/action`
    pub async fn perform(&self, id: &str, action: &K::Action) -> Result<Option<Resource>> {
        self.api
            .action(K::DISPLAY, &Self::action_path(id), action)
            .await
    }

    /// All resources whose `name` equals `name` exactly
    ///
    /// The server-side filter narrows the listing; the exact match is
    /// checked client-side.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Resource>> {
        let query = ListQuery::new().filter("name", name);
        let found = self.list(&query).await?;
        Ok(found
            .into_iter()
            .filter(|r| r.name() == Some(name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::NoAction;
    use serde_json::json;

    struct Widgets;

    impl ResourceKind for Widgets {
        const COLLECTION: &'static str = "widgets";
        const KEY: &'static str = "widget";
        const DISPLAY: &'static str = "Widget";
        type Action = NoAction;
    }

    #[test]
    fn test_paths() {
        assert_eq!(Manager::<Widgets>::resource_path("w-1"), "/widgets/w-1");
        assert_eq!(Manager::<Widgets>::action_path("w-1"), "/widgets/w-1/action");
    }

    #[test]
    fn test_ids_are_path_encoded() {
        assert_eq!(Manager::<Widgets>::resource_path("a/b"), "/widgets/a%2Fb");
    }

    #[test]
    fn test_update_fields_skip_absent() {
        let fields = UpdateFields {
            name: Some("renamed".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&fields).unwrap(), json!({"name": "renamed"}));
        assert!(!fields.is_empty());
        assert!(UpdateFields::default().is_empty());
        assert_eq!(serde_json::to_value(UpdateFields::default()).unwrap(), json!({}));
    }
}
