//! Generic request/response contract
//!
//! The five HTTP interaction shapes every resource is built from, plus the
//! action envelope. Callers supply paths and response keys; this layer
//! wraps whatever the server returned and never invents fields.

use super::action::ActionRequest;
use super::model::Resource;
use super::query::{build_list_url, ListQuery};
use crate::sgs::error::{Error, Result};
use crate::sgs::http::SgsHttpClient;
use serde_json::{Map, Value};

/// Path-based resource operations over the HTTP transport
#[derive(Clone)]
pub struct ResourceApi {
    http: SgsHttpClient,
}

impl ResourceApi {
    pub fn new(http: SgsHttpClient) -> Self {
        Self { http }
    }

    /// `POST path` with an already-nested body, returning `response[response_key]`
    pub async fn create(
        &self,
        kind: &'static str,
        path: &str,
        body: Option<&Value>,
        response_key: &str,
    ) -> Result<Resource> {
        tracing::info!("create {} at {}", kind, path);
        let response = self.http.post(path, body).await?;
        wrap(kind, required(response, path)?, response_key)
    }

    /// `GET path`, selecting a configuration session when one is given
    pub async fn get(
        &self,
        kind: &'static str,
        path: &str,
        response_key: &str,
        session_id: Option<&str>,
    ) -> Result<Resource> {
        let response = self.http.get(path, session_id).await?;
        wrap(kind, required(response, path)?, response_key)
    }

    /// `GET /{resource_type}?...`, returning the collection under `resource_type`
    ///
    /// The query is validated before anything is sent.
    pub async fn list(
        &self,
        kind: &'static str,
        resource_type: &str,
        query: &ListQuery,
        extra_sort_keys: &[&str],
    ) -> Result<Vec<Resource>> {
        let url = build_list_url(resource_type, query, extra_sort_keys)?;
        let mut body = required(self.http.get(&url, None).await?, &url)?;

        let items = match body.get_mut(resource_type).map(Value::take) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(Error::Decode(format!(
                    "'{}' in list response is not an array",
                    resource_type
                )))
            }
            None => return Err(missing_key(resource_type)),
        };

        let resources = items
            .into_iter()
            .map(|item| Resource::from_value(kind, item))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("listed {} {}", resources.len(), resource_type);
        Ok(resources)
    }

    /// `PUT path` with `{response_key: fields}`
    ///
    /// An empty field set is a no-op: nothing is sent and nothing returned.
    pub async fn update(
        &self,
        kind: &'static str,
        path: &str,
        fields: Map<String, Value>,
        response_key: &str,
    ) -> Result<Option<Resource>> {
        if fields.is_empty() {
            tracing::debug!("update of {} skipped, no fields given", path);
            return Ok(None);
        }

        tracing::info!("update {} at {}", kind, path);
        let mut body = Map::new();
        body.insert(response_key.to_string(), Value::Object(fields));

        match self.http.put(path, &Value::Object(body)).await? {
            Some(response) => wrap(kind, response, response_key).map(Some),
            None => Ok(None),
        }
    }

    /// `DELETE path`
    pub async fn delete(&self, path: &str) -> Result<()> {
        tracing::info!("delete {}", path);
        self.http.delete(path).await
    }

    /// `POST path` with the action envelope
    ///
    /// Returns the resource under the action's response key when the action
    /// declares one and the server sent a body back.
    pub async fn action<A: ActionRequest + ?Sized>(
        &self,
        kind: &'static str,
        path: &str,
        action: &A,
    ) -> Result<Option<Resource>> {
        tracing::info!("action {} on {}", action.name(), path);
        let response = self.http.post(path, Some(&action.envelope()?)).await?;

        match (action.response_key(), response) {
            (Some(key), Some(body)) => wrap(kind, body, key).map(Some),
            _ => Ok(None),
        }
    }
}

fn required(response: Option<Value>, path: &str) -> Result<Value> {
    response.ok_or_else(|| Error::Decode(format!("empty response from {}", path)))
}

fn missing_key(key: &str) -> Error {
    Error::Decode(format!("response has no '{}' key", key))
}

/// Wrap `body[key]` as a resource
fn wrap(kind: &'static str, mut body: Value, key: &str) -> Result<Resource> {
    match body.get_mut(key).map(Value::take) {
        Some(value) => Resource::from_value(kind, value),
        None => Err(missing_key(key)),
    }
}
