//! HTTP utilities for storage-gateway REST API calls

use super::error::{sanitize, Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

/// Header carrying the auth token
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// Header used to correlate requests across services
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-openstack-request-id");

/// Header selecting a multi-step configuration session
pub const SESSION_HEADER: HeaderName = HeaderName::from_static("x-configuration-session");

const USER_AGENT: &str = concat!("sgsclient/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper for storage-gateway API calls
#[derive(Clone)]
pub struct SgsHttpClient {
    client: Client,
    endpoint: String,
}

impl SgsHttpClient {
    /// Create a new HTTP client
    ///
    /// Every request carries the auth token and the request id, when given.
    pub fn new(
        endpoint: &str,
        auth_token: Option<&str>,
        request_id: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            let mut value = header_value(token)?;
            value.set_sensitive(true);
            headers.insert(AUTH_TOKEN_HEADER, value);
        }
        if let Some(id) = request_id {
            headers.insert(REQUEST_ID_HEADER, header_value(id)?);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Connection(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Base endpoint all paths are appended to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Make a GET request, optionally selecting a configuration session
    pub async fn get(&self, path: &str, session_id: Option<&str>) -> Result<Option<Value>> {
        let mut headers = HeaderMap::new();
        if let Some(session) = session_id {
            headers.insert(SESSION_HEADER, header_value(session)?);
        }
        self.json_request(Method::GET, path, None, headers).await
    }

    /// Make a POST request with an optional JSON body
    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        self.json_request(Method::POST, path, body, HeaderMap::new())
            .await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.json_request(Method::PUT, path, Some(body), HeaderMap::new())
            .await
    }

    /// Make a DELETE request
    ///
    /// Any 2xx answer is success; the body is not inspected.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, None, HeaderMap::new())
            .await
            .map(|_| ())
    }

    /// Issue a request and parse the JSON body, `None` when the body is empty
    pub async fn json_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<Option<Value>> {
        let text = self.send(method, path, body, headers).await?;

        if text.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| Error::Decode(format!("failed to parse response JSON: {}", e)))?;
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<String> {
        let url = format!("{}{}", self.endpoint, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method, url, e);
            Error::Connection(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Decode(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            // Only the sanitized/truncated body reaches the log
            tracing::error!("API error: {} {} - {} - {}", method, url, status, sanitize(&text));
            return Err(Error::from_status(status, &text));
        }

        tracing::trace!("{} {} -> {}", method, url, status);
        Ok(text)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::InvalidInput(format!("'{}' is not a valid header value", value)))
}
