//! SGS Client
//!
//! Main client for the storage-gateway v1 API, handing out one manager per
//! resource kind over a shared HTTP transport.

use super::error::{Error, Result};
use super::http::SgsHttpClient;
use crate::resource::{Manager, ResourceApi};
use crate::v1::{
    BackupManager, CheckpointManager, ReplicateManager, ReplicationManager, SnapshotManager,
    VolumeManager,
};
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for a [`Client`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service endpoint, e.g. `http://controller:8975/v1/<project>`
    pub endpoint: String,
    /// Pre-issued token sent as `X-Auth-Token`
    pub auth_token: Option<String>,
    /// Request id sent with every call
    pub request_id: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: None,
            request_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate a fresh `req-<uuid>` id
    pub fn generate_request_id() -> String {
        format!("req-{}", uuid::Uuid::new_v4())
    }
}

/// Main storage-gateway client
#[derive(Clone)]
pub struct Client {
    api: ResourceApi,
}

impl Client {
    /// Create a new client
    ///
    /// Fails with [`Error::InvalidInput`] when the endpoint is not an
    /// absolute http(s) URL.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let parsed = url::Url::parse(&config.endpoint).map_err(|e| {
            Error::InvalidInput(format!("invalid endpoint '{}': {}", config.endpoint, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidInput(format!(
                "endpoint '{}' must use http or https",
                config.endpoint
            )));
        }

        let http = SgsHttpClient::new(
            &config.endpoint,
            config.auth_token.as_deref(),
            config.request_id.as_deref(),
            config.timeout,
        )?;
        tracing::debug!("Client created for {}", http.endpoint());

        Ok(Self {
            api: ResourceApi::new(http),
        })
    }

    pub fn volumes(&self) -> VolumeManager {
        Manager::new(self.api.clone())
    }

    pub fn snapshots(&self) -> SnapshotManager {
        Manager::new(self.api.clone())
    }

    pub fn backups(&self) -> BackupManager {
        Manager::new(self.api.clone())
    }

    pub fn replications(&self) -> ReplicationManager {
        Manager::new(self.api.clone())
    }

    pub fn checkpoints(&self) -> CheckpointManager {
        Manager::new(self.api.clone())
    }

    /// Volume-replicate sub-resource actions
    pub fn replicates(&self) -> ReplicateManager {
        ReplicateManager::new(self.api.clone())
    }
}
