//! Replications
//!
//! A standing master/slave pairing between two volumes.

use super::StatusReset;
use crate::resource::{params_of, ActionRequest, Manager, Resource, ResourceKind};
use crate::sgs::error::Result;
use serde::Serialize;
use serde_json::Value;

pub struct Replications;

impl ResourceKind for Replications {
    const COLLECTION: &'static str = "replications";
    const KEY: &'static str = "replication";
    const DISPLAY: &'static str = "Replication";
    type Action = ReplicationAction;
}

pub type ReplicationManager = Manager<Replications>;

/// Body of a replication create call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplicationCreate {
    pub name: Option<String>,
    pub master_volume: String,
    pub slave_volume: String,
    pub description: Option<String>,
}

impl ReplicationCreate {
    pub fn new(master_volume: impl Into<String>, slave_volume: impl Into<String>) -> Self {
        Self {
            master_volume: master_volume.into(),
            slave_volume: slave_volume.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FailoverParams {
    pub force: bool,
}

/// Actions accepted by `/replications/{id}/action`
///
/// Every action returns the refreshed `replication` when the server sends a
/// body back.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplicationAction {
    Enable,
    Disable,
    /// Promote the slave; `force` skips the consistency check
    Failover(FailoverParams),
    /// Swap master and slave roles
    Reverse,
    ResetStatus(StatusReset),
}

impl ActionRequest for ReplicationAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Failover(_) => "failover",
            Self::Reverse => "reverse",
            Self::ResetStatus(_) => "reset_status",
        }
    }

    fn params(&self) -> Result<Option<Value>> {
        match self {
            Self::Failover(p) => params_of(p),
            Self::ResetStatus(p) => params_of(p),
            Self::Enable | Self::Disable | Self::Reverse => Ok(None),
        }
    }

    fn response_key(&self) -> Option<&'static str> {
        Some("replication")
    }
}

impl Manager<Replications> {
    pub async fn create(&self, replication: &ReplicationCreate) -> Result<Resource> {
        self.create_with(replication).await
    }

    pub async fn enable(&self, replication_id: &str) -> Result<Option<Resource>> {
        self.perform(replication_id, &ReplicationAction::Enable).await
    }

    pub async fn disable(&self, replication_id: &str) -> Result<Option<Resource>> {
        self.perform(replication_id, &ReplicationAction::Disable).await
    }

    pub async fn failover(&self, replication_id: &str, force: bool) -> Result<Option<Resource>> {
        let action = ReplicationAction::Failover(FailoverParams { force });
        self.perform(replication_id, &action).await
    }

    pub async fn reverse(&self, replication_id: &str) -> Result<Option<Resource>> {
        self.perform(replication_id, &ReplicationAction::Reverse).await
    }

    pub async fn reset_state(&self, replication_id: &str, state: &str) -> Result<Option<Resource>> {
        let action = ReplicationAction::ResetStatus(StatusReset::new(state));
        self.perform(replication_id, &action).await
    }
}
