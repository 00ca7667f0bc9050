//! Volume replicates
//!
//! Per-volume replication state, driven entirely through
//! `/volume_replicate/{volume_id}/action`. Results are volume objects
//! returned under the `replicate` key.

use super::parse_choice;
use crate::resource::{params_of, ActionRequest, Resource, ResourceApi};
use crate::sgs::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const KIND: &str = "Volume";

/// Role of the volume in its replication pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplicateMode {
    #[default]
    Master,
    Slave,
}

impl ReplicateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Slave => "slave",
        }
    }
}

impl FromStr for ReplicateMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_choice("replicate mode", s, &["master", "slave"])? {
            "slave" => Ok(Self::Slave),
            _ => Ok(Self::Master),
        }
    }
}

impl fmt::Display for ReplicateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReplicateParams {
    pub mode: ReplicateMode,
    pub replication_id: String,
    pub peer_volume: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailoverReplicateParams {
    pub checkpoint_id: Option<String>,
    pub force: bool,
}

/// Actions accepted by `/volume_replicate/{volume_id}/action`
///
/// All but `delete_replicate` return the volume under `replicate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicateAction {
    Create(CreateReplicateParams),
    Delete,
    Enable,
    Disable,
    Failover(FailoverReplicateParams),
    Reverse,
}

impl ActionRequest for ReplicateAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create_replicate",
            Self::Delete => "delete_replicate",
            Self::Enable => "enable_replicate",
            Self::Disable => "disable_replicate",
            Self::Failover(_) => "failover_replicate",
            Self::Reverse => "reverse_replicate",
        }
    }

    fn params(&self) -> Result<Option<Value>> {
        match self {
            Self::Create(p) => params_of(p),
            Self::Failover(p) => params_of(p),
            Self::Delete | Self::Enable | Self::Disable | Self::Reverse => Ok(None),
        }
    }

    fn response_key(&self) -> Option<&'static str> {
        match self {
            Self::Delete => None,
            _ => Some("replicate"),
        }
    }
}

/// Manager for the volume-replicate sub-resource
#[derive(Clone)]
pub struct ReplicateManager {
    api: ResourceApi,
}

impl ReplicateManager {
    pub fn new(api: ResourceApi) -> Self {
        Self { api }
    }

    pub fn action_path(volume_id: &str) -> String {
        format!("/volume_replicate/{}/action", urlencoding::encode(volume_id))
    }

    async fn perform(&self, volume_id: &str, action: &ReplicateAction) -> Result<Option<Resource>> {
        self.api
            .action(KIND, &Self::action_path(volume_id), action)
            .await
    }

    pub async fn create(
        &self,
        volume_id: &str,
        mode: ReplicateMode,
        replication_id: &str,
        peer_volume: &str,
    ) -> Result<Option<Resource>> {
        let params = CreateReplicateParams {
            mode,
            replication_id: replication_id.to_string(),
            peer_volume: peer_volume.to_string(),
        };
        self.perform(volume_id, &ReplicateAction::Create(params)).await
    }

    pub async fn delete(&self, volume_id: &str) -> Result<()> {
        self.perform(volume_id, &ReplicateAction::Delete)
            .await
            .map(|_| ())
    }

    pub async fn enable(&self, volume_id: &str) -> Result<Option<Resource>> {
        self.perform(volume_id, &ReplicateAction::Enable).await
    }

    pub async fn disable(&self, volume_id: &str) -> Result<Option<Resource>> {
        self.perform(volume_id, &ReplicateAction::Disable).await
    }

    pub async fn failover(
        &self,
        volume_id: &str,
        checkpoint_id: Option<&str>,
        force: bool,
    ) -> Result<Option<Resource>> {
        let params = FailoverReplicateParams {
            checkpoint_id: checkpoint_id.map(|s| s.to_string()),
            force,
        };
        self.perform(volume_id, &ReplicateAction::Failover(params))
            .await
    }

    pub async fn reverse(&self, volume_id: &str) -> Result<Option<Resource>> {
        self.perform(volume_id, &ReplicateAction::Reverse).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_replicate_envelope() {
        let action = ReplicateAction::Create(CreateReplicateParams {
            mode: ReplicateMode::Slave,
            replication_id: "rep-1".to_string(),
            peer_volume: "vol-2".to_string(),
        });
        assert_eq!(
            action.envelope().unwrap(),
            json!({"create_replicate": {"mode": "slave", "replication_id": "rep-1", "peer_volume": "vol-2"}})
        );
    }

    #[test]
    fn test_failover_replicate_envelope() {
        let action = ReplicateAction::Failover(FailoverReplicateParams {
            checkpoint_id: None,
            force: true,
        });
        assert_eq!(
            action.envelope().unwrap(),
            json!({"failover_replicate": {"checkpoint_id": null, "force": true}})
        );
    }

    #[test]
    fn test_delete_returns_nothing() {
        assert_eq!(ReplicateAction::Delete.response_key(), None);
        assert_eq!(ReplicateAction::Reverse.response_key(), Some("replicate"));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("slave".parse::<ReplicateMode>().unwrap(), ReplicateMode::Slave);
        assert!(matches!("primary".parse::<ReplicateMode>(), Err(Error::InvalidInput(_))));
    }
}
