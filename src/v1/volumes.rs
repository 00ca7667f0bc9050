//! Volumes
//!
//! SG-enabled block volumes, the resource every other kind hangs off.

use super::{parse_choice, StatusReset};
use crate::resource::{params_of, ActionRequest, Manager, Resource, ResourceKind};
use crate::sgs::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub struct Volumes;

impl ResourceKind for Volumes {
    const COLLECTION: &'static str = "volumes";
    const KEY: &'static str = "volume";
    const DISPLAY: &'static str = "Volume";
    type Action = VolumeAction;
}

pub type VolumeManager = Manager<Volumes>;

/// Body of a volume create call; absent fields are sent as `null`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeCreate {
    pub name: Option<String>,
    pub snapshot_id: Option<String>,
    pub checkpoint_id: Option<String>,
    pub description: Option<String>,
    pub volume_type: Option<String>,
    pub availability_zone: Option<String>,
    /// Existing backend volume to bring under SG management
    pub volume_id: Option<String>,
    /// Size in GiB
    pub size: Option<u64>,
}

/// Attachment access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AttachMode {
    #[default]
    #[serde(rename = "rw")]
    ReadWrite,
    #[serde(rename = "ro")]
    ReadOnly,
}

impl AttachMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadWrite => "rw",
            Self::ReadOnly => "ro",
        }
    }
}

impl FromStr for AttachMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_choice("attach mode", s, &["rw", "ro"])? {
            "ro" => Ok(Self::ReadOnly),
            _ => Ok(Self::ReadWrite),
        }
    }
}

impl fmt::Display for AttachMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the `enable` action
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeEnable {
    pub name: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachParams {
    pub instance_uuid: String,
    pub mode: AttachMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetachParams {
    pub instance_uuid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorParams {
    pub connector: Map<String, Value>,
}

/// Actions accepted by `/volumes/{id}/action`
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeAction {
    /// Bring the volume under SG management; returns `volume`
    Enable(VolumeEnable),
    /// Release the volume from SG management; returns `volume`
    Disable,
    /// Record attachment metadata; returns `attach`
    Attach(AttachParams),
    /// Clear attachment metadata
    Detach(DetachParams),
    Reserve,
    Unreserve,
    /// Export the volume to a host; returns `connection_info`
    InitializeConnection(Option<ConnectorParams>),
    /// Move status to `detaching`
    BeginDetaching,
    /// Move status back to `in-use`
    RollDetaching,
    ResetStatus(StatusReset),
}

impl ActionRequest for VolumeAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Enable(_) => "enable",
            Self::Disable => "disable",
            Self::Attach(_) => "attach",
            Self::Detach(_) => "detach",
            Self::Reserve => "reserve",
            Self::Unreserve => "unreserve",
            Self::InitializeConnection(_) => "initialize_connection",
            Self::BeginDetaching => "begin_detaching",
            Self::RollDetaching => "roll_detaching",
            Self::ResetStatus(_) => "reset_status",
        }
    }

    fn params(&self) -> Result<Option<Value>> {
        match self {
            Self::Enable(p) => params_of(p),
            Self::Attach(p) => params_of(p),
            Self::Detach(p) => params_of(p),
            Self::InitializeConnection(Some(p)) => params_of(p),
            Self::ResetStatus(p) => params_of(p),
            Self::Disable
            | Self::Reserve
            | Self::Unreserve
            | Self::InitializeConnection(None)
            | Self::BeginDetaching
            | Self::RollDetaching => Ok(None),
        }
    }

    fn response_key(&self) -> Option<&'static str> {
        match self {
            Self::Enable(_) | Self::Disable => Some("volume"),
            Self::Attach(_) => Some("attach"),
            Self::InitializeConnection(_) => Some("connection_info"),
            _ => None,
        }
    }
}

impl Manager<Volumes> {
    pub async fn create(&self, volume: &VolumeCreate) -> Result<Resource> {
        self.create_with(volume).await
    }

    pub async fn enable(&self, volume_id: &str, params: VolumeEnable) -> Result<Option<Resource>> {
        self.perform(volume_id, &VolumeAction::Enable(params)).await
    }

    pub async fn disable(&self, volume_id: &str) -> Result<Option<Resource>> {
        self.perform(volume_id, &VolumeAction::Disable).await
    }

    pub async fn attach(
        &self,
        volume_id: &str,
        instance_uuid: &str,
        mode: AttachMode,
    ) -> Result<Option<Resource>> {
        let params = AttachParams {
            instance_uuid: instance_uuid.to_string(),
            mode,
        };
        self.perform(volume_id, &VolumeAction::Attach(params)).await
    }

    pub async fn detach(&self, volume_id: &str, instance_uuid: Option<&str>) -> Result<()> {
        let params = DetachParams {
            instance_uuid: instance_uuid.map(|s| s.to_string()),
        };
        self.perform(volume_id, &VolumeAction::Detach(params))
            .await
            .map(|_| ())
    }

    pub async fn reserve(&self, volume_id: &str) -> Result<()> {
        self.perform(volume_id, &VolumeAction::Reserve).await.map(|_| ())
    }

    pub async fn unreserve(&self, volume_id: &str) -> Result<()> {
        self.perform(volume_id, &VolumeAction::Unreserve)
            .await
            .map(|_| ())
    }

    pub async fn initialize_connection(
        &self,
        volume_id: &str,
        connector: Option<Map<String, Value>>,
    ) -> Result<Option<Resource>> {
        let params = connector.map(|connector| ConnectorParams { connector });
        self.perform(volume_id, &VolumeAction::InitializeConnection(params))
            .await
    }

    pub async fn begin_detaching(&self, volume_id: &str) -> Result<()> {
        self.perform(volume_id, &VolumeAction::BeginDetaching)
            .await
            .map(|_| ())
    }

    pub async fn roll_detaching(&self, volume_id: &str) -> Result<()> {
        self.perform(volume_id, &VolumeAction::RollDetaching)
            .await
            .map(|_| ())
    }

    pub async fn reset_state(&self, volume_id: &str, state: &str) -> Result<()> {
        self.perform(volume_id, &VolumeAction::ResetStatus(StatusReset::new(state)))
            .await
            .map(|_| ())
    }
}
