//! Snapshots

use crate::resource::{Manager, NoAction, Resource, ResourceKind};
use crate::sgs::error::Result;
use serde::Serialize;

pub struct Snapshots;

impl ResourceKind for Snapshots {
    const COLLECTION: &'static str = "snapshots";
    const KEY: &'static str = "snapshot";
    const DISPLAY: &'static str = "Snapshot";
    type Action = NoAction;
}

pub type SnapshotManager = Manager<Snapshots>;

/// Body of a snapshot create call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotCreate {
    pub volume_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Take the snapshot from a replication checkpoint
    pub checkpoint_id: Option<String>,
}

impl SnapshotCreate {
    pub fn new(volume_id: impl Into<String>) -> Self {
        Self {
            volume_id: volume_id.into(),
            ..Default::default()
        }
    }
}

impl Manager<Snapshots> {
    pub async fn create(&self, snapshot: &SnapshotCreate) -> Result<Resource> {
        self.create_with(snapshot).await
    }
}
