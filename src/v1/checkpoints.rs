//! Checkpoints
//!
//! Point-in-time markers within a replication. Rolling back to a checkpoint
//! has its own endpoint rather than going through `/action`.

use crate::resource::{Manager, NoAction, Resource, ResourceKind};
use crate::sgs::error::Result;
use serde::Serialize;

pub struct Checkpoints;

impl ResourceKind for Checkpoints {
    const COLLECTION: &'static str = "checkpoints";
    const KEY: &'static str = "checkpoint";
    const DISPLAY: &'static str = "Checkpoint";
    type Action = NoAction;
}

pub type CheckpointManager = Manager<Checkpoints>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckpointCreate {
    pub replication_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CheckpointCreate {
    pub fn new(replication_id: impl Into<String>) -> Self {
        Self {
            replication_id: replication_id.into(),
            ..Default::default()
        }
    }
}

impl Manager<Checkpoints> {
    pub async fn create(&self, checkpoint: &CheckpointCreate) -> Result<Resource> {
        self.create_with(checkpoint).await
    }

    /// `POST /checkpoints/{id}/rollback` without a body; returns `rollback`
    pub async fn rollback(&self, checkpoint_id: &str) -> Result<Resource> {
        let path = format!("{}/rollback", Self::resource_path(checkpoint_id));
        self.api()
            .create(Checkpoints::DISPLAY, &path, None, "rollback")
            .await
    }
}
