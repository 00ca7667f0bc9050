//! Storage-gateway v1 resources
//!
//! One module per resource kind. Each declares its [`ResourceKind`], its
//! create body and its action enum; everything else comes from
//! [`Manager`](crate::resource::Manager).
//!
//! [`ResourceKind`]: crate::resource::ResourceKind

pub mod backups;
pub mod checkpoints;
pub mod replicates;
pub mod replications;
pub mod snapshots;
pub mod volumes;

pub use backups::{BackupAction, BackupCreate, BackupDestination, BackupManager, BackupType, Backups};
pub use checkpoints::{CheckpointCreate, CheckpointManager, Checkpoints};
pub use replicates::{ReplicateAction, ReplicateManager, ReplicateMode};
pub use replications::{ReplicationAction, ReplicationCreate, ReplicationManager, Replications};
pub use snapshots::{SnapshotCreate, SnapshotManager, Snapshots};
pub use volumes::{AttachMode, VolumeAction, VolumeCreate, VolumeEnable, VolumeManager, Volumes};

use crate::sgs::error::{Error, Result};
use serde::Serialize;

/// Parameters of the `reset_status` action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReset {
    pub status: String,
}

impl StatusReset {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

/// Parse `value` as one of `allowed`, reporting the choices on failure
pub(crate) fn parse_choice<'a>(what: &str, value: &str, allowed: &[&'a str]) -> Result<&'a str> {
    allowed
        .iter()
        .find(|candidate| **candidate == value)
        .copied()
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "invalid {} '{}', expected one of: {}",
                what,
                value,
                allowed.join(", ")
            ))
        })
}
