//! Backups
//!
//! Full or incremental copies of a volume, kept locally or on a remote site.
//! Besides the usual CRUD calls a backup can be restored into a volume and
//! its record exported and imported between deployments.

use super::{parse_choice, StatusReset};
use crate::resource::{params_of, ActionRequest, Manager, Resource, ResourceKind};
use crate::sgs::error::{Error, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

pub struct Backups;

impl ResourceKind for Backups {
    const COLLECTION: &'static str = "backups";
    const KEY: &'static str = "backup";
    const DISPLAY: &'static str = "Backup";
    const EXTRA_SORT_KEYS: &'static [&'static str] = &["data_timestamp"];
    type Action = BackupAction;
}

pub type BackupManager = Manager<Backups>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupType {
    #[default]
    Full,
    Incremental,
}

impl BackupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Incremental => "incremental",
        }
    }
}

impl FromStr for BackupType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_choice("backup type", s, &["full", "incremental"])? {
            "incremental" => Ok(Self::Incremental),
            _ => Ok(Self::Full),
        }
    }
}

impl fmt::Display for BackupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the backup data is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupDestination {
    #[default]
    Local,
    Remote,
}

impl BackupDestination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl FromStr for BackupDestination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_choice("backup destination", s, &["local", "remote"])? {
            "remote" => Ok(Self::Remote),
            _ => Ok(Self::Local),
        }
    }
}

impl fmt::Display for BackupDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a backup create call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackupCreate {
    pub volume_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub backup_type: BackupType,
    pub destination: BackupDestination,
}

impl BackupCreate {
    pub fn new(volume_id: impl Into<String>) -> Self {
        Self {
            volume_id: volume_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreParams {
    pub volume_id: String,
}

/// Actions accepted by `/backups/{id}/action`
#[derive(Debug, Clone, PartialEq)]
pub enum BackupAction {
    /// Restore into an existing volume; returns `restore`
    Restore(RestoreParams),
    /// Returns `backup_record`, the portable description of the backup
    ExportRecord,
    ResetStatus(StatusReset),
}

impl ActionRequest for BackupAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Restore(_) => "restore",
            Self::ExportRecord => "export_record",
            Self::ResetStatus(_) => "reset_status",
        }
    }

    fn params(&self) -> Result<Option<Value>> {
        match self {
            Self::Restore(p) => params_of(p),
            Self::ExportRecord => Ok(None),
            Self::ResetStatus(p) => params_of(p),
        }
    }

    fn response_key(&self) -> Option<&'static str> {
        match self {
            Self::Restore(_) => Some("restore"),
            Self::ExportRecord => Some("backup_record"),
            Self::ResetStatus(_) => None,
        }
    }
}

impl Manager<Backups> {
    pub async fn create(&self, backup: &BackupCreate) -> Result<Resource> {
        self.create_with(backup).await
    }

    pub async fn restore(&self, backup_id: &str, volume_id: &str) -> Result<Option<Resource>> {
        let params = RestoreParams {
            volume_id: volume_id.to_string(),
        };
        self.perform(backup_id, &BackupAction::Restore(params)).await
    }

    pub async fn export_record(&self, backup_id: &str) -> Result<Option<Resource>> {
        self.perform(backup_id, &BackupAction::ExportRecord).await
    }

    /// Register a backup exported from another deployment
    pub async fn import_record(&self, backup_record: Map<String, Value>) -> Result<Resource> {
        let body = json!({ "backup_record": backup_record });
        self.api()
            .create(
                Backups::DISPLAY,
                "/backups/import_record",
                Some(&body),
                Backups::KEY,
            )
            .await
    }

    pub async fn reset_state(&self, backup_id: &str, state: &str) -> Result<()> {
        self.perform(backup_id, &BackupAction::ResetStatus(StatusReset::new(state)))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_defaults() {
        let body = serde_json::to_value(BackupCreate::new("vol-1")).unwrap();
        assert_eq!(
            body,
            json!({
                "volume_id": "vol-1",
                "name": null,
                "description": null,
                "type": "full",
                "destination": "local"
            })
        );
    }

    #[test]
    fn test_enum_parsing_rejects_unknown_values() {
        assert_eq!("incremental".parse::<BackupType>().unwrap(), BackupType::Incremental);
        assert_eq!("remote".parse::<BackupDestination>().unwrap(), BackupDestination::Remote);
        assert!(matches!("differential".parse::<BackupType>(), Err(Error::InvalidInput(_))));
        assert!(matches!("cloud".parse::<BackupDestination>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_export_record_envelope() {
        let action = BackupAction::ExportRecord;
        assert_eq!(action.envelope().unwrap(), json!({"export_record": null}));
        assert_eq!(action.response_key(), Some("backup_record"));
    }
}
