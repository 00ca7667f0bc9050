//! Command Dispatch
//!
//! Runs one parsed [`Command`] against a [`Client`] and writes the result to
//! the shell's output.

use super::print::{self, Column, OutputFormat};
use super::{Command, ListArgs, UpdateArgs};
use crate::resource::{find_id, find_resource, ListQuery, Manager, Resource, ResourceKind, UpdateFields};
use crate::sgs::client::Client;
use crate::sgs::error::{Error, Result};
use crate::v1::{
    AttachMode, BackupAction, BackupCreate, BackupDestination, BackupType, CheckpointCreate,
    ReplicateMode, ReplicationAction, ReplicationCreate, SnapshotCreate, StatusReset,
    VolumeAction, VolumeCreate, VolumeEnable,
};
use serde_json::{Map, Value};
use std::io::Write;

/// Executes commands and prints their results
pub struct Shell<W> {
    client: Client,
    format: OutputFormat,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(client: Client, format: OutputFormat, out: W) -> Self {
        Self {
            client,
            format,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        tracing::debug!("Running {:?}", command);
        let client = self.client.clone();

        match command {
            // =================================================================
            // Volumes
            // =================================================================
            Command::List {
                list,
                replication_id,
            } => {
                let query = list_query(&list).filter_opt("replication_id", replication_id);
                let volumes = client.volumes().list(&query).await?;
                self.print_list(&volumes, print::VOLUME_COLUMNS)
            }
            Command::Show { volume } => {
                let volume = find_resource(&client.volumes(), &volume).await?;
                self.print_dict(&volume)
            }
            Command::Create {
                size,
                name,
                description,
                snapshot_id,
                checkpoint_id,
                volume_type,
                availability_zone,
                volume_id,
            } => {
                let body = VolumeCreate {
                    name,
                    snapshot_id,
                    checkpoint_id,
                    description,
                    volume_type,
                    availability_zone,
                    volume_id,
                    size,
                };
                let volume = client.volumes().create(&body).await?;
                self.print_dict(&volume)
            }
            Command::Update { volume, fields } => self.update(&client.volumes(), &volume, fields).await,
            Command::Delete { volumes } => self.delete_many(&client.volumes(), &volumes).await,
            Command::EnableSg { volume, fields } => {
                let volumes = client.volumes();
                let id = find_id(&volumes, &volume).await?;
                let params = VolumeEnable {
                    name: fields.name,
                    description: fields.description,
                    metadata: parse_metadata(&fields.metadata)?,
                };
                let volume = volumes.enable(&id, params).await?;
                self.print_optional(volume.as_ref())
            }
            Command::DisableSg { volume } => {
                let volumes = client.volumes();
                let id = find_id(&volumes, &volume).await?;
                let volume = volumes.disable(&id).await?;
                self.print_optional(volume.as_ref())
            }
            Command::Attach {
                volume,
                instance_uuid,
                mode,
            } => {
                let mode: AttachMode = mode.parse()?;
                let volumes = client.volumes();
                let id = find_id(&volumes, &volume).await?;
                let attachment = volumes.attach(&id, &instance_uuid, mode).await?;
                self.print_optional(attachment.as_ref())
            }
            Command::Detach {
                volume,
                instance_uuid,
            } => {
                let volumes = client.volumes();
                let id = find_id(&volumes, &volume).await?;
                volumes.detach(&id, instance_uuid.as_deref()).await
            }
            Command::Reserve { volume } => {
                let volumes = client.volumes();
                let id = find_id(&volumes, &volume).await?;
                volumes.reserve(&id).await
            }
            Command::Unreserve { volume } => {
                let volumes = client.volumes();
                let id = find_id(&volumes, &volume).await?;
                volumes.unreserve(&id).await
            }
            Command::InitializeConnection { volume, connector } => {
                let connector = parse_metadata(&connector)?;
                let volumes = client.volumes();
                let id = find_id(&volumes, &volume).await?;
                let info = volumes.initialize_connection(&id, connector).await?;
                self.print_optional(info.as_ref())
            }
            Command::BeginDetaching { volume } => {
                let volumes = client.volumes();
                let id = find_id(&volumes, &volume).await?;
                volumes.begin_detaching(&id).await
            }
            Command::RollDetaching { volume } => {
                let volumes = client.volumes();
                let id = find_id(&volumes, &volume).await?;
                volumes.roll_detaching(&id).await
            }
            Command::ResetState { volumes, state } => {
                self.reset_many(&client.volumes(), &volumes, &state, VolumeAction::ResetStatus)
                    .await
            }

            // =================================================================
            // Volume replicates
            // =================================================================
            Command::ReplicateCreate {
                volume,
                peer_volume,
                replication_id,
                mode,
            } => {
                let mode: ReplicateMode = mode.parse()?;
                let id = find_id(&client.volumes(), &volume).await?;
                let replicate = client
                    .replicates()
                    .create(&id, mode, &replication_id, &peer_volume)
                    .await?;
                self.print_optional(replicate.as_ref())
            }
            Command::ReplicateEnable { volume } => {
                let id = find_id(&client.volumes(), &volume).await?;
                let replicate = client.replicates().enable(&id).await?;
                self.print_optional(replicate.as_ref())
            }
            Command::ReplicateDisable { volume } => {
                let id = find_id(&client.volumes(), &volume).await?;
                let replicate = client.replicates().disable(&id).await?;
                self.print_optional(replicate.as_ref())
            }
            Command::ReplicateDelete { volume } => {
                let id = find_id(&client.volumes(), &volume).await?;
                client.replicates().delete(&id).await?;
                writeln!(
                    self.out,
                    "Request to delete volume {} replicate has been accepted.",
                    volume
                )?;
                Ok(())
            }
            Command::ReplicateFailover {
                volume,
                checkpoint_id,
                force,
            } => {
                let id = find_id(&client.volumes(), &volume).await?;
                let replicate = client
                    .replicates()
                    .failover(&id, checkpoint_id.as_deref(), force)
                    .await?;
                self.print_optional(replicate.as_ref())
            }
            Command::ReplicateReverse { volume } => {
                let id = find_id(&client.volumes(), &volume).await?;
                let replicate = client.replicates().reverse(&id).await?;
                self.print_optional(replicate.as_ref())
            }

            // =================================================================
            // Snapshots
            // =================================================================
            Command::SnapshotCreate {
                volume,
                name,
                description,
                checkpoint_id,
            } => {
                let volume_id = find_id(&client.volumes(), &volume).await?;
                let body = SnapshotCreate {
                    name,
                    description,
                    checkpoint_id,
                    ..SnapshotCreate::new(volume_id)
                };
                let snapshot = client.snapshots().create(&body).await?;
                self.print_dict(&snapshot)
            }
            Command::SnapshotList { list, volume_id } => {
                let query = list_query(&list).filter_opt("volume_id", volume_id);
                let snapshots = client.snapshots().list(&query).await?;
                self.print_list(&snapshots, print::SNAPSHOT_COLUMNS)
            }
            Command::SnapshotShow { snapshot } => {
                let snapshot = find_resource(&client.snapshots(), &snapshot).await?;
                self.print_dict(&snapshot)
            }
            Command::SnapshotUpdate { snapshot, fields } => {
                self.update(&client.snapshots(), &snapshot, fields).await
            }
            Command::SnapshotDelete { snapshots } => {
                self.delete_many(&client.snapshots(), &snapshots).await
            }

            // =================================================================
            // Backups
            // =================================================================
            Command::BackupCreate {
                volume,
                name,
                description,
                backup_type,
                destination,
            } => {
                let backup_type: BackupType = backup_type.parse()?;
                let destination: BackupDestination = destination.parse()?;
                let volume_id = find_id(&client.volumes(), &volume).await?;
                let body = BackupCreate {
                    name,
                    description,
                    backup_type,
                    destination,
                    ..BackupCreate::new(volume_id)
                };
                let backup = client.backups().create(&body).await?;
                self.print_dict(&backup)
            }
            Command::BackupList { list, volume_id } => {
                let query = list_query(&list).filter_opt("volume_id", volume_id);
                let backups = client.backups().list(&query).await?;
                self.print_list(&backups, print::BACKUP_COLUMNS)
            }
            Command::BackupShow { backup } => {
                let backup = find_resource(&client.backups(), &backup).await?;
                self.print_dict(&backup)
            }
            Command::BackupUpdate { backup, fields } => {
                self.update(&client.backups(), &backup, fields).await
            }
            Command::BackupDelete { backups } => self.delete_many(&client.backups(), &backups).await,
            Command::BackupRestore { backup, volume } => {
                let backup_id = find_id(&client.backups(), &backup).await?;
                let volume_id = find_id(&client.volumes(), &volume).await?;
                let restore = client.backups().restore(&backup_id, &volume_id).await?;
                self.print_optional(restore.as_ref())
            }
            Command::BackupExport { backup } => {
                let backups = client.backups();
                let id = find_id(&backups, &backup).await?;
                let record = backups.export_record(&id).await?;
                self.print_optional(record.as_ref())
            }
            Command::BackupImport { backup_record } => {
                let record = parse_object("backup record", &backup_record)?;
                let backup = client.backups().import_record(record).await?;
                self.print_dict(&backup)
            }
            Command::BackupResetState { backups, state } => {
                self.reset_many(&client.backups(), &backups, &state, BackupAction::ResetStatus)
                    .await
            }

            // =================================================================
            // Replications
            // =================================================================
            Command::ReplicationCreate {
                master_volume,
                slave_volume,
                name,
                description,
            } => {
                let master = find_id(&client.volumes(), &master_volume).await?;
                let slave = find_id(&client.volumes(), &slave_volume).await?;
                let body = ReplicationCreate {
                    name,
                    description,
                    ..ReplicationCreate::new(master, slave)
                };
                let replication = client.replications().create(&body).await?;
                self.print_dict(&replication)
            }
            Command::ReplicationList { list } => {
                let replications = client.replications().list(&list_query(&list)).await?;
                self.print_list(&replications, print::REPLICATION_COLUMNS)
            }
            Command::ReplicationShow { replication } => {
                let replication = find_resource(&client.replications(), &replication).await?;
                self.print_dict(&replication)
            }
            Command::ReplicationUpdate {
                replication,
                fields,
            } => self.update(&client.replications(), &replication, fields).await,
            Command::ReplicationDelete { replications } => {
                self.delete_many(&client.replications(), &replications)
                    .await
            }
            Command::ReplicationEnable { replication } => {
                let replications = client.replications();
                let id = find_id(&replications, &replication).await?;
                let replication = replications.enable(&id).await?;
                self.print_optional(replication.as_ref())
            }
            Command::ReplicationDisable { replication } => {
                let replications = client.replications();
                let id = find_id(&replications, &replication).await?;
                let replication = replications.disable(&id).await?;
                self.print_optional(replication.as_ref())
            }
            Command::ReplicationFailover { replication, force } => {
                let replications = client.replications();
                let id = find_id(&replications, &replication).await?;
                let replication = replications.failover(&id, force).await?;
                self.print_optional(replication.as_ref())
            }
            Command::ReplicationReverse { replication } => {
                let replications = client.replications();
                let id = find_id(&replications, &replication).await?;
                let replication = replications.reverse(&id).await?;
                self.print_optional(replication.as_ref())
            }
            Command::ReplicationResetState {
                replications,
                state,
            } => {
                self.reset_many(
                    &client.replications(),
                    &replications,
                    &state,
                    ReplicationAction::ResetStatus,
                )
                .await
            }

            // =================================================================
            // Checkpoints
            // =================================================================
            Command::CheckpointCreate {
                replication,
                name,
                description,
            } => {
                let replication_id = find_id(&client.replications(), &replication).await?;
                let body = CheckpointCreate {
                    name,
                    description,
                    ..CheckpointCreate::new(replication_id)
                };
                let checkpoint = client.checkpoints().create(&body).await?;
                self.print_dict(&checkpoint)
            }
            Command::CheckpointList {
                list,
                replication_id,
            } => {
                let query = list_query(&list).filter_opt("replication_id", replication_id);
                let checkpoints = client.checkpoints().list(&query).await?;
                self.print_list(&checkpoints, print::CHECKPOINT_COLUMNS)
            }
            Command::CheckpointShow { checkpoint } => {
                let checkpoint = find_resource(&client.checkpoints(), &checkpoint).await?;
                self.print_dict(&checkpoint)
            }
            Command::CheckpointUpdate { checkpoint, fields } => {
                self.update(&client.checkpoints(), &checkpoint, fields).await
            }
            Command::CheckpointDelete { checkpoints } => {
                self.delete_many(&client.checkpoints(), &checkpoints).await
            }
            Command::CheckpointRollback { checkpoint } => {
                let checkpoints = client.checkpoints();
                let id = find_id(&checkpoints, &checkpoint).await?;
                let rollback = checkpoints.rollback(&id).await?;
                self.print_dict(&rollback)
            }
        }
    }

    // =========================================================================
    // Shared command bodies
    // =========================================================================

    async fn update<K: ResourceKind>(
        &mut self,
        manager: &Manager<K>,
        reference: &str,
        args: UpdateArgs,
    ) -> Result<()> {
        let fields = UpdateFields {
            name: args.name,
            description: args.description,
            metadata: parse_metadata(&args.metadata)?,
        };
        if fields.is_empty() {
            return Err(Error::InvalidInput(
                "Must supply at least one of --name, --description or --metadata.".to_string(),
            ));
        }
        let id = find_id(manager, reference).await?;
        let updated = manager.update(&id, &fields).await?;
        self.print_optional(updated.as_ref())
    }

    /// Delete every reference, continuing past failures
    ///
    /// Fails only when no deletion was accepted.
    async fn delete_many<K: ResourceKind>(
        &mut self,
        manager: &Manager<K>,
        references: &[String],
    ) -> Result<()> {
        let kind = manager.kind().to_lowercase();
        let mut failures = 0;

        for reference in references {
            let result = match find_id(manager, reference).await {
                Ok(id) => manager.delete(&id).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => writeln!(
                    self.out,
                    "Request to delete {} {} has been accepted.",
                    kind, reference
                )?,
                Err(e) => {
                    failures += 1;
                    tracing::warn!("Delete for {} {} failed: {}", kind, reference, e);
                    writeln!(self.out, "Delete for {} {} failed: {}", kind, reference, e)?;
                }
            }
        }

        if failures == references.len() {
            return Err(Error::Command(format!(
                "Unable to delete any of the specified {}.",
                manager.collection()
            )));
        }
        Ok(())
    }

    /// Reset the status of every reference, continuing past failures
    async fn reset_many<K: ResourceKind>(
        &mut self,
        manager: &Manager<K>,
        references: &[String],
        state: &str,
        action: fn(StatusReset) -> K::Action,
    ) -> Result<()> {
        let kind = manager.kind().to_lowercase();
        let mut failures = 0;

        for reference in references {
            let result = match find_id(manager, reference).await {
                Ok(id) => manager.perform(&id, &action(StatusReset::new(state))).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                failures += 1;
                tracing::warn!("Reset state for {} {} failed: {}", kind, reference, e);
                writeln!(self.out, "Reset state for {} {} failed: {}", kind, reference, e)?;
            }
        }

        if failures == references.len() {
            return Err(Error::Command(format!(
                "Unable to reset the state for the specified {}.",
                manager.collection()
            )));
        }
        Ok(())
    }

    fn print_list(&mut self, items: &[Resource], columns: &[Column]) -> Result<()> {
        print::print_list(&mut self.out, items, columns, self.format)
    }

    fn print_dict(&mut self, resource: &Resource) -> Result<()> {
        print::print_dict(&mut self.out, resource, self.format)
    }

    fn print_optional(&mut self, resource: Option<&Resource>) -> Result<()> {
        match resource {
            Some(resource) => self.print_dict(resource),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Argument conversion
// =============================================================================

/// Build the list query shared by every list command
pub fn list_query(args: &ListArgs) -> ListQuery {
    let mut query = ListQuery::new()
        .detailed(args.detail)
        .all_tenants(args.all_tenants || args.tenant.is_some())
        .filter_opt("project_id", args.tenant.clone())
        .filter_opt("name", args.name.clone())
        .filter_opt("status", args.status.clone());

    if let Some(marker) = &args.marker {
        query = query.marker(marker.clone());
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }
    if let Some(sort) = &args.sort {
        query = query.sort(sort.clone());
    }
    if let Some(sort_key) = &args.sort_key {
        query = query.sort_key(sort_key.clone());
    }
    if let Some(sort_dir) = &args.sort_dir {
        query = query.sort_dir(sort_dir.clone());
    }
    query
}

/// Parse `key=value` pairs; no pairs means no metadata
pub fn parse_metadata(pairs: &[String]) -> Result<Option<Map<String, Value>>> {
    if pairs.is_empty() {
        return Ok(None);
    }

    let mut map = Map::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a key=value pair",
                pair
            )));
        };
        if key.is_empty() {
            return Err(Error::InvalidInput(format!("'{}' has an empty key", pair)));
        }
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(Some(map))
}

fn parse_object(what: &str, text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::InvalidInput(format!("{} must be a JSON object", what))),
        Err(e) => Err(Error::InvalidInput(format!("{} is not valid JSON: {}", what, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata() {
        let pairs = vec!["tier=gold".to_string(), "note=a=b".to_string()];
        let map = parse_metadata(&pairs).unwrap().unwrap();
        assert_eq!(map["tier"], "gold");
        assert_eq!(map["note"], "a=b");
        assert_eq!(parse_metadata(&[]).unwrap(), None);
        assert!(matches!(
            parse_metadata(&["novalue".to_string()]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_tenant_implies_all_tenants() {
        let args = ListArgs {
            tenant: Some("p-1".to_string()),
            ..Default::default()
        };
        let params = list_query(&args).params(&[]).unwrap();
        assert_eq!(params.get("all_tenants").map(String::as_str), Some("1"));
        assert_eq!(params.get("project_id").map(String::as_str), Some("p-1"));
    }

    #[test]
    fn test_list_query_passes_paging() {
        let args = ListArgs {
            marker: Some("m".to_string()),
            limit: Some(5),
            sort: Some("name:asc".to_string()),
            detail: true,
            ..Default::default()
        };
        let query = list_query(&args);
        assert!(query.detailed);
        let params = query.params(&[]).unwrap();
        assert_eq!(params.get("limit").map(String::as_str), Some("5"));
        assert_eq!(params.get("marker").map(String::as_str), Some("m"));
        assert_eq!(params.get("sort").map(String::as_str), Some("name:asc"));
    }

    #[test]
    fn test_parse_object_rejects_non_objects() {
        assert!(parse_object("record", r#"{"a": 1}"#).is_ok());
        assert!(matches!(parse_object("record", "[1]"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_object("record", "{"), Err(Error::InvalidInput(_))));
    }
}
