//! Shell Integration
//!
//! Command table for the `sgs` binary. Every resource argument accepts a
//! name or an id; see [`commands::Shell`] for dispatch.

pub mod commands;
pub mod print;

pub use commands::Shell;
pub use print::OutputFormat;

use clap::{ArgAction, Args, Subcommand};

/// Filters and paging shared by every list command
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Show resources of all tenants (admin only)
    #[arg(long)]
    pub all_tenants: bool,

    /// Show resources of the given tenant (admin only)
    #[arg(long, value_name = "TENANT")]
    pub tenant: Option<String>,

    /// Filter by name
    #[arg(long)]
    pub name: Option<String>,

    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,

    /// Begin after the resource with this id
    #[arg(long)]
    pub marker: Option<String>,

    /// Maximum number of resources to return
    #[arg(long)]
    pub limit: Option<u32>,

    /// Comma-separated list of `key[:asc|desc]`
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort key (deprecated, use --sort)
    #[arg(long)]
    pub sort_key: Option<String>,

    /// Sort direction (deprecated, use --sort)
    #[arg(long)]
    pub sort_dir: Option<String>,

    /// Use the detailed listing
    #[arg(long)]
    pub detail: bool,
}

/// Name, description and metadata of an update
#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// Metadata as a key=value pair, repeatable
    #[arg(long, value_name = "KEY=VALUE", action = ArgAction::Append)]
    pub metadata: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    // =========================================================================
    // Volumes
    // =========================================================================
    /// List volumes
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by replication
        #[arg(long)]
        replication_id: Option<String>,
    },

    /// Show a volume
    #[command(visible_alias = "get")]
    Show { volume: String },

    /// Create a volume
    Create {
        /// Size in GiB
        #[arg(long)]
        size: Option<u64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Create from a snapshot
        #[arg(long)]
        snapshot_id: Option<String>,
        /// Create from a replication checkpoint
        #[arg(long)]
        checkpoint_id: Option<String>,
        #[arg(long)]
        volume_type: Option<String>,
        #[arg(long)]
        availability_zone: Option<String>,
        /// Existing backend volume to manage
        #[arg(long)]
        volume_id: Option<String>,
    },

    /// Update a volume's name, description or metadata
    Update {
        volume: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Delete one or more volumes
    Delete {
        #[arg(required = true)]
        volumes: Vec<String>,
    },

    /// Enable SG on a volume
    EnableSg {
        volume: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Disable SG on a volume
    DisableSg { volume: String },

    /// Add attachment metadata to a volume
    Attach {
        volume: String,
        instance_uuid: String,
        /// Access mode: rw or ro
        #[arg(long, default_value = "rw")]
        mode: String,
    },

    /// Clear attachment metadata
    Detach {
        volume: String,
        #[arg(long)]
        instance_uuid: Option<String>,
    },

    /// Mark a volume as reserved before attach
    Reserve { volume: String },

    /// Unmark a reserved volume
    Unreserve { volume: String },

    /// Initialize a volume attachment
    InitializeConnection {
        volume: String,
        /// Connector property as a key=value pair, repeatable
        #[arg(long, value_name = "KEY=VALUE", action = ArgAction::Append)]
        connector: Vec<String>,
    },

    /// Set volume status to 'detaching'
    BeginDetaching { volume: String },

    /// Roll volume status back to 'in-use'
    RollDetaching { volume: String },

    /// Explicitly set the state of one or more volumes
    ResetState {
        #[arg(required = true)]
        volumes: Vec<String>,
        #[arg(long, default_value = "available")]
        state: String,
    },

    // =========================================================================
    // Volume replicates
    // =========================================================================
    /// Create a volume's replicate
    ReplicateCreate {
        volume: String,
        peer_volume: String,
        #[arg(long)]
        replication_id: String,
        /// master or slave
        #[arg(long, default_value = "master")]
        mode: String,
    },

    /// Enable a volume's replicate
    ReplicateEnable { volume: String },

    /// Disable a volume's replicate
    ReplicateDisable { volume: String },

    /// Delete a volume's replicate
    ReplicateDelete { volume: String },

    /// Fail over a volume's replicate
    ReplicateFailover {
        volume: String,
        #[arg(long)]
        checkpoint_id: Option<String>,
        #[arg(long)]
        force: bool,
    },

    /// Reverse a volume's replicate
    ReplicateReverse { volume: String },

    // =========================================================================
    // Snapshots
    // =========================================================================
    /// Create a snapshot
    SnapshotCreate {
        volume: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        checkpoint_id: Option<String>,
    },

    /// List snapshots
    SnapshotList {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        volume_id: Option<String>,
    },

    /// Show a snapshot
    SnapshotShow { snapshot: String },

    /// Update a snapshot
    SnapshotUpdate {
        snapshot: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Delete one or more snapshots
    SnapshotDelete {
        #[arg(required = true)]
        snapshots: Vec<String>,
    },

    // =========================================================================
    // Backups
    // =========================================================================
    /// Create a backup
    BackupCreate {
        volume: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// full or incremental
        #[arg(long = "type", default_value = "full")]
        backup_type: String,
        /// local or remote
        #[arg(long, default_value = "local")]
        destination: String,
    },

    /// List backups
    BackupList {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        volume_id: Option<String>,
    },

    /// Show a backup
    BackupShow { backup: String },

    /// Update a backup
    BackupUpdate {
        backup: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Delete one or more backups
    BackupDelete {
        #[arg(required = true)]
        backups: Vec<String>,
    },

    /// Restore a backup into a volume
    BackupRestore { backup: String, volume: String },

    /// Export a backup record
    BackupExport { backup: String },

    /// Import a backup record exported with backup-export
    BackupImport {
        /// The record as a JSON object
        backup_record: String,
    },

    /// Explicitly set the state of one or more backups
    BackupResetState {
        #[arg(required = true)]
        backups: Vec<String>,
        #[arg(long, default_value = "available")]
        state: String,
    },

    // =========================================================================
    // Replications
    // =========================================================================
    /// Create a replication
    ReplicationCreate {
        master_volume: String,
        slave_volume: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List replications
    ReplicationList {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show a replication
    ReplicationShow { replication: String },

    /// Update a replication
    ReplicationUpdate {
        replication: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Delete one or more replications
    ReplicationDelete {
        #[arg(required = true)]
        replications: Vec<String>,
    },

    /// Enable a replication
    ReplicationEnable { replication: String },

    /// Disable a replication
    ReplicationDisable { replication: String },

    /// Fail over a replication
    ReplicationFailover {
        replication: String,
        #[arg(long)]
        force: bool,
    },

    /// Reverse a replication
    ReplicationReverse { replication: String },

    /// Explicitly set the state of one or more replications
    ReplicationResetState {
        #[arg(required = true)]
        replications: Vec<String>,
        #[arg(long, default_value = "enabled")]
        state: String,
    },

    // =========================================================================
    // Checkpoints
    // =========================================================================
    /// Create a checkpoint
    CheckpointCreate {
        replication: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List checkpoints
    CheckpointList {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        replication_id: Option<String>,
    },

    /// Show a checkpoint
    CheckpointShow { checkpoint: String },

    /// Update a checkpoint
    CheckpointUpdate {
        checkpoint: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Delete one or more checkpoints
    CheckpointDelete {
        #[arg(required = true)]
        checkpoints: Vec<String>,
    },

    /// Roll a replication back to a checkpoint
    CheckpointRollback { checkpoint: String },
}
