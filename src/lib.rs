//! Storage-gateway client
//!
//! Library and `sgs` command-line shell for the storage-gateway (SG) v1 REST
//! API: volumes, snapshots, backups, replications, checkpoints and
//! per-volume replicates.
//!
//! - [`sgs`] - Client, HTTP transport and errors
//! - [`resource`] - Generic resource contract shared by every kind
//! - [`v1`] - Domain managers for the v1 API
//! - [`config`] - Persistent user configuration
//! - [`shell`] - Command table and dispatch for the `sgs` binary

pub mod config;
pub mod resource;
pub mod sgs;
pub mod shell;
pub mod v1;

pub use resource::Resource;
pub use sgs::client::{Client, ClientConfig};
pub use sgs::error::{Error, Result};
