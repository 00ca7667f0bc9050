//! Resource abstraction layer
//!
//! Every storage-gateway resource is driven through the same contract:
//!
//! - [`model`] - The [`Resource`] wrapper over a server JSON object
//! - [`query`] - List filters, pagination and sorting
//! - [`action`] - Typed `{"<action>": ...}` request envelopes
//! - [`api`] - Path-based create/get/list/update/delete/action calls
//! - [`manager`] - [`Manager`] binding the contract to one resource kind
//! - [`find`] - Name-or-id lookup
//!
//! # Example
//!
//! ```no_run
//! use sgsclient::resource::{find_resource, ListQuery};
//! use sgsclient::Client;
//!
//! async fn example(client: &Client) -> sgsclient::Result<()> {
//!     let volumes = client.volumes();
//!     let page = volumes.list(&ListQuery::new().limit(10).sort("name:asc")).await?;
//!     let data = find_resource(&volumes, "data").await?;
//!     println!("{} volumes, data is {:?}", page.len(), data.status());
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod api;
pub mod find;
pub mod manager;
pub mod model;
pub mod query;

pub use action::{params_of, ActionRequest, NoAction};
pub use api::ResourceApi;
pub use find::{find_id, find_resource};
pub use manager::{Manager, ResourceKind, UpdateFields};
pub use model::Resource;
pub use query::{build_list_url, ListQuery};
