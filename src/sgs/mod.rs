//! Storage-gateway API interaction module
//!
//! - [`client`] - Main client handing out resource managers
//! - [`http`] - HTTP transport for REST API calls
//! - [`error`] - Error taxonomy shared by every layer
//!
//! # Example
//!
//! ```no_run
//! use sgsclient::{Client, ClientConfig};
//!
//! async fn example() -> sgsclient::Result<()> {
//!     let client = Client::new(&ClientConfig::new("http://controller:8975/v1/demo"))?;
//!     let volume = client.volumes().get("c1b6c0f2", None).await?;
//!     println!("{}", volume);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
