//! `rz-client` — a self-configuring client for the Razor provisioning API.
//!
//! Razor publishes its own API surface at `/api`: a manifest of
//! *collections* (nodes, repos, policies, …) and *commands*
//! (create-repo, reboot-node, …), each with a name and a URL. Rather than
//! hard-coding that surface, this crate fetches the manifest at runtime
//! and binds one operation per entry:
//!
//! | Manifest entry        | Operation name          | Request                       |
//! |-----------------------|-------------------------|-------------------------------|
//! | collection `nodes`    | `nodes` (list)          | `GET {id}[/seg/...]`          |
//! | collection `nodes`    | `node` (get)            | `GET {id}/{item}`             |
//! | command `reboot-node` | `reboot_node` (command) | `POST {id}` with a JSON body  |
//!
//! # Usage
//!
//! ```rust,no_run
//! use rz_client::{OperationArgs, RazorClient};
//! use rz_domain::config::ClientConfig;
//!
//! # async fn example() -> rz_domain::error::Result<()> {
//! let client = RazorClient::new(&ClientConfig::new("razor.example.com", 8150u16)).await?;
//!
//! let nodes = client.list("nodes", &[] as &[&str]).await?;
//! let node = client.get("node", "node1").await?;
//! let repo = client
//!     .invoke(
//!         "create_repo",
//!         OperationArgs::new()
//!             .arg("name", "centos")
//!             .arg("iso_url", "http://example.com/centos.iso"),
//!     )
//!     .await?;
//! # let _ = (nodes, node, repo);
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod binder;
pub mod client;
pub mod discovery;
pub mod manifest;
pub mod registry;
pub mod resolver;
pub mod transport;

// Re-exports for convenience.
pub use args::ArgTransformer;
pub use binder::{sanitize_command_name, singularize, Binder};
pub use client::{OperationArgs, RazorClient};
pub use manifest::{CollectionDescriptor, CommandDescriptor, Manifest};
pub use registry::{Binding, OperationKind, Registry};
pub use resolver::UrlResolver;
pub use transport::{HttpTransport, ReqwestTransport, ResponseBody};
