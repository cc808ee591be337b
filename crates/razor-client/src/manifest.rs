//! The discovery document served at `/api`.
//!
//! ```json
//! {
//!   "collections": [{ "name": "nodes", "id": "http://razor:8150/api/collections/nodes" }],
//!   "commands":    [{ "name": "reboot-node", "id": "http://razor:8150/api/commands/reboot-node" }]
//! }
//! ```
//!
//! Razor adds further keys (`rel`, `spec`, `version`); they are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rz_domain::error::{Error, Result};

/// Path of the discovery document on every Razor server.
pub const API_PATH: &str = "/api";

/// A resource set: `name` is the plural label, `id` its base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    pub name: String,
    pub id: String,
}

/// A remote action: `name` may contain hyphens, `id` is the POST target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub collections: Vec<CollectionDescriptor>,
    pub commands: Vec<CommandDescriptor>,
}

impl Manifest {
    /// Parse a discovery response.
    ///
    /// Fails with [`Error::Manifest`] if the document is not an object, if
    /// either `collections` or `commands` is absent, or if an entry lacks
    /// `name`/`id`.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut doc) = value else {
            return Err(Error::Manifest(
                "discovery response is not a JSON object".into(),
            ));
        };

        let collections = doc
            .remove("collections")
            .ok_or_else(|| Error::Manifest("discovery response has no `collections`".into()))?;
        let commands = doc
            .remove("commands")
            .ok_or_else(|| Error::Manifest("discovery response has no `commands`".into()))?;

        let collections = serde_json::from_value(collections)
            .map_err(|e| Error::Manifest(format!("malformed `collections`: {e}")))?;
        let commands = serde_json::from_value(commands)
            .map_err(|e| Error::Manifest(format!("malformed `commands`: {e}")))?;

        Ok(Self {
            collections,
            commands,
        })
    }
}
