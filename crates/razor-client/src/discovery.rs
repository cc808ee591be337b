//! Discovery: fetch the manifest and bind every entry it lists.

use rz_domain::error::Result;
use rz_domain::trace::TraceEvent;

use crate::binder::Binder;
use crate::manifest::{Manifest, API_PATH};
use crate::registry::Registry;
use crate::resolver::UrlResolver;
use crate::transport::HttpTransport;

/// Names bound by one discovery pass, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// Collection (list operation) names.
    pub collections: Vec<String>,
    /// Sanitized command names.
    pub commands: Vec<String>,
}

/// `GET /api` and parse the result.
pub async fn fetch_manifest(
    transport: &dyn HttpTransport,
    resolver: &UrlResolver,
) -> Result<Manifest> {
    let url = resolver.resolve(API_PATH);
    let body = transport.get(&url, true).await?;
    let manifest = Manifest::from_value(body.into_value())?;

    TraceEvent::ManifestFetched {
        url,
        collections: manifest.collections.len(),
        commands: manifest.commands.len(),
    }
    .emit();

    Ok(manifest)
}

/// Bind collections, then commands, each in manifest order.
///
/// Stops at the first binder error (only possible under the reject
/// collision policy); bindings made before it stay in place.
pub fn bind_manifest(
    manifest: &Manifest,
    binder: &Binder,
    registry: &mut Registry,
) -> Result<Discovered> {
    let mut discovered = Discovered::default();

    for collection in &manifest.collections {
        binder.bind_collection(registry, collection)?;
        discovered.collections.push(collection.name.clone());
    }
    for command in &manifest.commands {
        let name = binder.bind_command(registry, command)?;
        discovered.commands.push(name);
    }

    Ok(discovered)
}

/// Fetch the manifest and bind it. Transport failures propagate
/// unchanged; nothing is retried.
pub async fn discover(
    transport: &dyn HttpTransport,
    resolver: &UrlResolver,
    binder: &Binder,
    registry: &mut Registry,
) -> Result<Discovered> {
    let manifest = fetch_manifest(transport, resolver).await?;
    let discovered = bind_manifest(&manifest, binder, registry)?;

    tracing::info!(
        host = %resolver.netloc(),
        collections = discovered.collections.len(),
        commands = discovered.commands.len(),
        operations = registry.len(),
        "razor API discovered"
    );

    Ok(discovered)
}
