//! Turning the layered settings into a connected client.

use anyhow::Context;
use rz_client::RazorClient;
use rz_domain::config::{ClientConfig, RawConfig};

/// Layer the command-line settings over the file settings and resolve them.
///
/// The CLI has nothing to run without the manifest, so `lazy_discovery`
/// from an rc file is overridden here.
pub fn resolve_config(file: RawConfig, cli: RawConfig) -> anyhow::Result<ClientConfig> {
    let config = file.merge(cli).resolve()?;
    if config.lazy_discovery {
        tracing::debug!("ignoring lazy_discovery: the CLI always discovers up front");
    }
    Ok(config.lazy(false))
}

/// Build the client and discover the server's operations.
pub async fn connect(config: &ClientConfig) -> anyhow::Result<RazorClient> {
    RazorClient::new(config)
        .await
        .with_context(|| format!("discovering API at {}:{}", config.hostname, config.port))
}
