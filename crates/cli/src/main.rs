use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use rz_cli::cli::{parse_invocation, Cli};
use rz_cli::config::load_config;
use rz_cli::session::{connect, resolve_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_cli_tracing();
    let cli = Cli::parse();

    let invocation = parse_invocation(&cli.operation)?;
    let file_config = load_config(cli.config.as_deref())?;
    let config = resolve_config(file_config, cli.raw_config())?;
    let client = connect(&config).await?;

    let output = match invocation.operation {
        None => json!({
            "collections": client.collections(),
            "commands": client.commands(),
        }),
        Some(operation) => client
            .invoke(&operation, invocation.call)
            .await
            .with_context(|| format!("running {operation}"))?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Diagnostics go to stderr so stdout stays pipeable JSON.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
