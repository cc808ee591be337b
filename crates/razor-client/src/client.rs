//! `RazorClient`: owns the registry for one server and dispatches
//! invocations of the operations bound into it.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use rz_domain::config::ClientConfig;
use rz_domain::error::{Error, Result};
use rz_domain::trace::TraceEvent;

use crate::args::ArgTransformer;
use crate::binder::Binder;
use crate::discovery;
use crate::registry::{Binding, OperationKind, Registry};
use crate::resolver::{join, UrlResolver};
use crate::transport::{HttpTransport, ReqwestTransport, ResponseBody};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// OperationArgs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Arguments for a dynamically bound operation.
///
/// List operations take any number of `segments`, get operations exactly
/// one, commands none. Only commands accept keyword `args`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationArgs {
    pub segments: Vec<String>,
    pub args: Map<String, Value>,
}

impl OperationArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RazorClient
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A client for one Razor server.
///
/// Discovery needs `&mut self`; invocation only `&self`, so a discovered
/// client can be shared behind an `Arc`.
pub struct RazorClient {
    resolver: UrlResolver,
    transport: Arc<dyn HttpTransport>,
    registry: Registry,
    binder: Binder,
    transformer: ArgTransformer,
    collections: BTreeSet<String>,
    commands: BTreeSet<String>,
}

impl std::fmt::Debug for RazorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorClient")
            .field("resolver", &self.resolver)
            .field("registry", &self.registry)
            .field("binder", &self.binder)
            .field("transformer", &self.transformer)
            .finish_non_exhaustive()
    }
}

impl RazorClient {
    /// Build a client over HTTP and, unless `config.lazy_discovery`,
    /// discover the server's operations before returning.
    pub async fn new(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Self::with_transport(config, Arc::new(transport)).await
    }

    /// Like [`RazorClient::new`] over a caller-supplied transport.
    pub async fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let mut client = Self {
            resolver: UrlResolver::new(config.hostname.clone(), config.port.clone()),
            transport,
            registry: Registry::new(),
            binder: Binder::new(config.collision_policy),
            transformer: ArgTransformer::with_extra(config.arg_renames.clone())?,
            collections: BTreeSet::new(),
            commands: BTreeSet::new(),
        };

        if !config.lazy_discovery {
            client.discover().await?;
        }
        Ok(client)
    }

    /// Fetch `/api` and bind every collection and command it lists.
    ///
    /// May be called again; names that repeat follow the collision policy.
    pub async fn discover(&mut self) -> Result<()> {
        let discovered = discovery::discover(
            self.transport.as_ref(),
            &self.resolver,
            &self.binder,
            &mut self.registry,
        )
        .await?;

        self.collections.extend(discovered.collections);
        self.commands.extend(discovered.commands);
        Ok(())
    }

    // ── accessors ────────────────────────────────────────────────────

    pub fn hostname(&self) -> &str {
        self.resolver.hostname()
    }

    pub fn port(&self) -> &str {
        self.resolver.port()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.registry.get(name)
    }

    /// All bound operation names (sorted).
    pub fn operation_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Names of the collections bound so far.
    pub fn collections(&self) -> &BTreeSet<String> {
        &self.collections
    }

    /// Sanitized names of the commands bound so far.
    pub fn commands(&self) -> &BTreeSet<String> {
        &self.commands
    }

    // ── raw requests ─────────────────────────────────────────────────

    /// GET a path (relative to the server) or absolute URL.
    pub async fn get_path(&self, path: &str, as_json: bool) -> Result<ResponseBody> {
        let url = self.resolver.resolve(path);
        self.transport.get(&url, as_json).await
    }

    /// POST `payload` to a path or absolute URL. No argument renaming and
    /// no status check.
    pub async fn post_data(&self, path: &str, payload: &Map<String, Value>) -> Result<Value> {
        let url = self.resolver.resolve(path);
        self.transport.post(&url, payload).await
    }

    // ── dispatch ─────────────────────────────────────────────────────

    /// Invoke the operation bound under `name`.
    pub async fn invoke(&self, name: &str, call: OperationArgs) -> Result<Value> {
        let binding = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownOperation(name.to_owned()))?;

        match binding {
            Binding::List { base_url } => {
                if !call.args.is_empty() {
                    return Err(invalid(name, "list operations take no keyword arguments"));
                }
                let url = join(base_url, &call.segments);
                self.fetch(name, OperationKind::List, &url).await
            }
            Binding::Get { base_url } => {
                if call.segments.len() != 1 {
                    return Err(invalid(
                        name,
                        format!("expected exactly one item, got {}", call.segments.len()),
                    ));
                }
                if !call.args.is_empty() {
                    return Err(invalid(name, "get operations take no keyword arguments"));
                }
                let url = join(base_url, &call.segments);
                self.fetch(name, OperationKind::Get, &url).await
            }
            Binding::Command { base_url } => {
                if !call.segments.is_empty() {
                    return Err(invalid(name, "commands take keyword arguments only"));
                }
                let payload = self.transformer.transform(call.args);
                self.emit_invoked(name, OperationKind::Command, base_url);
                tracing::debug!(
                    operation = %name,
                    url = %base_url,
                    keys = ?payload.keys().collect::<Vec<_>>(),
                    "executing command"
                );
                let url = self.resolver.resolve(base_url);
                self.transport.post(&url, &payload).await
            }
        }
    }

    /// Invoke a list operation: `GET base[/seg/...]`.
    pub async fn list<S: AsRef<str>>(&self, name: &str, segments: &[S]) -> Result<Value> {
        self.expect_kind(name, OperationKind::List)?;
        let call = OperationArgs {
            segments: segments.iter().map(|s| s.as_ref().to_owned()).collect(),
            args: Map::new(),
        };
        self.invoke(name, call).await
    }

    /// Invoke a get operation: `GET base/{item}`.
    pub async fn get(&self, name: &str, item: &str) -> Result<Value> {
        self.expect_kind(name, OperationKind::Get)?;
        self.invoke(name, OperationArgs::new().segment(item)).await
    }

    /// Invoke a command: `POST base` with the renamed arguments.
    pub async fn command(&self, name: &str, args: Map<String, Value>) -> Result<Value> {
        self.expect_kind(name, OperationKind::Command)?;
        let call = OperationArgs {
            segments: Vec::new(),
            args,
        };
        self.invoke(name, call).await
    }

    fn expect_kind(&self, name: &str, kind: OperationKind) -> Result<()> {
        let binding = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownOperation(name.to_owned()))?;
        if binding.kind() != kind {
            return Err(invalid(
                name,
                format!("bound as a {} operation, not {kind}", binding.kind()),
            ));
        }
        Ok(())
    }

    async fn fetch(&self, name: &str, kind: OperationKind, url: &str) -> Result<Value> {
        self.emit_invoked(name, kind, url);
        let url = self.resolver.resolve(url);
        let body = self.transport.get(&url, true).await?;
        Ok(body.into_value())
    }

    fn emit_invoked(&self, name: &str, kind: OperationKind, url: &str) {
        TraceEvent::OperationInvoked {
            name: name.to_owned(),
            kind: kind.as_str().to_owned(),
            url: url.to_owned(),
        }
        .emit();
    }
}

fn invalid(operation: &str, reason: impl Into<String>) -> Error {
    Error::InvalidArguments {
        operation: operation.to_owned(),
        reason: reason.into(),
    }
}
