use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Port
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A server port, always held as a string.
///
/// Config files may spell it `port: 8150` or `port: "8150"`; both end up
/// as the same `Port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PortRepr")]
pub struct Port(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Number(u64),
    Text(String),
}

impl From<PortRepr> for Port {
    fn from(repr: PortRepr) -> Self {
        match repr {
            PortRepr::Number(n) => Port(n.to_string()),
            PortRepr::Text(s) => Port(s),
        }
    }
}

impl Port {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<u16> for Port {
    fn from(port: u16) -> Self {
        Port(port.to_string())
    }
}

impl From<&str> for Port {
    fn from(port: &str) -> Self {
        Port(port.to_owned())
    }
}

impl From<String> for Port {
    fn from(port: String) -> Self {
        Port(port)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Collision policy
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What the binder does when a derived operation name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The later binding replaces the earlier one (logged at `warn`).
    #[default]
    Replace,
    /// Binding a different operation under a taken name is an error.
    Reject,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Raw config (file / command line)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Unvalidated configuration as read from an rc file or the command line.
///
/// Every field is optional; [`RawConfig::resolve`] turns it into a
/// [`ClientConfig`] or fails with [`Error::Config`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Full server URL, e.g. `http://razor:8150`. Takes precedence over
    /// `hostname`/`port` when set.
    pub url: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<Port>,
    pub lazy_discovery: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub collision_policy: Option<CollisionPolicy>,
    /// Extra command argument renames (`local_name: wire-name`).
    pub arg_renames: BTreeMap<String, String>,
}

impl RawConfig {
    /// Layer `over` on top of `self`; values set in `over` win.
    ///
    /// Setting `hostname` or `port` in `over` without a `url` discards a
    /// `url` inherited from `self`, otherwise the lower layer's URL would
    /// silently shadow the explicit host.
    pub fn merge(mut self, over: RawConfig) -> RawConfig {
        if over.url.is_none() && (over.hostname.is_some() || over.port.is_some()) {
            self.url = None;
        }
        if over.url.is_some() {
            self.url = over.url;
        }
        if over.hostname.is_some() {
            self.hostname = over.hostname;
        }
        if over.port.is_some() {
            self.port = over.port;
        }
        if over.lazy_discovery.is_some() {
            self.lazy_discovery = over.lazy_discovery;
        }
        if over.timeout_ms.is_some() {
            self.timeout_ms = over.timeout_ms;
        }
        if over.collision_policy.is_some() {
            self.collision_policy = over.collision_policy;
        }
        self.arg_renames.extend(over.arg_renames);
        self
    }

    /// Validate and normalise into a [`ClientConfig`].
    ///
    /// Fails with [`Error::Config`] when no hostname or port can be
    /// determined. No network access happens here.
    pub fn resolve(self) -> Result<ClientConfig> {
        let (hostname, port) = match self.url.as_deref() {
            Some(raw) => {
                let (host, port) = host_port_from_url(raw)?;
                (Some(host), Some(port))
            }
            None => (self.hostname, self.port),
        };

        let hostname = hostname
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::config("no hostname configured (set `hostname` or `url`)"))?;
        let port = port
            .filter(|p| !p.as_str().is_empty())
            .ok_or_else(|| Error::config("no port configured (set `port` or `url`)"))?;

        Ok(ClientConfig {
            hostname,
            port: port.into_string(),
            lazy_discovery: self.lazy_discovery.unwrap_or(false),
            timeout_ms: self.timeout_ms,
            collision_policy: self.collision_policy.unwrap_or_default(),
            arg_renames: self.arg_renames,
        })
    }
}

/// Extract `(host, port)` from a server URL, falling back to the scheme's
/// default port when none is given.
fn host_port_from_url(raw: &str) -> Result<(String, Port)> {
    let parsed =
        url::Url::parse(raw).map_err(|e| Error::config(format!("invalid url {raw:?}: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| Error::config(format!("url {raw:?} has no host")))?
        .to_owned();
    let port = parsed
        .port_or_known_default()
        .ok_or_else(|| Error::config(format!("url {raw:?} has no port")))?;
    Ok((host, Port::from(port)))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Resolved client config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Everything a `RazorClient` needs at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub hostname: String,
    pub port: String,
    /// Skip discovery at construction; call `discover()` explicitly.
    pub lazy_discovery: bool,
    /// Per-request timeout applied by the HTTP transport.
    pub timeout_ms: Option<u64>,
    pub collision_policy: CollisionPolicy,
    /// Renames added on top of the built-in command argument table.
    pub arg_renames: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(hostname: impl Into<String>, port: impl Into<Port>) -> Self {
        Self {
            hostname: hostname.into(),
            port: port.into().into_string(),
            lazy_discovery: false,
            timeout_ms: None,
            collision_policy: CollisionPolicy::default(),
            arg_renames: BTreeMap::new(),
        }
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy_discovery = lazy;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
