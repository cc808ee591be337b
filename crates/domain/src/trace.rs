use serde::Serialize;

/// Structured trace events emitted across all razor-client crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    HttpCall {
        method: String,
        url: String,
        status: u16,
        duration_ms: u64,
    },
    ManifestFetched {
        url: String,
        collections: usize,
        commands: usize,
    },
    OperationBound {
        name: String,
        kind: String,
        url: String,
        replaced: bool,
    },
    OperationInvoked {
        name: String,
        kind: String,
        url: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "rz_event");
    }
}
