/// Shared error type used across all razor-client crates.
///
/// Nothing in the core recovers from these: every variant surfaces to the
/// caller of the top-level operation unchanged.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A GET returned a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Connection, DNS or other transport-level failure.
    #[error("network: {0}")]
    Network(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// The discovery document does not have the expected shape.
    #[error("manifest: {0}")]
    Manifest(String),

    #[error("config: {0}")]
    Config(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("invalid arguments for {operation}: {reason}")]
    InvalidArguments { operation: String, reason: String },

    #[error("operation name already bound: {0}")]
    NameCollision(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Status code for [`Error::HttpStatus`], `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
