use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlugdexError {
    /// The store could not be reached, read or written.
    StoreUnavailable(String),
    /// A record was rejected before it reached storage.
    ValidationFailed(String),
    /// No record carries the given id.
    NotFound(u64),
    Config(String),
}

impl fmt::Display for PlugdexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlugdexError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            PlugdexError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
            PlugdexError::NotFound(id) => write!(f, "Plugin not found: {}", id),
            PlugdexError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for PlugdexError {}

pub type Result<T> = std::result::Result<T, PlugdexError>;

// Conversion helpers
impl From<std::io::Error> for PlugdexError {
    fn from(err: std::io::Error) -> Self {
        PlugdexError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for PlugdexError {
    fn from(err: serde_json::Error) -> Self {
        PlugdexError::StoreUnavailable(format!("malformed catalogue: {}", err))
    }
}

impl From<anyhow::Error> for PlugdexError {
    fn from(err: anyhow::Error) -> Self {
        PlugdexError::Config(err.to_string())
    }
}
