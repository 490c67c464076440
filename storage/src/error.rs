use thiserror::Error;

/// Reasons an endpoint URI cannot be decomposed into host, port and credentials.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("endpoint has no host")]
    EmptyHost,

    #[error("endpoint with credentials must also carry a port (user:pass@host:port)")]
    MissingPort,

    #[error("endpoint credentials must come first, as user:pass@host:port")]
    MisplacedCredentials,

    #[error("endpoint has a port separator but no port")]
    EmptyPort,

    #[error("expected {expected} endpoint segments, found {found}")]
    UnexpectedSegments { expected: usize, found: usize },

    #[error("invalid port '{0}'")]
    InvalidPort(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Malformed endpoint URI '{uri}': {source}")]
    MalformedUri {
        uri: String,
        #[source]
        source: EndpointError,
    },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
