use std::fmt;

/// Result type for regtrace-proxy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the proxy layer
#[derive(Debug)]
pub enum Error {
    /// Could not bind the local listening socket
    Bind(std::io::Error),

    /// Could not construct the upstream HTTP client
    Client(reqwest::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bind(err) => write!(f, "Failed to bind proxy listener: {}", err),
            Error::Client(err) => write!(f, "Failed to build upstream client: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Bind(err) => Some(err),
            Error::Client(err) => Some(err),
        }
    }
}
