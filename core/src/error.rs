//! Runtime errors for request construction and dispatch.
//!
//! # Design
//! Only failures that come from collaborators land here: the JSON encoder,
//! URL parsing, file access and the transport. Misuse of the builder (a
//! second method call, a second body, building twice) is a programming
//! error and panics at the offending call instead of producing an `Error`,
//! so the two classes can never be confused by a caller matching on this
//! enum.

use thiserror::Error;

/// Errors surfaced by `RequestBuilder::json`, `Request::target_url` and
/// `execute`.
#[derive(Debug, Error)]
pub enum Error {
    /// A structured body could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The request URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A file body could not be opened or measured.
    #[error("body i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The transport failed to carry out the exchange. The inner error is
    /// passed through untouched.
    #[error("transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a transport-specific error.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_keeps_source_message() {
        let err = Error::transport("connection refused");
        assert_eq!(err.to_string(), "transport failed: connection refused");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
