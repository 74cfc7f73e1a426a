//! Error types for the retrieval pipeline.
//!
//! # Design
//! Every variant is fatal to the retrieval that produced it. Nothing in the
//! core recovers locally; the error travels up to whoever called
//! `Session::retrieve`. Socket-level failures keep the underlying
//! `io::Error` as their source so callers can still inspect the OS error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned while parsing or retrieving an `Address`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL has no scheme, an unsupported scheme, or a broken authority.
    #[error("malformed url {url:?}: {reason}")]
    MalformedUrl { url: String, reason: &'static str },

    /// A `data:` URL declared something other than `text/html`.
    #[error("unsupported media type {0:?}, only text/html is accepted")]
    UnsupportedMediaType(String),

    /// `view-source:` wrapped a `data:` or another `view-source:` address.
    #[error("view-source cannot wrap a {0} address")]
    InvalidNesting(&'static str),

    /// Connecting, the TLS handshake, or socket I/O failed.
    #[error("connection to {origin} failed: {source}")]
    ConnectionFailed {
        origin: String,
        #[source]
        source: io::Error,
    },

    /// The peer sent something this client does not accept.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// The redirect chain reached the configured limit.
    #[error("too many redirects (limit {limit})")]
    TooManyRedirects { limit: usize },

    /// A `file:` address could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub(crate) fn malformed(url: &str, reason: &'static str) -> Self {
        FetchError::MalformedUrl {
            url: url.to_string(),
            reason,
        }
    }

    pub(crate) fn violation(msg: impl Into<String>) -> Self {
        FetchError::ProtocolViolation(msg.into())
    }

    pub(crate) fn connection(origin: impl ToString, source: io::Error) -> Self {
        FetchError::ConnectionFailed {
            origin: origin.to_string(),
            source,
        }
    }
}
