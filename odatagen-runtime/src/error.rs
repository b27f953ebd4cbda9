use thiserror::Error;

use crate::{BoxError, Method};

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or executing a request.
///
/// Builder errors are raised as soon as the offending value is supplied, so
/// an invalid URL is never sent.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot express a value of type `{type_name}` as a literal: {message}")]
    UnsupportedLiteral {
        type_name: &'static str,
        message: String,
    },

    #[error("no key was set for the entity request on '{url}'")]
    MissingKey { url: String },

    #[error("no navigation property and binding were set for the link request on '{url}'")]
    MissingLink { url: String },

    #[error("failed to encode the request body for '{url}'")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode the response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{method} {url} returned status {status}")]
    Status {
        method: Method,
        url: String,
        status: u16,
        body: String,
    },

    #[error("{method} {url} failed")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: BoxError,
    },
}
