//! The seam between generated clients and whatever HTTP stack the
//! application uses.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// Error type transports report failures with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Absolute URL including the query string
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// JSON body, if the request carries one
    pub body: Option<Value>,
}

/// What a transport hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Raw response body (empty for `204 No Content`)
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests on behalf of a generated client.
///
/// Implementations own connection handling, authentication and retries.
/// Non-2xx responses should be returned as [`Response`]s, not errors; the
/// runtime turns them into [`Error::Status`](crate::Error::Status).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, BoxError>;
}
