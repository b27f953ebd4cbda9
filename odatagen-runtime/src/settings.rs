use std::{fmt, sync::Arc};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{Error, Method, Request, Response, Result, Transport};

/// Where and how a generated client talks to its service.
///
/// Cloning is cheap; every facade and operation holds its own copy.
#[derive(Clone)]
pub struct ClientSettings {
    base_url: String,
    headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
}

impl ClientSettings {
    /// Settings for the service rooted at `base_url`.
    ///
    /// JSON `Content-Type` and `Accept` headers are set by default.
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            transport,
        }
    }

    /// Add a header sent with every request, replacing one of the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// The service root, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Absolute URL of a resource below the service root.
    pub(crate) fn resource_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> Result<Response> {
        debug!(%method, %url, "sending request");
        let request = Request {
            method,
            url: url.clone(),
            headers: self.headers.clone(),
            body,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(source) => return Err(Error::Transport { method, url, source }),
        };
        if !response.is_success() {
            warn!(%method, %url, status = response.status, "request failed");
            return Err(Error::Status {
                method,
                url,
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    pub(crate) async fn send_json<R: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> Result<R> {
        let response = self.send(method, url.clone(), body).await?;
        decode(&url, &response.body)
    }
}

/// Decode a JSON body. An empty body decodes as `null`.
pub(crate) fn decode<R: DeserializeOwned>(url: &str, body: &str) -> Result<R> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
