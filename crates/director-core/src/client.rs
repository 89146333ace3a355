//! HTTP transport utilities.
//!
//! Requests are plain GETs: a base path, a resource scope and a URL-encoded
//! query. The [`Transport`] trait is the seam between the request pipeline
//! and the network; [`HttpTransport`] is the reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::query::QueryOptions;

/// A fully built API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    endpoint: String,
    query: String,
}

impl ApiRequest {
    /// Build a request for `scope` under `base_path` with the given options.
    #[must_use]
    pub fn new(base_path: &str, scope: &str, options: &QueryOptions) -> Self {
        Self {
            endpoint: format!("{base_path}{scope}"),
            query: options.to_query_string(),
        }
    }

    /// Endpoint without the query string.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Encoded query string, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Full URL: `endpoint?query`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}?{}", self.endpoint, self.query)
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?{}", self.endpoint, self.query)
    }
}

/// Issues a request and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single GET.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionFailed`] if the service cannot be reached and
    /// [`Error::UnexpectedStatus`] if it answers with anything but 200.
    async fn get(&self, request: &ApiRequest) -> Result<String>;
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a transport with reqwest's default client settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { http })
    }

    /// Wrap an existing reqwest client.
    #[must_use]
    pub const fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ApiRequest) -> Result<String> {
        let url = request.url();
        debug!(%url, "Sending Director request");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| Error::ConnectionFailed(format!("{url} ({err})")))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%status, endpoint = request.endpoint(), "Director endpoint returned non-200");
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: request.endpoint().to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|err| Error::ConnectionFailed(format!("{url} ({err})")))
    }
}
