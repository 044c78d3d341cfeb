//! `reqwest`-backed [`HttpTransport`].
//!
//! The gateway owns the overall per-call timeout; the client built here only
//! bounds connection setup.  Error descriptions are stripped of the request
//! URL because admin URLs carry the password in their query string.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::trace;

use crate::application::gateway::{
    ApiError, ApiRequest, HttpTransport, Method, RawResponse, TransportError,
};

/// Sends API requests over HTTP(S).
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport whose connections must be established within
    /// `connect_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn new(connect_timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("clinic-desk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn describe(error: reqwest::Error) -> TransportError {
    TransportError(error.without_url().to_string())
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(describe)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(describe)?;
        trace!(status, bytes = body.len(), "HTTP response received");
        Ok(RawResponse { status, body })
    }
}
