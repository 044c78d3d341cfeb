//! Request gateway: the single path every API call takes.
//!
//! The backend answers every endpoint with the same JSON envelope
//! (`{ success, data, message }`).  [`Gateway::fetch`] sends one request
//! through an [`HttpTransport`], decodes the envelope and folds the two ways a
//! call can fail on the server side (a non-2xx status, or `success: false`)
//! into one [`ApiError::Application`] carrying the server's message.  Callers
//! therefore see exactly one of:
//!
//! - `Ok(envelope)` – a 2xx response whose envelope reports success; `data`
//!   is passed through untouched.
//! - `Err(ApiError::Application(msg))` – the server rejected the call.  `msg`
//!   is the envelope `message`, or `"Something went wrong"` when the server
//!   sent none.
//! - `Err(ApiError::Transport(msg))` – the request never produced a decodable
//!   envelope (connection refused, I/O failure, a body that is not JSON).
//! - `Err(ApiError::Timeout(_))` / `Err(ApiError::Aborted)` – the call was cut
//!   short by the gateway timeout or by its [`AbortHandle`].
//!
//! # Timeouts and aborts
//!
//! A hung request must never leave a button disabled forever, so every call is
//! bounded by the gateway timeout (15 s unless configured otherwise).  Callers
//! that need to cancel in-flight work early (the dashboard on logout, for
//! example) pass an [`AbortHandle`]; aborting it resolves every call that was
//! started with a clone of that handle.
//!
//! The gateway performs no retries and no caching.

use std::fmt;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use clinic_core::Envelope;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{debug, warn};
use url::Url;

/// Error type for API calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request failed before a decodable envelope was received.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status or `success: false`.
    #[error("{0}")]
    Application(String),

    /// No response arrived within the gateway timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The call was cancelled through its [`AbortHandle`].
    #[error("Request was cancelled")]
    Aborted,

    /// An endpoint URL could not be built.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// The envelope `data` did not have the shape the endpoint promises.
    #[error("unexpected response data: {0}")]
    Decode(String),
}

/// Error reported by an [`HttpTransport`] when no response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header every request starts with.
pub const DEFAULT_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// One outgoing API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// Header name/value pairs; names are unique ignoring ASCII case.
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body, if any.
    pub body: Option<String>,
}

impl ApiRequest {
    /// Creates a request with the default `Content-Type: application/json`
    /// header and no body.
    pub fn new(method: Method, url: Url) -> Self {
        let (name, value) = DEFAULT_CONTENT_TYPE;
        Self {
            method,
            url,
            headers: vec![(name.to_string(), value.to_string())],
            body: None,
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Sets a header, replacing any existing header with the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
        self
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if `body` cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let text = serde_json::to_string(body)
            .map_err(|e| ApiError::Transport(format!("failed to encode request body: {e}")))?;
        self.body = Some(text);
        Ok(self)
    }

    /// Value of the header `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends HTTP requests.
///
/// The production implementation wraps `reqwest`; tests use the scripted
/// transport in `infrastructure::mock`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no response was received.
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

// ── Abort handle ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct AbortState {
    aborted: AtomicBool,
    notify: Notify,
}

/// Cancels in-flight gateway calls.
///
/// Clones share state: aborting any clone aborts every call started with any
/// of them.  A handle stays aborted; create a new one for later calls.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    state: Arc<AbortState>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts every pending and future call that uses this handle.
    pub fn abort(&self) {
        self.state.aborted.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_aborted(&self) -> bool {
        self.state.aborted.load(Ordering::SeqCst)
    }

    /// Resolves once [`abort`](Self::abort) has been called.
    pub async fn aborted(&self) {
        loop {
            // Register before checking the flag so an abort between the two
            // steps still wakes this waiter.
            let notified = self.state.notify.notified();
            if self.is_aborted() {
                return;
            }
            notified.await;
        }
    }
}

// ── Gateway ──────────────────────────────────────────────────────────────────

/// Sends API requests and interprets the response envelope.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl Gateway {
    /// Timeout applied when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Replaces the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends `request` with no way to abort it other than the timeout.
    ///
    /// # Errors
    ///
    /// See the module documentation for the error contract.
    pub async fn fetch(&self, request: ApiRequest) -> Result<Envelope, ApiError> {
        self.fetch_abortable(request, &AbortHandle::new()).await
    }

    /// Sends `request`, giving up early if `abort` is triggered.
    ///
    /// # Errors
    ///
    /// See the module documentation for the error contract.
    pub async fn fetch_abortable(
        &self,
        request: ApiRequest,
        abort: &AbortHandle,
    ) -> Result<Envelope, ApiError> {
        // Only the path is logged: the query may carry the admin password.
        let method = request.method;
        let path = request.url.path().to_string();
        debug!(%method, %path, "sending API request");

        let response = tokio::select! {
            biased;
            _ = abort.aborted() => {
                debug!(%method, %path, "API request aborted");
                return Err(ApiError::Aborted);
            }
            result = tokio::time::timeout(self.timeout, self.transport.send(&request)) => {
                match result {
                    Err(_) => {
                        let timeout_ms = self.timeout.as_millis() as u64;
                        warn!(%method, %path, timeout_ms, "API request timed out");
                        return Err(ApiError::Timeout(self.timeout));
                    }
                    Ok(Err(e)) => {
                        warn!(%method, %path, error = %e, "API request failed in transport");
                        return Err(ApiError::Transport(e.0));
                    }
                    Ok(Ok(response)) => response,
                }
            }
        };

        let outcome = interpret_response(&response);
        if let Err(e) = &outcome {
            debug!(%method, %path, status = response.status, error = %e, "API call rejected");
        }
        outcome
    }
}

/// Decodes a response body as an envelope and applies the success rules.
///
/// # Errors
///
/// - [`ApiError::Transport`] if the body is not a JSON envelope.
/// - [`ApiError::Application`] if the status is not 2xx or the envelope
///   reports `success: false`.
pub fn interpret_response(response: &RawResponse) -> Result<Envelope, ApiError> {
    let envelope: Envelope = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Transport(format!("invalid response body: {e}")))?;

    if !response.is_success() || !envelope.success {
        return Err(ApiError::Application(envelope.failure_message()));
    }
    Ok(envelope)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
