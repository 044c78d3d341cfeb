//! Test doubles for the application seams.
//!
//! # Why a scripted transport?
//!
//! The real transport talks to a live backend, which unit tests cannot rely
//! on.  [`ScriptedTransport`] instead answers each request with the next
//! reply from a queue the test filled in advance, and records every request
//! it received so assertions can check the method, URL and body.
//!
//! ```ignore
//! let transport = Arc::new(ScriptedTransport::new());
//! transport.push_json(200, json!({ "success": true, "data": [] }));
//!
//! let gateway = Gateway::new(Arc::clone(&transport) as Arc<dyn HttpTransport>);
//! gateway.fetch(ApiRequest::get(url)).await?;
//!
//! assert_eq!(transport.requests().len(), 1);
//! ```
//!
//! A request that arrives with the queue empty fails with a transport error,
//! so an unexpected extra call shows up as a failing assertion rather than a
//! hang.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::application::admin::Confirmer;
use crate::application::gateway::{ApiRequest, HttpTransport, RawResponse, TransportError};

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Answer with this response.
    Respond(RawResponse),
    /// Fail as if the connection broke.
    Fail(String),
    /// Answer with this response once the delay has passed.
    Delayed(Duration, RawResponse),
    /// Never answer; the caller's timeout or abort must end the call.
    Hang,
}

/// A transport that replays queued replies and records requests.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    /// Every request received, in order.
    pub sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: ScriptedReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Queues a response with `status` and `body` serialized as JSON.
    pub fn push_json(&self, status: u16, body: Value) {
        self.push(ScriptedReply::Respond(RawResponse::new(status, body.to_string())));
    }

    /// Queues a JSON response that arrives after `delay`.
    pub fn push_json_after(&self, delay: Duration, status: u16, body: Value) {
        self.push(ScriptedReply::Delayed(
            delay,
            RawResponse::new(status, body.to_string()),
        ));
    }

    /// Queues a response with a raw, possibly non-JSON body.
    pub fn push_raw(&self, status: u16, body: &str) {
        self.push(ScriptedReply::Respond(RawResponse::new(status, body)));
    }

    pub fn push_transport_error(&self, message: &str) {
        self.push(ScriptedReply::Fail(message.to_string()));
    }

    pub fn push_hang(&self) {
        self.push(ScriptedReply::Hang);
    }

    /// Snapshot of every request received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of queued replies not yet consumed.
    pub fn pending_replies(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::Fail(message)) => Err(TransportError(message)),
            Some(ScriptedReply::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Some(ScriptedReply::Hang) => std::future::pending().await,
            None => Err(TransportError(format!(
                "no scripted reply for {} {}",
                request.method,
                request.url.path()
            ))),
        }
    }
}

/// A confirmer that always gives the same answer and records the prompts.
#[derive(Default)]
pub struct FixedConfirmer {
    pub answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl FixedConfirmer {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }
}

impl Confirmer for FixedConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}
