//! Scripted transport fake shared by fetcher and poller tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::TransportError;
use crate::transport::{CdnRequest, CdnResponse, CdnTransport};

/// One scripted transport outcome
pub enum Step {
    Reply(CdnResponse),
    Fail(TransportError),
}

impl Step {
    /// Plain status with empty body and no etag
    pub fn status(status: u16) -> Self {
        Step::Reply(CdnResponse {
            status,
            etag: None,
            body: String::new(),
        })
    }

    /// Successful 200 carrying a document, optionally with an etag
    pub fn ok(body: &str, etag: Option<&str>) -> Self {
        Step::Reply(CdnResponse {
            status: 200,
            etag: etag.map(str::to_string),
            body: body.to_string(),
        })
    }
}

/// Transport that replays a scripted sequence and records every request
///
/// Once the script is exhausted, further calls fail with a connection error
/// so a runaway loop cannot succeed silently.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<FakeState>,
}

#[derive(Default)]
struct FakeState {
    script: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<CdnRequest>>,
}

impl FakeTransport {
    pub fn scripted(steps: Vec<Step>) -> Self {
        Self {
            state: Arc::new(FakeState {
                script: Mutex::new(steps.into()),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Script N identical statuses in a row
    pub fn repeating_status(status: u16, count: usize) -> Self {
        Self::scripted((0..count).map(|_| Step::status(status)).collect())
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CdnRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CdnTransport for FakeTransport {
    async fn get(&self, _url: &str, request: &CdnRequest) -> Result<CdnResponse, TransportError> {
        self.state.requests.lock().unwrap().push(request.clone());

        match self.state.script.lock().unwrap().pop_front() {
            Some(Step::Reply(response)) => Ok(response),
            Some(Step::Fail(error)) => Err(error),
            None => Err(TransportError::Connect("script exhausted".into())),
        }
    }
}
