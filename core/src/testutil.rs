//! Scripted executor for unit tests: records every descriptor it receives and
//! answers with a canned status, so tests can assert the exact request an
//! operation produced and that validation failures make zero executor calls.

use std::sync::{Arc, Mutex};

use crate::context::Context;
use crate::executor::{Execute, TransportError};
use crate::http::{Headers, HttpRequest, HttpResponse};

pub(crate) struct RecordingExecutor {
    status: u16,
    response_headers: Headers,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingExecutor {
    pub fn respond_with(status: u16) -> Arc<Self> {
        Self::respond_with_headers(status, Headers::new())
    }

    pub fn respond_with_headers(status: u16, response_headers: Headers) -> Arc<Self> {
        Arc::new(Self {
            status,
            response_headers,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was executed")
    }
}

impl Execute for RecordingExecutor {
    fn execute(
        &self,
        ctx: &Context,
        request: &HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        if ctx.is_expired() {
            return Err(TransportError::Cancelled);
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok(HttpResponse {
            status: self.status,
            headers: self.response_headers.clone(),
            body: String::new(),
        })
    }
}
