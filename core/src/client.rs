//! Shared request assembly and execution.
//!
//! # Design
//! `BaseClient` is an immutable handle: base URI, API version, and the
//! injected executor. Every operation follows the same path — build a
//! descriptor from a [`RequestConfig`], run it through the executor, check
//! the status against the operation's expected set — so per-operation code is
//! reduced to input validation plus a [`RequestOptions`] implementor. No
//! state survives a call and no call observes another.

use std::sync::Arc;

use crate::context::Context;
use crate::error::StorageError;
use crate::executor::Execute;
use crate::http::{is_valid_header_name, HttpMethod, HttpRequest, HttpResponse};
use crate::options::RequestOptions;

/// Storage data-plane API version, sent as `x-ms-version` on every request.
pub const API_VERSION: &str = "2020-08-04";

/// Everything an operation declares about its REST call.
pub struct RequestConfig<'a> {
    pub method: HttpMethod,
    /// Absolute path below the base URI, beginning with `/`.
    pub path: String,
    pub content_type: Option<&'static str>,
    pub expected_status_codes: Vec<u16>,
    pub options: &'a dyn RequestOptions,
}

/// Immutable per-service client handle.
#[derive(Clone)]
pub struct BaseClient {
    base_uri: String,
    api_version: &'static str,
    executor: Arc<dyn Execute>,
}

impl std::fmt::Debug for BaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseClient")
            .field("base_uri", &self.base_uri)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl BaseClient {
    pub fn new(
        base_uri: &str,
        api_version: &'static str,
        executor: Arc<dyn Execute>,
    ) -> Result<Self, StorageError> {
        if !base_uri.starts_with("http://") && !base_uri.starts_with("https://") {
            return Err(StorageError::Validation(format!(
                "`base_uri` must be an absolute http(s) URI, got {base_uri:?}"
            )));
        }
        Ok(Self {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            api_version,
            executor,
        })
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Assemble the full descriptor: options headers plus the version header,
    /// options query merged with any structured filter, URL from base URI,
    /// path, and encoded query.
    pub fn build_request(&self, config: &RequestConfig<'_>) -> Result<HttpRequest, StorageError> {
        let mut headers = config.options.to_headers();
        headers.append("x-ms-version", self.api_version);
        for (name, _) in headers.iter() {
            if !is_valid_header_name(name) {
                return Err(StorageError::BuildingRequest(format!(
                    "invalid header name {name:?}"
                )));
            }
        }

        let mut query = config.options.to_query();
        if let Some(odata) = config.options.to_odata() {
            query.merge(odata.to_query_params());
        }

        let mut url = format!("{}{}", self.base_uri, config.path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode());
        }

        Ok(HttpRequest {
            method: config.method,
            url,
            headers,
            content_type: config.content_type.map(str::to_string),
            body: None,
            expected_status_codes: config.expected_status_codes.clone(),
        })
    }

    /// Run the descriptor through the executor and interpret the status.
    /// Transport failures and cancellation surface as `ExecutingRequest`; a
    /// response outside the expected set surfaces as `UnexpectedStatus` with
    /// the raw response attached.
    pub fn execute(
        &self,
        ctx: &Context,
        request: &HttpRequest,
    ) -> Result<HttpResponse, StorageError> {
        let response = self
            .executor
            .execute(ctx, request)
            .map_err(|e| StorageError::ExecutingRequest(e.to_string()))?;

        if !request.expected_status_codes.contains(&response.status) {
            return Err(StorageError::UnexpectedStatus {
                status: response.status,
                expected: request.expected_status_codes.clone(),
                response,
            });
        }

        Ok(response)
    }
}
