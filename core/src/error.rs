//! Error taxonomy for data-plane operations.
//!
//! # Design
//! Every failure is classified by the stage it occurred in: input validation
//! (before any network activity), request building, request execution, or
//! status interpretation. `UnexpectedStatus` keeps the raw response attached
//! because callers sometimes need its headers even on failure (for example a
//! 409 from an abort-copy still carries request correlation headers).
//! Nothing is retried or logged here; retry policy belongs to the caller.

use std::fmt;

use crate::http::HttpResponse;

/// Errors returned by every operation in this library.
#[derive(Debug)]
pub enum StorageError {
    /// Malformed or missing input, detected before any network activity.
    Validation(String),

    /// The request descriptor could not be constructed.
    BuildingRequest(String),

    /// Transport failure or cancellation while executing the request.
    ExecutingRequest(String),

    /// A response arrived but its status code is not in the operation's
    /// expected set.
    UnexpectedStatus {
        status: u16,
        expected: Vec<u16>,
        response: HttpResponse,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Validation(msg) => write!(f, "{msg}"),
            StorageError::BuildingRequest(msg) => write!(f, "building request: {msg}"),
            StorageError::ExecutingRequest(msg) => write!(f, "executing request: {msg}"),
            StorageError::UnexpectedStatus {
                status, expected, ..
            } => {
                write!(
                    f,
                    "unexpected status {status}, expected one of {expected:?}"
                )
            }
        }
    }
}

impl std::error::Error for StorageError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Headers;

    #[test]
    fn display_carries_stage_tags() {
        let err = StorageError::BuildingRequest("invalid header name".to_string());
        assert_eq!(err.to_string(), "building request: invalid header name");

        let err = StorageError::ExecutingRequest("connection refused".to_string());
        assert_eq!(err.to_string(), "executing request: connection refused");
    }

    #[test]
    fn unexpected_status_keeps_response() {
        let err = StorageError::UnexpectedStatus {
            status: 409,
            expected: vec![204],
            response: HttpResponse {
                status: 409,
                headers: Headers::new(),
                body: "<Error/>".to_string(),
            },
        };
        assert_eq!(err.to_string(), "unexpected status 409, expected one of [204]");
        match err {
            StorageError::UnexpectedStatus { response, .. } => {
                assert_eq!(response.body, "<Error/>");
            }
            _ => unreachable!(),
        }
    }
}
