//! Boundary to the shared execution primitive.
//!
//! # Design
//! The library never performs network I/O itself. Callers inject an
//! implementation of [`Execute`] — typically a thin adapter over an HTTP
//! agent that attaches credentials and performs the round trip. The library's
//! contract with it is narrow: it receives a fully-populated descriptor and a
//! context, and returns either the raw response or a transport error. Any
//! error it returns is wrapped by the caller with an "executing request"
//! stage tag; status interpretation stays on this side of the boundary.

use std::fmt;

use crate::context::Context;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a single request/response round trip.
///
/// Implementations must honor the context: an expired deadline yields
/// [`TransportError::Cancelled`] rather than a hang, whether it expires
/// before or during the network call.
pub trait Execute: Send + Sync {
    fn execute(&self, ctx: &Context, request: &HttpRequest)
        -> Result<HttpResponse, TransportError>;
}

/// Failure before a response was obtained.
#[derive(Debug)]
pub enum TransportError {
    /// The context deadline expired before or during the call.
    Cancelled,

    /// Connection, DNS, TLS, or other transport failure.
    Io(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Cancelled => write!(f, "context deadline exceeded"),
            TransportError::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TransportError {}
