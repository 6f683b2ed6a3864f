//! Client library for a cloud storage platform's data-plane REST APIs.
//!
//! # Overview
//! Every operation is a single request/response round trip: validate string
//! inputs, assemble an HTTP request descriptor (method, path, query, headers,
//! expected success statuses), hand it to an injected executor, and map the
//! status code to a typed result or a classified error.
//!
//! # Design
//! - The library performs no network I/O itself; callers inject an
//!   implementation of [`executor::Execute`] (executor-does-IO pattern),
//!   keeping every operation deterministic and testable without a server.
//! - What varies per operation — headers and query parameters — lives in one
//!   small [`options::RequestOptions`] implementor per operation; the shared
//!   assembly and execution path in [`client::BaseClient`] never branches on
//!   operation identity.
//! - Clients are immutable handles; calls share no state and may run
//!   concurrently without coordination. Cancellation is an explicit
//!   per-call [`Context`].
//! - Errors carry the stage they occurred in: validation, building the
//!   request, executing it, or an unexpected response status.

pub mod blobs;
pub mod client;
pub mod context;
pub mod directories;
pub mod error;
pub mod executor;
pub mod http;
pub mod metadata;
pub mod odata;
pub mod options;
pub mod paths;
pub mod queues;

#[cfg(test)]
pub(crate) mod testutil;

pub use client::{BaseClient, RequestConfig, API_VERSION};
pub use context::Context;
pub use error::StorageError;
pub use executor::{Execute, TransportError};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse, QueryParams};
pub use options::{NoOptions, RequestOptions};
