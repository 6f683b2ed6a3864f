//! Capability interface implemented once per operation.
//!
//! # Design
//! Each operation declares exactly the headers and query parameters its REST
//! call needs by implementing [`RequestOptions`] on a small private struct.
//! What varies per operation lives in these implementors; how a descriptor is
//! assembled and executed is shared and never branches on which operation is
//! running. Adding an operation means writing one struct, not touching the
//! plumbing.

use crate::http::{Headers, QueryParams};
use crate::odata;

/// Per-operation request shaping: headers, query parameters, and an optional
/// structured filter (always absent for storage data-plane operations).
pub trait RequestOptions {
    fn to_headers(&self) -> Headers {
        Headers::new()
    }

    fn to_query(&self) -> QueryParams {
        QueryParams::new()
    }

    fn to_odata(&self) -> Option<odata::Query> {
        None
    }
}

/// Options for operations whose call shape is carried entirely by the method
/// and path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOptions;

impl RequestOptions for NoOptions {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_options_is_empty() {
        assert!(NoOptions.to_headers().is_empty());
        assert!(NoOptions.to_query().is_empty());
        assert!(NoOptions.to_odata().is_none());
    }
}
