//! Minimal structured query filter.
//!
//! Part of the [`crate::options::RequestOptions`] capability surface. The
//! storage data-plane operations never supply one — their query strings are
//! fixed protocol tokens — but the request assembler merges it uniformly when
//! present, so the shared path never branches on operation identity.

use crate::http::QueryParams;

/// An OData-style query, serialized as `$`-prefixed query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filter: Option<String>,
    pub top: Option<u32>,
}

impl Query {
    pub fn to_query_params(&self) -> QueryParams {
        let mut out = QueryParams::new();
        if let Some(filter) = &self.filter {
            out.append("$filter", filter.clone());
        }
        if let Some(top) = self.top {
            out.append("$top", top.to_string());
        }
        out
    }
}
