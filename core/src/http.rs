//! HTTP types for the executor-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The library assembles `HttpRequest`
//! values and interprets `HttpResponse` values without ever touching the
//! network — the injected executor (see [`crate::executor`]) performs the
//! actual round trip. This separation keeps every operation deterministic and
//! testable without a live storage account.
//!
//! All fields use owned types (`String`, `Vec`) so descriptors can be built,
//! handed off, and discarded within a single call with no lifetime concerns.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Delete,
}

/// Ordered, multi-valued header collection.
///
/// Append order is preserved so tests can assert the exact set of headers an
/// operation produces. Lookup is case-insensitive, matching HTTP semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Append every entry of `other`, preserving its order.
    pub fn merge(&mut self, other: Headers) {
        self.entries.extend(other.entries);
    }

    /// First value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered query-string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn merge(&mut self, other: QueryParams) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to `key=value&key=value` in append order. Values are
    /// percent-encoded; keys are emitted verbatim (they are fixed protocol
    /// tokens such as `comp` or `$filter`, never user input).
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={}", percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// `true` if `name` is a valid RFC 7230 header field name.
pub(crate) fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.'
                        | b'^' | b'_' | b'`' | b'|' | b'~'
                )
        })
}

/// A fully-specified request descriptor.
///
/// Built fresh for every call by [`crate::client::BaseClient::build_request`]
/// and handed to the executor; never reused.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL: base URI + path + encoded query string.
    pub url: String,
    pub headers: Headers,
    pub content_type: Option<String>,
    /// None for every operation in this library; success carries no payload
    /// and the few write operations transmit state via headers and query.
    pub body: Option<String>,
    /// Status codes that denote success for this operation.
    pub expected_status_codes: Vec<u16>,
}

/// The raw transport response.
///
/// Returned to callers inside each operation's response struct so they can
/// inspect status and headers; bodies are empty on success for every
/// operation here.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

impl HttpResponse {
    /// First value of the named response header, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_append_preserves_order() {
        let mut headers = Headers::new();
        headers.append("x-ms-copy-action", "abort");
        headers.append("x-ms-lease-id", "lease-1");
        let collected: Vec<_> = headers.iter().collect();
        assert_eq!(
            collected,
            vec![("x-ms-copy-action", "abort"), ("x-ms-lease-id", "lease-1")]
        );
    }

    #[test]
    fn headers_get_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.append("X-MS-Meta-Owner", "alice");
        assert_eq!(headers.get("x-ms-meta-owner"), Some("alice"));
        assert_eq!(headers.get("X-MS-META-OWNER"), Some("alice"));
        assert_eq!(headers.get("x-ms-lease-id"), None);
    }

    #[test]
    fn headers_merge_appends_in_order() {
        let mut a = Headers::new();
        a.append("x-ms-version", "2020-08-04");
        let mut b = Headers::new();
        b.append("x-ms-meta-a", "1");
        b.append("x-ms-meta-b", "2");
        a.merge(b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.iter().last(), Some(("x-ms-meta-b", "2")));
    }

    #[test]
    fn query_params_encode_in_order() {
        let mut query = QueryParams::new();
        query.append("comp", "copy");
        query.append("copyid", "abc123");
        assert_eq!(query.encode(), "comp=copy&copyid=abc123");
    }

    #[test]
    fn query_params_encode_reserved_characters() {
        let mut query = QueryParams::new();
        query.append("copyid", "id with spaces&and=chars");
        assert_eq!(query.encode(), "copyid=id%20with%20spaces%26and%3Dchars");
    }

    #[test]
    fn valid_header_names() {
        assert!(is_valid_header_name("x-ms-meta-owner"));
        assert!(is_valid_header_name("x-ms-version"));
        assert!(!is_valid_header_name(""));
        assert!(!is_valid_header_name("x ms meta"));
        assert!(!is_valid_header_name("x-ms-meta-ключ"));
    }

    #[test]
    fn response_header_lookup() {
        let mut headers = Headers::new();
        headers.append("x-ms-meta-owner", "alice");
        let response = HttpResponse {
            status: 200,
            headers,
            body: String::new(),
        };
        assert_eq!(response.header("X-Ms-Meta-Owner"), Some("alice"));
        assert_eq!(response.header("x-ms-request-id"), None);
    }
}
