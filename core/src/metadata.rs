//! Metadata validation and header serialization.
//!
//! Metadata travels as one request header per entry, each key prefixed with
//! `x-ms-meta-`. Keys therefore face the platform's naming rule (a valid
//! identifier: leading letter or underscore, then letters, digits, or
//! underscores) and values must be header-safe. Validation happens before any
//! request is built; invalid metadata never reaches the network.
//!
//! A `BTreeMap` keeps entries ordered, so serialized headers are
//! deterministic.

use std::collections::BTreeMap;

use crate::http::Headers;

/// Prefix applied to every metadata header.
pub const HEADER_PREFIX: &str = "x-ms-meta-";

/// Check every key and value against the platform constraints. Returns a
/// message naming the first offending entry.
pub fn validate(metadata: &BTreeMap<String, String>) -> Result<(), String> {
    for (key, value) in metadata {
        if !is_valid_key(key) {
            return Err(format!(
                "metadata key {key:?} must start with a letter or underscore and contain only letters, digits, and underscores"
            ));
        }
        if !is_header_safe(value) {
            return Err(format!(
                "metadata value for key {key:?} contains characters that cannot be sent in a header"
            ));
        }
    }
    Ok(())
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Visible ASCII plus interior spaces; no control characters, no
/// leading/trailing whitespace.
fn is_header_safe(value: &str) -> bool {
    value.bytes().all(|b| (0x20..=0x7e).contains(&b))
        && value.trim() == value
}

/// Serialize metadata into request headers, one `x-ms-meta-{key}` per entry.
/// Values pass through unescaped.
pub fn to_headers(metadata: &BTreeMap<String, String>) -> Headers {
    let mut headers = Headers::new();
    for (key, value) in metadata {
        headers.append(format!("{HEADER_PREFIX}{key}"), value.clone());
    }
    headers
}

/// Extract metadata from response headers, stripping the `x-ms-meta-` prefix
/// case-insensitively.
pub fn from_headers(headers: &Headers) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (name, value) in headers.iter() {
        if name.len() >= HEADER_PREFIX.len()
            && name[..HEADER_PREFIX.len()].eq_ignore_ascii_case(HEADER_PREFIX)
        {
            out.insert(name[HEADER_PREFIX.len()..].to_string(), value.to_string());
        }
    }
    out
}
