//! In-memory implementation of the storage data-plane endpoints the client
//! library targets: queues at `/{name}`, blobs / directories / data lake
//! paths at `/{container}/{path}`. Operations are dispatched the way the real
//! platform does it — on method plus the `comp`, `restype`, and `resource`
//! query parameters — and answer with the platform's status codes, including
//! XML error bodies on failure.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// A stored blob: user metadata plus an optional pending copy operation.
#[derive(Clone, Debug, Default)]
pub struct Blob {
    pub metadata: HashMap<String, String>,
    pub pending_copy_id: Option<String>,
}

/// Account state. Seed it before wrapping in a [`Db`] when a test needs
/// pre-existing resources.
#[derive(Debug, Default)]
pub struct StorageState {
    queues: HashMap<String, HashMap<String, String>>,
    blobs: HashMap<(String, String), Blob>,
    directories: HashSet<(String, String)>,
    paths: HashSet<(String, String)>,
}

impl StorageState {
    pub fn create_queue(&mut self, name: &str) {
        self.queues.insert(name.to_string(), HashMap::new());
    }

    pub fn queue_metadata(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.queues.get(name)
    }

    pub fn put_blob(&mut self, container: &str, name: &str) {
        self.blobs
            .insert((container.to_string(), name.to_string()), Blob::default());
    }

    /// Registers a pending copy on the blob (creating it if absent) and
    /// returns the copy id.
    pub fn start_copy(&mut self, container: &str, name: &str) -> String {
        let copy_id = Uuid::new_v4().to_string();
        let blob = self
            .blobs
            .entry((container.to_string(), name.to_string()))
            .or_default();
        blob.pending_copy_id = Some(copy_id.clone());
        copy_id
    }

    pub fn blob(&self, container: &str, name: &str) -> Option<&Blob> {
        self.blobs.get(&(container.to_string(), name.to_string()))
    }

    pub fn has_directory(&self, share: &str, path: &str) -> bool {
        self.directories
            .contains(&(share.to_string(), path.to_string()))
    }

    pub fn has_path(&self, filesystem: &str, path: &str) -> bool {
        self.paths
            .contains(&(filesystem.to_string(), path.to_string()))
    }
}

pub type Db = Arc<RwLock<StorageState>>;

/// Wrap seeded state for [`app_with`] / [`run_with`].
pub fn db(state: StorageState) -> Db {
    Arc::new(RwLock::new(state))
}

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/{name}", any(account_scoped))
        .route("/{container}/{*path}", any(container_scoped))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Db::default()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

/// Queue operations: create, delete, set/get metadata.
async fn account_scoped(
    State(db): State<Db>,
    Path(name): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let query = parse_query(query.as_deref());
    let comp = query.get("comp").map(String::as_str);

    if method == Method::PUT && comp.is_none() {
        db.write()
            .await
            .queues
            .insert(name, metadata_from_headers(&headers));
        StatusCode::CREATED.into_response()
    } else if method == Method::PUT && comp == Some("metadata") {
        let mut state = db.write().await;
        match state.queues.get_mut(&name) {
            Some(metadata) => {
                *metadata = metadata_from_headers(&headers);
                StatusCode::NO_CONTENT.into_response()
            }
            None => queue_not_found(),
        }
    } else if method == Method::GET && comp == Some("metadata") {
        let state = db.read().await;
        match state.queues.get(&name) {
            Some(metadata) => (StatusCode::OK, metadata_into_headers(metadata)).into_response(),
            None => queue_not_found(),
        }
    } else if method == Method::DELETE && comp.is_none() {
        if db.write().await.queues.remove(&name).is_some() {
            StatusCode::NO_CONTENT.into_response()
        } else {
            queue_not_found()
        }
    } else {
        xml_error(
            StatusCode::BAD_REQUEST,
            "InvalidQueryParameterValue",
            "unsupported operation",
        )
    }
}

/// Blob, file-share directory, and data lake path operations.
async fn container_scoped(
    State(db): State<Db>,
    Path((container, path)): Path<(String, String)>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let query = parse_query(query.as_deref());
    let comp = query.get("comp").map(String::as_str);
    let restype = query.get("restype").map(String::as_str);
    let resource = query.get("resource").map(String::as_str);
    let key = (container, path);

    if method == Method::PUT && comp == Some("copy") {
        let Some(copy_id) = query.get("copyid") else {
            return xml_error(
                StatusCode::BAD_REQUEST,
                "MissingRequiredQueryParameter",
                "copyid is required",
            );
        };
        let mut state = db.write().await;
        match state.blobs.get_mut(&key) {
            Some(blob) if blob.pending_copy_id.as_ref() == Some(copy_id) => {
                blob.pending_copy_id = None;
                StatusCode::NO_CONTENT.into_response()
            }
            Some(_) => xml_error(
                StatusCode::CONFLICT,
                "NoPendingCopyOperation",
                "There is currently no pending copy operation.",
            ),
            None => blob_not_found(),
        }
    } else if method == Method::PUT && comp == Some("metadata") {
        let mut state = db.write().await;
        match state.blobs.get_mut(&key) {
            Some(blob) => {
                blob.metadata = metadata_from_headers(&headers);
                StatusCode::OK.into_response()
            }
            None => blob_not_found(),
        }
    } else if method == Method::PUT && restype == Some("directory") {
        db.write().await.directories.insert(key);
        StatusCode::CREATED.into_response()
    } else if method == Method::PUT && resource.is_some() {
        match resource {
            Some("directory") | Some("file") => {
                db.write().await.paths.insert(key);
                StatusCode::CREATED.into_response()
            }
            _ => xml_error(
                StatusCode::BAD_REQUEST,
                "InvalidQueryParameterValue",
                "resource must be file or directory",
            ),
        }
    } else if method == Method::DELETE && restype == Some("directory") {
        if db.write().await.directories.remove(&key) {
            StatusCode::ACCEPTED.into_response()
        } else {
            xml_error(
                StatusCode::NOT_FOUND,
                "ResourceNotFound",
                "The specified resource does not exist.",
            )
        }
    } else if method == Method::DELETE {
        let mut state = db.write().await;
        if state.blobs.remove(&key).is_some() {
            StatusCode::ACCEPTED.into_response()
        } else if state.paths.remove(&key) {
            StatusCode::OK.into_response()
        } else {
            blob_not_found()
        }
    } else {
        xml_error(
            StatusCode::BAD_REQUEST,
            "InvalidQueryParameterValue",
            "unsupported operation",
        )
    }
}

fn queue_not_found() -> Response {
    xml_error(
        StatusCode::NOT_FOUND,
        "QueueNotFound",
        "The specified queue does not exist.",
    )
}

fn blob_not_found() -> Response {
    xml_error(
        StatusCode::NOT_FOUND,
        "BlobNotFound",
        "The specified blob does not exist.",
    )
}

fn xml_error(status: StatusCode, code: &str, message: &str) -> Response {
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Error><Code>{code}</Code><Message>{message}</Message></Error>"
    );
    (status, [(CONTENT_TYPE, "application/xml")], body).into_response()
}

fn metadata_from_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            name.as_str().strip_prefix("x-ms-meta-").map(|key| {
                (
                    key.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
        })
        .collect()
}

fn metadata_into_headers(metadata: &HashMap<String, String>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (key, value) in metadata {
        let name = HeaderName::from_bytes(format!("x-ms-meta-{key}").as_bytes())
            .expect("metadata key is a valid header name");
        let value = HeaderValue::from_str(value).expect("metadata value is header-safe");
        headers.insert(name, value);
    }
    headers
}

/// Split a raw query string into a key-value map, percent-decoding values.
fn parse_query(raw: Option<&str>) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let Some(raw) = raw else {
        return out;
    };
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        out.insert(key.to_string(), percent_decode(value));
    }
    out
}

fn percent_decode(value: &str) -> String {
    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
